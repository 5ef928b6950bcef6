//! Enumeration of bounded subcircuits (windows) for rewriting
//!
//! A window is a rooted subcircuit: a root node, an ordered set of leaf signals and the
//! internal nodes strictly between them. Windows are ephemeral, re-derived from the
//! current network state at each visit, and never persisted across substitutions.

use std::collections::VecDeque;

use fxhash::FxHashSet;

use crate::{Network, Signal};

/// Maximum number of cuts explored for a single root
const CUT_ENUMERATION_BUDGET: usize = 128;

/// A bounded subcircuit rooted at a node
#[derive(Debug, Clone)]
pub struct Window {
    /// Root node index
    pub root: u32,
    /// Leaf signals, without complement, in sorted order
    pub leaves: Vec<Signal>,
    /// Internal nodes, including the root, in ascending index order
    pub nodes: Vec<u32>,
}

impl Window {
    /// Position of a signal in the leaf list
    pub fn leaf_index(&self, s: Signal) -> Option<usize> {
        self.leaves.binary_search(&s.without_inversion()).ok()
    }
}

/// The set of nodes reachable from the root without crossing the given frontier
///
/// Returns None if the frontier does not cover the root's cone, which happens
/// when a design input is reached directly.
fn cone(ntk: &Network, root: u32, frontier: &[Signal]) -> Option<Vec<u32>> {
    let mut nodes = Vec::new();
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    while let Some(v) = stack.pop() {
        if !seen.insert(v) {
            continue;
        }
        nodes.push(v);
        for s in ntk.gate(v as usize).dependencies() {
            if s.is_constant() || frontier.contains(&s.without_inversion()) {
                continue;
            }
            if !s.is_var() {
                return None;
            }
            stack.push(s.var());
        }
    }
    nodes.sort_unstable();
    Some(nodes)
}

/// Leaf signals actually feeding a set of nodes from the outside
fn support(ntk: &Network, nodes: &[u32]) -> Vec<Signal> {
    let mut leaves = Vec::new();
    for v in nodes {
        for s in ntk.gate(*v as usize).dependencies() {
            if s.is_constant() {
                continue;
            }
            if s.is_input() || nodes.binary_search(&s.var()).is_err() {
                leaves.push(s.without_inversion());
            }
        }
    }
    leaves.sort_unstable();
    leaves.dedup();
    leaves
}

/// The direct fan-ins of a node, as a sorted frontier
fn direct_frontier(ntk: &Network, root: u32) -> Vec<Signal> {
    let mut ret: Vec<Signal> = ntk
        .gate(root as usize)
        .dependencies()
        .iter()
        .filter(|s| !s.is_constant())
        .map(|s| s.without_inversion())
        .collect();
    ret.sort_unstable();
    ret.dedup();
    ret
}

/// Enumerate feasible cuts rooted at a node and select the best window
///
/// Cuts are enumerated by frontier expansion from the root's fan-ins, bounded by the
/// maximum leaf count and a fixed budget. The selected cut is the one covering the most
/// internal nodes; ties prefer fewer leaves, then the lexicographically smallest leaf
/// list, so the result is deterministic.
pub fn cut_window(ntk: &Network, root: usize, max_leaves: usize) -> Option<Window> {
    let root = root as u32;
    if ntk.gate(root as usize).is_buf_like() {
        return None;
    }
    let initial = direct_frontier(ntk, root);
    if initial.is_empty() || initial.len() > max_leaves {
        return None;
    }

    let mut queue = VecDeque::new();
    let mut seen = FxHashSet::default();
    let mut candidates = Vec::new();
    seen.insert(initial.clone());
    queue.push_back(initial);
    while let Some(cut) = queue.pop_front() {
        candidates.push(cut.clone());
        if candidates.len() >= CUT_ENUMERATION_BUDGET {
            break;
        }
        for leaf in cut.iter().filter(|s| s.is_var()) {
            let mut expanded: Vec<Signal> = cut
                .iter()
                .filter(|s| *s != leaf)
                .cloned()
                .chain(
                    ntk.gate(leaf.var() as usize)
                        .dependencies()
                        .iter()
                        .filter(|s| !s.is_constant())
                        .map(|s| s.without_inversion()),
                )
                .collect();
            expanded.sort_unstable();
            expanded.dedup();
            if expanded.len() <= max_leaves && !seen.contains(&expanded) {
                seen.insert(expanded.clone());
                queue.push_back(expanded);
            }
        }
    }

    let mut best: Option<Window> = None;
    for cut in candidates {
        let Some(nodes) = cone(ntk, root, &cut) else {
            continue;
        };
        let leaves = support(ntk, &nodes);
        if leaves.is_empty() || leaves.len() > max_leaves {
            continue;
        }
        let w = Window {
            root,
            leaves,
            nodes,
        };
        let better = match &best {
            None => true,
            Some(b) => w
                .nodes
                .len()
                .cmp(&b.nodes.len())
                .then(b.leaves.len().cmp(&w.leaves.len()))
                .then(b.leaves.cmp(&w.leaves))
                .is_gt(),
        };
        if better {
            best = Some(w);
        }
    }
    best
}

/// Compute the maximum fanout-free cone rooted at a node
///
/// The MFFC is the set of nodes that would become dangling if the root were removed:
/// every node whose fanout paths all go through the root. Only consumers that are alive
/// (reachable from an output) are counted. Returns None when the root is a buffer or
/// the cone's support exceeds the leaf bound.
pub fn mffc_window(ntk: &Network, root: usize, live: &[bool], max_leaves: usize) -> Option<Window> {
    let root = root as u32;
    if ntk.gate(root as usize).is_buf_like() {
        return None;
    }

    // Fanout count of each node, restricted to live consumers and outputs
    let mut fanouts = vec![0u32; ntk.nb_nodes()];
    for i in 0..ntk.nb_nodes() {
        if !live[i] {
            continue;
        }
        for v in ntk.gate(i).vars() {
            fanouts[v as usize] += 1;
        }
    }
    for o in 0..ntk.nb_outputs() {
        let s = ntk.output(o);
        if s.is_var() {
            fanouts[s.var() as usize] += 1;
        }
    }

    // Dereference from the root; a node joins the cone when its last fanout is removed
    let mut nodes = vec![root];
    let mut stack = vec![root];
    while let Some(v) = stack.pop() {
        for f in ntk.gate(v as usize).vars() {
            fanouts[f as usize] -= 1;
            if fanouts[f as usize] == 0 {
                nodes.push(f);
                stack.push(f);
            }
        }
    }
    nodes.sort_unstable();
    nodes.dedup();

    let leaves = support(ntk, &nodes);
    if leaves.is_empty() || leaves.len() > max_leaves {
        return None;
    }
    Some(Window {
        root,
        leaves,
        nodes,
    })
}

/// Mark the nodes reachable from the outputs
pub(crate) fn live_nodes(ntk: &Network) -> Vec<bool> {
    let mut live = vec![false; ntk.nb_nodes()];
    let mut stack = Vec::new();
    for o in 0..ntk.nb_outputs() {
        let s = ntk.output(o);
        if s.is_var() {
            stack.push(s.var());
        }
    }
    while let Some(v) = stack.pop() {
        if live[v as usize] {
            continue;
        }
        live[v as usize] = true;
        stack.extend(ntk.gate(v as usize).vars());
    }
    live
}

#[cfg(test)]
mod tests {
    use super::{cut_window, live_nodes, mffc_window};
    use crate::Network;

    /// Two And gates feeding a Xor, with one And shared with an output
    fn example() -> Network {
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let i3 = net.add_input();
        let x0 = net.and(i0, i1);
        let x1 = net.and(i2, i3);
        let x2 = net.xor(x0, x1);
        net.add_output(x2);
        net.add_output(x1);
        net
    }

    #[test]
    fn test_cut_window() {
        let net = example();
        let w = cut_window(&net, 2, 4).unwrap();
        assert_eq!(w.root, 2);
        // The largest 4-feasible cut covers the whole cone
        assert_eq!(w.nodes, vec![0, 1, 2]);
        assert_eq!(w.leaves.len(), 4);
        for l in &w.leaves {
            assert!(l.is_input());
            assert!(!l.is_inverted());
        }
    }

    #[test]
    fn test_cut_window_bounded() {
        let net = example();
        // With at most 2 leaves only single-gate cuts are feasible at the root
        let w = cut_window(&net, 2, 2).unwrap();
        assert_eq!(w.nodes, vec![2]);
        assert_eq!(w.leaves.len(), 2);
    }

    #[test]
    fn test_mffc_window() {
        let net = example();
        let live = live_nodes(&net);
        // x1 is used by an output, so the MFFC of the root contains only x0 and x2
        let w = mffc_window(&net, 2, &live, 6).unwrap();
        assert_eq!(w.nodes, vec![0, 2]);
        assert_eq!(w.leaves.len(), 3);
    }

    #[test]
    fn test_primary_fanin_window() {
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let x0 = net.and(i0, i1);
        net.add_output(x0);
        let live = live_nodes(&net);
        let w = mffc_window(&net, 0, &live, 6).unwrap();
        assert_eq!(w.nodes, vec![0]);
        assert_eq!(w.leaves.len(), 2);
        assert!(w.leaves.contains(&i0) && w.leaves.contains(&i1));
    }
}
