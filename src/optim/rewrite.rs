//! Local rewriting with two-level Reed-Muller resynthesis

use clap::ValueEnum;

use crate::network::Gate;
use crate::optim::reed_muller::{
    materialize_rm_form, minimum_rm_form, window_function, Cost, MAX_WINDOW_LEAVES,
};
use crate::optim::window::{cut_window, live_nodes, mffc_window, Window};
use crate::{Network, Signal};

/// Window selection strategy for the rewriting pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RewriteStrategy {
    /// Reconvergence-driven cut, allowing nodes with external fanout inside the window
    Cut,
    /// Maximum fanout-free cone, so every internal node disappears on substitution
    Mffc,
}

/// Parameters of the Reed-Muller rewriting pass
#[derive(Debug, Clone, Copy)]
pub struct RewriteParams {
    /// Window selection strategy
    pub strategy: RewriteStrategy,
    /// Minimize the And gate count first instead of the total gate count
    pub multiplicative_complexity: bool,
    /// Maximum number of window leaves
    pub max_cut_size: usize,
}

impl Default for RewriteParams {
    fn default() -> Self {
        RewriteParams {
            strategy: RewriteStrategy::Cut,
            multiplicative_complexity: false,
            max_cut_size: 6,
        }
    }
}

/// Cost of a window as it stands in the network
///
/// Buffers are free; Xor gates of any arity count toward the total only; And-like
/// and Maj gates contain And logic and count toward both totals.
fn window_cost(ntk: &Network, window: &Window) -> Cost {
    let mut gates = 0;
    let mut and_gates = 0;
    for n in &window.nodes {
        let g = ntk.gate(*n as usize);
        if g.is_buf_like() {
            continue;
        }
        gates += 1;
        if g.is_and_like() || g.is_maj() {
            and_gates += 1;
        }
    }
    Cost { gates, and_gates }
}

/// Rewrite the network with two-level mixed-polarity Reed-Muller forms
///
/// Each node is visited once in the original order. A window is built around it, its
/// function resynthesized, and the node replaced whenever the new realization is
/// strictly cheaper than the window contents under the selected metric. Substitutions
/// leave the network transiently unsorted; it is cleaned up at the end of the pass.
pub fn rewrite_reed_muller(ntk: &mut Network, params: &RewriteParams) {
    assert!(
        params.max_cut_size >= 2 && params.max_cut_size <= MAX_WINDOW_LEAVES,
        "Cut size {} is not supported",
        params.max_cut_size
    );
    ntk.cleanup();

    let initial = ntk.nb_nodes();
    let mut live = live_nodes(ntk);
    for root in 0..initial {
        if !live[root] || ntk.gate(root).is_buf_like() {
            continue;
        }
        let window = match params.strategy {
            RewriteStrategy::Cut => cut_window(ntk, root, params.max_cut_size),
            RewriteStrategy::Mffc => mffc_window(ntk, root, &live, params.max_cut_size),
        };
        let Some(window) = window else {
            continue;
        };
        let existing = window_cost(ntk, &window);
        let function = window_function(ntk, &window);
        let form = minimum_rm_form(&function, params.multiplicative_complexity);
        let mc = params.multiplicative_complexity;
        if form.cost.key(mc) >= existing.key(mc) {
            continue;
        }
        let new_sig = materialize_rm_form(ntk, &form, &window.leaves);
        if new_sig.without_inversion() == Signal::from_var(root as u32) {
            continue;
        }
        ntk.replace(root, Gate::Buf(new_sig));
        // Replaced logic may now be dangling; later windows must not count it
        live = live_nodes(ntk);
    }
    ntk.cleanup();
}

#[cfg(test)]
mod tests {
    use super::{rewrite_reed_muller, RewriteParams, RewriteStrategy};
    use crate::network::stats::stats;
    use crate::sim::simulate_comb;
    use crate::Network;

    /// Check that two networks agree on every input pattern
    fn check_equiv_exhaustive(a: &Network, b: &Network) {
        assert_eq!(a.nb_inputs(), b.nb_inputs());
        assert_eq!(a.nb_outputs(), b.nb_outputs());
        assert!(a.nb_inputs() <= 10);
        for pattern in 0..1usize << a.nb_inputs() {
            let input: Vec<bool> = (0..a.nb_inputs()).map(|i| (pattern >> i) & 1 != 0).collect();
            assert_eq!(
                simulate_comb(a, &input),
                simulate_comb(b, &input),
                "Networks differ on pattern {pattern:b}"
            );
        }
    }

    /// Sum-of-products realization of the majority of three inputs
    fn majority_sop() -> Network {
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let x0 = net.and(i0, i1);
        let x1 = net.and(i1, i2);
        let x2 = net.and(i2, i0);
        let s0 = net.or_n(&[x0, x1, x2]);
        net.add_output(s0);
        net
    }

    #[test]
    fn test_rewrite_majority_cut() {
        let mut net = majority_sop();
        let original = net.clone();
        rewrite_reed_muller(&mut net, &RewriteParams::default());
        check_equiv_exhaustive(&original, &net);
        // The Reed-Muller form ab ^ ac ^ bc avoids the Or gate
        assert!(stats(&net).nb_gates() <= stats(&original).nb_gates());
    }

    #[test]
    fn test_rewrite_majority_mffc() {
        let mut net = majority_sop();
        let original = net.clone();
        let params = RewriteParams {
            strategy: RewriteStrategy::Mffc,
            ..RewriteParams::default()
        };
        rewrite_reed_muller(&mut net, &params);
        check_equiv_exhaustive(&original, &net);
    }

    #[test]
    fn test_rewrite_parity_drops_ands() {
        // !a & !b | a & b is a xnor in disguise
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let x0 = net.and(!i0, !i1);
        let x1 = net.and(i0, i1);
        let s0 = net.xor(x0, !x1);
        let o = net.xor(s0, x1);
        net.add_output(o);
        let original = net.clone();
        let params = RewriteParams {
            multiplicative_complexity: true,
            ..RewriteParams::default()
        };
        rewrite_reed_muller(&mut net, &params);
        check_equiv_exhaustive(&original, &net);
        assert!(stats(&net).nb_and <= stats(&original).nb_and);
    }

    #[test]
    fn test_rewrite_preserves_shared_logic() {
        // x1 drives an output directly and must survive an MFFC rewrite above it
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let x0 = net.and(i0, i1);
        let x1 = net.and(i1, i2);
        let x2 = net.xor(x0, x1);
        net.add_output(x2);
        net.add_output(x1);
        let original = net.clone();
        let params = RewriteParams {
            strategy: RewriteStrategy::Mffc,
            ..RewriteParams::default()
        };
        rewrite_reed_muller(&mut net, &params);
        check_equiv_exhaustive(&original, &net);
    }

    #[test]
    fn test_rewrite_merges_identical_cones() {
        // Two copies of the same majority cone collapse to a single one
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        for _ in 0..2 {
            let x0 = net.and(i0, i1);
            let x1 = net.and(i1, i2);
            let x2 = net.and(i2, i0);
            let s0 = net.or_n(&[x0, x1, x2]);
            net.add_output(s0);
        }
        let original = net.clone();
        rewrite_reed_muller(&mut net, &RewriteParams::default());
        check_equiv_exhaustive(&original, &net);
        assert_eq!(net.output(0), net.output(1));
        assert_eq!(net.nb_nodes(), 4);
    }

    #[test]
    fn test_rewrite_idempotent() {
        let mut net = majority_sop();
        rewrite_reed_muller(&mut net, &RewriteParams::default());
        let once = format!("{net}");
        rewrite_reed_muller(&mut net, &RewriteParams::default());
        assert_eq!(format!("{net}"), once, "Second pass changed the network");
    }

    #[test]
    fn test_rewrite_deterministic() {
        let mut a = majority_sop();
        let mut b = majority_sop();
        rewrite_reed_muller(&mut a, &RewriteParams::default());
        rewrite_reed_muller(&mut b, &RewriteParams::default());
        assert_eq!(format!("{a}"), format!("{b}"));
    }

    #[test]
    fn test_rewrite_wider_circuit() {
        // A small adder-like mix of And and Xor structure
        let mut net = Network::new();
        let a = net.add_input();
        let b = net.add_input();
        let cin = net.add_input();
        let p = net.xor(a, b);
        let g = net.and(a, b);
        let s = net.xor(p, cin);
        let t = net.and(p, cin);
        let cout = net.or_n(&[g, t]);
        net.add_output(s);
        net.add_output(cout);
        let original = net.clone();
        rewrite_reed_muller(&mut net, &RewriteParams::default());
        check_equiv_exhaustive(&original, &net);
    }
}
