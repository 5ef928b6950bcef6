use core::fmt;
use std::collections::hash_map::Entry;

use fxhash::FxHashMap;

use crate::network::gates::{Gate, Normalization};
use crate::network::signal::Signal;

/// Representation of a logic network as a gate-inverter-graph, used as the main
/// representation for all logic manipulations
///
/// The network is combinational only. It is normally kept in topological order, so that
/// a given gate has an index higher than its fan-ins; rewriting passes may break the
/// order transiently, and restore it with [`Network::cleanup`].
#[derive(Debug, Clone, Default)]
pub struct Network {
    nb_inputs: usize,
    nodes: Vec<Gate>,
    outputs: Vec<Signal>,
}

impl Network {
    /// Create a new network
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of primary inputs
    pub fn nb_inputs(&self) -> usize {
        self.nb_inputs
    }

    /// Return the number of primary outputs
    pub fn nb_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Return the number of nodes in the network
    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get the input at index i
    pub fn input(&self, i: usize) -> Signal {
        assert!(i < self.nb_inputs());
        Signal::from_input(i as u32)
    }

    /// Get the output at index i
    pub fn output(&self, i: usize) -> Signal {
        assert!(i < self.nb_outputs());
        self.outputs[i]
    }

    /// Get the variable at index i
    pub fn node(&self, i: usize) -> Signal {
        Signal::from_var(i as u32)
    }

    /// Get the gate at index i
    pub fn gate(&self, i: usize) -> &Gate {
        &self.nodes[i]
    }

    /// Add a new primary input
    pub fn add_input(&mut self) -> Signal {
        self.nb_inputs += 1;
        self.input(self.nb_inputs() - 1)
    }

    /// Add multiple primary inputs
    pub fn add_inputs(&mut self, nb: usize) {
        self.nb_inputs += nb;
    }

    /// Add a new primary output based on an existing signal
    pub fn add_output(&mut self, l: Signal) {
        self.outputs.push(l)
    }

    /// Create an And2 gate
    pub fn and(&mut self, a: Signal, b: Signal) -> Signal {
        self.add_canonical(Gate::and(a, b))
    }

    /// Create a Xor2 gate
    pub fn xor(&mut self, a: Signal, b: Signal) -> Signal {
        self.add_canonical(Gate::xor(a, b))
    }

    /// Create a Maj gate
    pub fn maj(&mut self, a: Signal, b: Signal, c: Signal) -> Signal {
        self.add_canonical(Gate::maj(a, b, c))
    }

    /// Create an n-ary And gate
    pub fn and_n(&mut self, sigs: &[Signal]) -> Signal {
        self.add_canonical(Gate::andn(sigs))
    }

    /// Create an n-ary Or gate
    pub fn or_n(&mut self, sigs: &[Signal]) -> Signal {
        let inv: Vec<Signal> = sigs.iter().map(|s| !s).collect();
        !self.and_n(&inv)
    }

    /// Create an n-ary Xor gate
    pub fn xor_n(&mut self, sigs: &[Signal]) -> Signal {
        self.add_canonical(Gate::xorn(sigs))
    }

    /// Add a new gate, and make it canonical. The gate may be simplified immediately
    pub fn add_canonical(&mut self, gate: Gate) -> Signal {
        use Normalization::*;
        match gate.make_canonical() {
            Copy(l) => l,
            Node(g, inv) => self.add(g) ^ inv,
        }
    }

    /// Add a new gate
    pub fn add(&mut self, gate: Gate) -> Signal {
        let l = Signal::from_var(self.nodes.len() as u32);
        self.nodes.push(gate);
        l
    }

    /// Replace the gate at the given index
    ///
    /// All consumers of the signal follow the new gate. Replacing a gate by a `Buf` of
    /// newly added logic is how rewriting passes redirect the fanout of a node; the old
    /// logic dangles until [`Network::cleanup`].
    pub fn replace(&mut self, i: usize, gate: Gate) {
        self.nodes[i] = gate;
    }

    /// Return whether the network is topologically sorted
    pub(crate) fn is_topo_sorted(&self) -> bool {
        for (i, g) in self.nodes.iter().enumerate() {
            let ind = i as u32;
            for v in g.vars() {
                if v >= ind {
                    return false;
                }
            }
        }
        true
    }

    /// Remap nodes; there may be holes in the translation
    fn remap(&mut self, order: &[u32]) -> Box<[Signal]> {
        // Create the translation
        let mut translation = vec![Signal::zero(); self.nb_nodes()];
        for (new_i, old_i) in order.iter().enumerate() {
            translation[*old_i as usize] = Signal::from_var(new_i as u32);
        }

        // Remap the nodes
        let mut new_nodes = Vec::new();
        for o in order {
            let i = *o as usize;
            let g = self.gate(i);
            assert!(translation[i].is_var());
            assert_eq!(translation[i].var(), new_nodes.len() as u32);
            new_nodes.push(g.remap_order(translation.as_slice()));
        }
        self.nodes = new_nodes;

        // Remap the outputs
        self.remap_outputs(&translation);
        translation.into()
    }

    /// Remap outputs
    fn remap_outputs(&mut self, translation: &[Signal]) {
        let new_outputs = self
            .outputs
            .iter()
            .map(|s| s.remap_order(translation))
            .collect();
        self.outputs = new_outputs;
    }

    /// Remove unused logic; this will invalidate all signals
    ///
    /// Returns the mapping of old variable indices to signals, if needed.
    /// Removed signals are mapped to zero.
    pub fn sweep(&mut self) -> Box<[Signal]> {
        // Mark logic reachable from the outputs
        let mut visited = vec![false; self.nb_nodes()];
        let mut to_visit = Vec::<u32>::new();
        for o in 0..self.nb_outputs() {
            let output = self.output(o);
            if output.is_var() {
                to_visit.push(output.var());
            }
        }
        while let Some(node) = to_visit.pop() {
            let node = node as usize;
            if visited[node] {
                continue;
            }
            visited[node] = true;
            to_visit.extend(self.gate(node).vars());
        }

        // Now compute a mapping for all nodes that are reachable
        let mut order = Vec::new();
        for (i, v) in visited.iter().enumerate() {
            if *v {
                order.push(i as u32);
            }
        }
        self.remap(order.as_slice())
    }

    /// Remove duplicate logic and make all gates canonical; this will invalidate all signals
    ///
    /// Returns the mapping of old variable indices to signals, if needed.
    pub fn dedup(&mut self) -> Vec<Signal> {
        // Replace each node, in turn, by a simplified version or an equivalent existing node.
        // The network must be topologically sorted, so that the gate inputs are already replaced
        assert!(self.is_topo_sorted());
        let mut translation: Vec<Signal> = (0..self.nb_nodes())
            .map(|i| Signal::from_var(i as u32))
            .collect();

        let mut hsh = FxHashMap::default();
        let mut new_nodes = Vec::new();
        for i in 0..self.nb_nodes() {
            let g = self.gate(i).remap_order(translation.as_slice());
            translation[i] = match g.make_canonical() {
                Normalization::Copy(s) => s,
                Normalization::Node(g, inv) => {
                    let node_s = Signal::from_var(new_nodes.len() as u32);
                    match hsh.entry(g.clone()) {
                        Entry::Occupied(e) => *e.get() ^ inv,
                        Entry::Vacant(e) => {
                            e.insert(node_s);
                            new_nodes.push(g);
                            node_s ^ inv
                        }
                    }
                }
            };
        }
        self.nodes = new_nodes;
        self.remap_outputs(&translation);
        self.check();
        translation
    }

    /// Topologically sort the network; this will invalidate all signals
    ///
    /// Ordering may be changed even if already sorted.
    /// Returns the mapping of old variable indices to signals, if needed.
    pub(crate) fn topo_sort(&mut self) -> Box<[Signal]> {
        // Count the consumers of each gate
        let mut count_deps = vec![0u32; self.nb_nodes()];
        for g in self.nodes.iter() {
            for v in g.vars() {
                count_deps[v as usize] += 1;
            }
        }

        // Visit from the sinks, so the order comes out reversed
        let mut rev_order: Vec<u32> = Vec::new();
        let mut visited = vec![false; self.nb_nodes()];
        let mut to_visit: Vec<u32> = (0..self.nb_nodes() as u32)
            .filter(|v| count_deps[*v as usize] == 0)
            .collect();
        while let Some(v) = to_visit.pop() {
            if visited[v as usize] {
                continue;
            }
            visited[v as usize] = true;
            rev_order.push(v);
            for d in self.gate(v as usize).vars() {
                count_deps[d as usize] -= 1;
                if count_deps[d as usize] == 0 {
                    to_visit.push(d);
                }
            }
        }

        if rev_order.len() != self.nb_nodes() {
            panic!("Unable to find a valid topological sort: there must be a combinational loop");
        }
        rev_order.reverse();
        self.remap(rev_order.as_slice())
    }

    /// Remove dangling logic, restore topological order and deduplicate; this will
    /// invalidate all signals
    ///
    /// This is the compaction phase run after a rewriting pass, once all substitutions
    /// have been performed. Buffers left by node replacements are removed as well, and
    /// structurally identical gates are merged.
    pub fn cleanup(&mut self) {
        self.sweep();
        self.topo_sort();
        self.dedup();
    }

    /// Check consistency of the datastructure
    pub fn check(&self) {
        for i in 0..self.nb_nodes() {
            for v in self.gate(i).dependencies() {
                assert!(self.is_valid(*v), "Invalid signal {v}");
            }
        }
        for i in 0..self.nb_outputs() {
            let v = self.output(i);
            assert!(self.is_valid(v), "Invalid output {v}");
        }
    }

    /// Returns whether a signal is valid (within bounds) in the network
    pub(crate) fn is_valid(&self, s: Signal) -> bool {
        if s.is_input() {
            s.input() < self.nb_inputs() as u32
        } else if s.is_var() {
            s.var() < self.nb_nodes() as u32
        } else {
            true
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Network with {} inputs, {} outputs:",
            self.nb_inputs(),
            self.nb_outputs()
        )?;
        for i in 0..self.nb_nodes() {
            writeln!(f, "\t{} = {}", self.node(i), self.gate(i))?;
        }
        for i in 0..self.nb_outputs() {
            writeln!(f, "\to{} = {}", i, self.output(i))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Gate, Network, Signal};

    #[test]
    fn test_basic() {
        let mut net = Network::default();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let x = net.xor(i0, i1);
        net.add_output(x);

        assert_eq!(net.nb_inputs(), 2);
        assert_eq!(net.nb_outputs(), 1);
        assert_eq!(net.nb_nodes(), 1);
        assert!(net.is_topo_sorted());

        assert_eq!(net.input(0), i0);
        assert_eq!(net.input(1), i1);
        assert_eq!(net.output(0), x);
    }

    #[test]
    fn test_nary() {
        let mut net = Network::default();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let i3 = net.add_input();
        let i4 = net.add_input();

        assert_eq!(net.and_n(&[]), Signal::one());
        assert_eq!(net.and_n(&[i0]), i0);
        net.and_n(&[i0, i1]);
        net.and_n(&[i0, i1, i2]);
        net.and_n(&[i0, i1, i2, i3, i4]);

        assert_eq!(net.or_n(&[]), Signal::zero());
        assert_eq!(net.or_n(&[i0]), i0);
        net.or_n(&[i0, i1, i2, i3]);

        assert_eq!(net.xor_n(&[]), Signal::zero());
        assert_eq!(net.xor_n(&[i0]), i0);
        net.xor_n(&[i0, i1]);
        net.xor_n(&[i0, i1, i2, i3, i4]);
    }

    #[test]
    fn test_sweep() {
        let mut net = Network::default();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let x0 = net.and(i0, i1);
        let x1 = !net.and(!i0, !i1);
        let _ = net.and(x0, i1);
        let x3 = !net.and(!x1, !i1);
        net.add_output(x3);
        let t = net.sweep();
        assert_eq!(t.len(), 4);
        assert_eq!(net.nb_nodes(), 2);
        assert_eq!(net.nb_outputs(), 1);
        assert_eq!(
            t,
            vec![
                Signal::zero(),
                Signal::from_var(0),
                Signal::zero(),
                Signal::from_var(1)
            ]
            .into()
        );
    }

    #[test]
    fn test_dedup() {
        let mut net = Network::default();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let x0 = net.add(Gate::and(i0, i1));
        let x0_s = net.add(Gate::and(i0, i1));
        let x1 = net.add(Gate::and(x0, i2));
        let x1_s = net.add(Gate::and(x0_s, i2));
        net.add_output(x1);
        net.add_output(x1_s);
        net.dedup();
        assert_eq!(net.nb_nodes(), 2);
        assert_eq!(net.output(0), net.output(1));
    }

    #[test]
    fn test_cleanup_restores_order() {
        let mut net = Network::default();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let x0 = net.and(i0, i1);
        net.add_output(x0);
        // Replace the root by a forward reference, as a rewriting pass would
        let x1 = net.add(Gate::xor(i0, i1));
        net.replace(x0.var() as usize, Gate::Buf(x1));
        assert!(!net.is_topo_sorted());
        net.cleanup();
        assert!(net.is_topo_sorted());
        assert_eq!(net.nb_nodes(), 1);
        // Canonicalization orders inputs by their internal index
        assert_eq!(net.gate(0), &Gate::xor(i1, i0));
    }

    #[test]
    fn test_cleanup_merges_duplicates() {
        let mut net = Network::default();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let x0 = net.and(i0, i1);
        let x0_s = net.and(i0, i1);
        let x1 = net.xor(x0, i0);
        let x1_s = net.xor(x0_s, i0);
        net.add_output(x1);
        net.add_output(x1_s);
        net.cleanup();
        assert_eq!(net.nb_nodes(), 2);
        assert_eq!(net.output(0), net.output(1));
    }
}
