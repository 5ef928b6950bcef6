use crate::{NaryType, Network, Signal};

/// Structure for bit-parallel simulation based directly on the network representation
pub struct SimpleSimulator<'a> {
    ntk: &'a Network,
    input_values: Vec<u64>,
    node_values: Vec<u64>,
}

/// Convert the complement bit to a word for bitwise operations
fn pol_to_word(s: Signal) -> u64 {
    let pol = s.raw() & 1;
    (!(pol as u64)).wrapping_add(1)
}

fn maj(a: u64, b: u64, c: u64) -> u64 {
    (b & c) | (a & (b | c))
}

impl<'a> SimpleSimulator<'a> {
    /// Build a simulator for a network
    pub fn from_network(ntk: &'a Network) -> SimpleSimulator<'a> {
        assert!(ntk.is_topo_sorted());
        SimpleSimulator {
            ntk,
            input_values: vec![0; ntk.nb_inputs()],
            node_values: vec![0; ntk.nb_nodes()],
        }
    }

    /// Run 64 patterns at once, one per bit of the input words
    pub fn run(&mut self, input_values: &[u64]) -> Vec<u64> {
        self.copy_inputs(input_values);
        self.run_comb();
        self.get_output_values()
    }

    fn get_value(&self, s: Signal) -> u64 {
        if s == Signal::zero() {
            0
        } else if s == Signal::one() {
            !0
        } else if s.is_input() {
            self.input_values[s.input() as usize] ^ pol_to_word(s)
        } else {
            debug_assert!(s.is_var());
            self.node_values[s.var() as usize] ^ pol_to_word(s)
        }
    }

    fn copy_inputs(&mut self, inputs: &[u64]) {
        assert_eq!(inputs.len(), self.input_values.len());
        self.input_values.copy_from_slice(inputs);
    }

    fn run_comb(&mut self) {
        use crate::Gate::*;
        for i in 0..self.ntk.nb_nodes() {
            let g = self.ntk.gate(i);
            let val = match g {
                Binary([a, b], tp) => {
                    use crate::network::BinaryType;
                    match tp {
                        BinaryType::And => self.get_value(*a) & self.get_value(*b),
                        BinaryType::Xor => self.get_value(*a) ^ self.get_value(*b),
                    }
                }
                Ternary([a, b, c], tp) => {
                    use crate::network::TernaryType;
                    match tp {
                        TernaryType::And => {
                            self.get_value(*a) & self.get_value(*b) & self.get_value(*c)
                        }
                        TernaryType::Xor => {
                            self.get_value(*a) ^ self.get_value(*b) ^ self.get_value(*c)
                        }
                        TernaryType::Maj => {
                            maj(self.get_value(*a), self.get_value(*b), self.get_value(*c))
                        }
                    }
                }
                Nary(v, tp) => match tp {
                    NaryType::And => self.compute_andn(v, false, false),
                    NaryType::Or => self.compute_andn(v, true, true),
                    NaryType::Nand => self.compute_andn(v, false, true),
                    NaryType::Nor => self.compute_andn(v, true, false),
                    NaryType::Xor => self.compute_xorn(v, false),
                    NaryType::Xnor => self.compute_xorn(v, true),
                },
                Buf(s) => self.get_value(*s),
            };
            self.node_values[i] = val;
        }
    }

    fn compute_andn(&self, v: &[Signal], inv_in: bool, inv_out: bool) -> u64 {
        let mut ret = !0u64;
        for s in v {
            ret &= self.get_value(s ^ inv_in);
        }
        if inv_out {
            !ret
        } else {
            ret
        }
    }

    fn compute_xorn(&self, v: &[Signal], inv_out: bool) -> u64 {
        let mut ret = 0u64;
        for s in v {
            ret ^= self.get_value(*s);
        }
        if inv_out {
            !ret
        } else {
            ret
        }
    }

    fn get_output_values(&self) -> Vec<u64> {
        let mut ret = Vec::new();
        for o in 0..self.ntk.nb_outputs() {
            ret.push(self.get_value(self.ntk.output(o)));
        }
        ret
    }
}
