//! Simulation of a logic network

mod simple_sim;

use crate::Network;

/// Simulate a combinational network on a single pattern; return the output values
pub fn simulate_comb(a: &Network, input_values: &[bool]) -> Vec<bool> {
    let multi_input: Vec<u64> = input_values.iter().map(|b| if *b { !0 } else { 0 }).collect();
    let multi_ret = simulate_comb_multi(a, &multi_input);
    multi_ret.iter().map(|b| *b != 0).collect()
}

/// Simulate a combinational network with 64 patterns per word; return the output values
pub(crate) fn simulate_comb_multi(a: &Network, input_values: &[u64]) -> Vec<u64> {
    use simple_sim::SimpleSimulator;
    let mut sim = SimpleSimulator::from_network(a);
    sim.run(input_values)
}

/// Simulate a combinational network on every input assignment; return one truth table
/// word per output, valid for up to 6 inputs
pub fn exhaustive_truth_tables(a: &Network) -> Vec<u64> {
    assert!(a.nb_inputs() <= 6);
    let inputs: Vec<u64> = (0..a.nb_inputs())
        .map(|i| exhaustive_pattern(i))
        .collect();
    simulate_comb_multi(a, &inputs)
}

/// The simulation word assigning to input i its value in each of the 2^k assignments
fn exhaustive_pattern(i: usize) -> u64 {
    let mut ret = 0u64;
    for b in 0..64 {
        if (b >> i) & 1 != 0 {
            ret |= 1 << b;
        }
    }
    ret
}
