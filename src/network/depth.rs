//! Depth information for a logic network

use crate::network::signal::Signal;
use crate::Network;

/// Logic level of each node, counted from the primary inputs
///
/// Inputs and constants are at level 0, and each gate is one level above its deepest
/// fan-in. Buffers do not add a level.
pub fn levels(ntk: &Network) -> Vec<u32> {
    assert!(ntk.is_topo_sorted());
    let mut ret = vec![0u32; ntk.nb_nodes()];
    for i in 0..ntk.nb_nodes() {
        let g = ntk.gate(i);
        let fanin_level = g
            .dependencies()
            .iter()
            .map(|s| signal_level(&ret, *s))
            .max()
            .unwrap_or(0);
        ret[i] = if g.is_buf_like() {
            fanin_level
        } else {
            fanin_level + 1
        };
    }
    ret
}

/// Depth of the network: the level of its deepest output
pub fn depth(ntk: &Network) -> u32 {
    let lvl = levels(ntk);
    (0..ntk.nb_outputs())
        .map(|o| signal_level(&lvl, ntk.output(o)))
        .max()
        .unwrap_or(0)
}

fn signal_level(levels: &[u32], s: Signal) -> u32 {
    if s.is_var() {
        levels[s.var() as usize]
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{depth, levels};
    use crate::Network;

    #[test]
    fn test_levels() {
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let x0 = net.and(i0, i1);
        let x1 = net.xor(x0, i2);
        let x2 = net.and(x1, x0);
        net.add_output(x2);
        assert_eq!(levels(&net), vec![1, 2, 3]);
        assert_eq!(depth(&net), 3);
    }

    #[test]
    fn test_empty() {
        let net = Network::new();
        assert_eq!(depth(&net), 0);
    }
}
