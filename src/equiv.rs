//! SAT-based equivalence checking

use cat_solver::Solver;
use fxhash::FxHashMap;
use itertools::Itertools;

use crate::network::{NaryType, TernaryType};
use crate::{BinaryType, Gate, Network, Signal};

/**
 * Export a network to a CNF formula
 *
 * The network must contain canonical gates only, with n-ary Xors already lowered.
 */
fn to_cnf(ntk: &Network) -> Vec<Vec<Signal>> {
    use Gate::*;
    let mut ret = Vec::<Vec<Signal>>::new();
    for i in 0..ntk.nb_nodes() {
        let n = ntk.node(i);
        match ntk.gate(i) {
            Binary([a, b], BinaryType::And) => {
                // 3 clauses, 6 literals
                ret.push(vec![*a, !n]);
                ret.push(vec![*b, !n]);
                ret.push(vec![!a, !b, n]);
            }
            Binary([a, b], BinaryType::Xor) => {
                // 4 clauses, 12 literals
                ret.push(vec![*a, *b, !n]);
                ret.push(vec![!a, !b, !n]);
                ret.push(vec![!a, *b, n]);
                ret.push(vec![*a, !b, n]);
            }
            Ternary([a, b, c], TernaryType::And) => {
                // 4 clauses, 10 literals
                ret.push(vec![*a, !n]);
                ret.push(vec![*b, !n]);
                ret.push(vec![*c, !n]);
                ret.push(vec![!a, !b, !c, n]);
            }
            Ternary([a, b, c], TernaryType::Xor) => {
                // 8 clauses, 32 literals
                ret.push(vec![*a, *b, *c, !n]);
                ret.push(vec![*a, *b, !c, n]);
                ret.push(vec![*a, !b, *c, n]);
                ret.push(vec![*a, !b, !c, !n]);
                ret.push(vec![!a, *b, *c, n]);
                ret.push(vec![!a, *b, !c, !n]);
                ret.push(vec![!a, !b, *c, !n]);
                ret.push(vec![!a, !b, !c, n]);
            }
            Ternary([a, b, c], TernaryType::Maj) => {
                // 6 clauses, 18 literals
                ret.push(vec![!a, !b, n]);
                ret.push(vec![!a, !c, n]);
                ret.push(vec![!b, !c, n]);
                ret.push(vec![*a, *b, !n]);
                ret.push(vec![*a, *c, !n]);
                ret.push(vec![*b, *c, !n]);
            }
            Nary(v, NaryType::And) => {
                // One clause per input plus one
                for s in v.iter() {
                    ret.push(vec![*s, !n]);
                }
                let mut c: Vec<Signal> = v.iter().map(|s| !s).collect();
                c.push(n);
                ret.push(c);
            }
            g => panic!("Gate {g} cannot be converted to CNF"),
        }
    }
    // Filter out zeros (removed from the clause)
    for c in &mut ret {
        c.retain(|s| *s != Signal::zero());
    }
    // Filter out ones (clause removed)
    ret.retain(|c| c.iter().all(|s| *s != Signal::one()));
    ret
}

/**
 * Copy the gates from one network to another and fill the translation table
 *
 * Gates are added in canonical form, and n-ary Xors are lowered to binary chains so
 * that the result is directly convertible to CNF.
 */
fn extend_network(eq: &mut Network, b: &Network) -> FxHashMap<Signal, Signal> {
    assert_eq!(eq.nb_inputs(), b.nb_inputs());
    assert!(b.is_topo_sorted());

    let mut t = FxHashMap::<Signal, Signal>::default();
    for c in [Signal::zero(), Signal::one()] {
        t.insert(c, c);
        t.insert(!c, !c);
    }
    for i in 0..b.nb_inputs() {
        let s = Signal::from_input(i as u32);
        t.insert(s, s);
        t.insert(!s, !s);
    }
    for i in 0..b.nb_nodes() {
        let s = match b.gate(i) {
            Gate::Nary(v, tp @ (NaryType::Xor | NaryType::Xnor)) => {
                let mut acc = Signal::from(*tp == NaryType::Xnor);
                for d in v.iter() {
                    acc = eq.xor(acc, t[d]);
                }
                acc
            }
            g => {
                let remapped = g.remap(|s| t[s]);
                eq.add_canonical(remapped)
            }
        };
        t.insert(b.node(i), s);
        t.insert(!b.node(i), !s);
    }
    t
}

/**
 * Create a network with a single output, representing the difference of two networks
 */
fn difference(a: &Network, b: &Network) -> Network {
    assert_eq!(a.nb_inputs(), b.nb_inputs());
    assert_eq!(a.nb_outputs(), b.nb_outputs());

    let mut eq = Network::new();
    eq.add_inputs(a.nb_inputs());
    let ta = extend_network(&mut eq, a);
    let tb = extend_network(&mut eq, b);

    let mut outputs = Vec::new();
    for i in 0..a.nb_outputs() {
        let sa = ta[&a.output(i)];
        let sb = tb[&b.output(i)];
        let o = eq.xor(sa, sb);
        outputs.push(o);
    }
    let differ = eq.or_n(&outputs);
    eq.add_output(differ);
    eq
}

/**
 * Find an assignment of the inputs that sets the single output to 1
 */
fn prove(a: &Network) -> Option<Vec<bool>> {
    assert_eq!(a.nb_outputs(), 1);

    if a.output(0) == Signal::zero() {
        return None;
    }
    if a.output(0) == Signal::one() {
        return Some(vec![false; a.nb_inputs()]);
    }

    let clauses = to_cnf(a);

    let all_lits: Vec<Signal> = clauses
        .iter()
        .flatten()
        .map(|s| s.without_inversion())
        .sorted()
        .dedup()
        .collect();

    let mut t = FxHashMap::default();
    let mut i: i32 = 1;
    for s in all_lits {
        t.insert(s, i);
        t.insert(!s, -i);
        i += 1;
    }
    // The output may be a bare literal that no clause mentions
    let out = a.output(0).without_inversion();
    if !t.contains_key(&out) {
        t.insert(out, i);
        t.insert(!out, -i);
    }

    let mut solver = Solver::new();
    for c in clauses {
        let clause: Vec<i32> = c.iter().map(|s| t[s]).collect();
        solver.add_clause(clause);
    }
    solver.add_clause([t[&a.output(0)]]);

    match solver.solve() {
        None => panic!("Couldn't solve SAT problem"),
        Some(false) => None,
        Some(true) => {
            let mut v = Vec::new();
            for inp in 0..a.nb_inputs() {
                // Inputs absent from the clauses are unconstrained
                let b = t
                    .get(&Signal::from_input(inp as u32))
                    .and_then(|lit| solver.value(*lit))
                    .unwrap_or(false);
                v.push(b);
            }
            Some(v)
        }
    }
}

/**
 * Perform equivalence checking on two combinational networks
 *
 * Returns a counterexample input assignment when the networks differ.
 */
pub fn check_equivalence(a: &Network, b: &Network) -> Result<(), Vec<bool>> {
    a.check();
    b.check();
    let eq = difference(a, b);
    match prove(&eq) {
        None => Ok(()),
        Some(v) => Err(v),
    }
}

#[cfg(test)]
mod tests {
    use super::check_equivalence;
    use crate::optim::{rewrite_reed_muller, RewriteParams};
    use crate::Network;

    #[test]
    fn test_equiv_and() {
        let mut a = Network::new();
        let l1 = a.add_input();
        let l2 = a.add_input();
        let aa = a.and(l1, l2);
        a.add_output(aa);
        let mut b = Network::new();
        b.add_input();
        b.add_input();
        let ab = b.and(l1, l2);
        b.add_output(ab);
        check_equivalence(&a, &b).unwrap();
    }

    #[test]
    fn test_equiv_maj() {
        // Majority against its sum-of-products expansion
        let mut a = Network::new();
        let i0 = a.add_input();
        let i1 = a.add_input();
        let i2 = a.add_input();
        let m = a.maj(i0, i1, i2);
        a.add_output(m);
        let mut b = Network::new();
        b.add_inputs(3);
        let x0 = b.and(i0, i1);
        let x1 = b.and(i1, i2);
        let x2 = b.and(i2, i0);
        let o = b.or_n(&[x0, x1, x2]);
        b.add_output(o);
        check_equivalence(&a, &b).unwrap();
    }

    #[test]
    fn test_non_equiv() {
        let mut a = Network::new();
        let l1 = a.add_input();
        let l2 = a.add_input();
        let aa = a.and(l1, l2);
        a.add_output(aa);
        let mut b = Network::new();
        b.add_inputs(2);
        let ab = b.xor(l1, l2);
        b.add_output(ab);
        let cex = check_equivalence(&a, &b).unwrap_err();
        assert_eq!(cex.len(), 2);
        // The counterexample must actually distinguish the two networks
        assert_ne!(
            crate::sim::simulate_comb(&a, &cex),
            crate::sim::simulate_comb(&b, &cex)
        );
    }

    #[test]
    fn test_equiv_nary_xor() {
        let mut a = Network::new();
        a.add_inputs(4);
        let sigs: Vec<_> = (0..4).map(|i| a.input(i)).collect();
        let o = a.xor_n(&sigs);
        a.add_output(o);
        let mut b = Network::new();
        b.add_inputs(4);
        let mut acc = b.xor(b.input(0), b.input(1));
        acc = b.xor(acc, b.input(2));
        acc = b.xor(acc, b.input(3));
        b.add_output(acc);
        check_equivalence(&a, &b).unwrap();
    }

    #[test]
    fn test_rewrite_preserves_equivalence() {
        let mut net = Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let i3 = net.add_input();
        let x0 = net.and(i0, !i1);
        let x1 = net.and(x0, i2);
        let x2 = net.xor(x1, i3);
        let x3 = net.maj(x0, x2, i1);
        net.add_output(x2);
        net.add_output(x3);
        let original = net.clone();
        rewrite_reed_muller(&mut net, &RewriteParams::default());
        check_equivalence(&original, &net).unwrap();
    }
}
