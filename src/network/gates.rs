use core::slice;
use std::{cmp, fmt};

use crate::network::signal::Signal;

/// Basic types of 2-input gates
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum BinaryType {
    /// 2-input And gate
    And,
    /// 2-input Xor gate
    Xor,
}

/// Basic types of 3-input gates
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TernaryType {
    /// 3-input And gate
    And,
    /// 3-input Xor gate
    Xor,
    /// Majority gate (a + b + c >= 2)
    Maj,
}

/// Basic types of N-input gates
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NaryType {
    /// N-input And gate
    And,
    /// N-input Or gate
    Or,
    /// N-input Nand gate
    Nand,
    /// N-input Nor gate
    Nor,
    /// N-input Xor gate
    Xor,
    /// N-input Xnor gate
    Xnor,
}

/// Logic gate representation
///
/// Logic gates have a canonical form, which is unique and makes it easier to simplify
/// and deduplicate the logic. Inputs and output may be complemented, and constant
/// inputs are simplified.
///
/// Canonical form includes:
///   * And gates (with optional complemented inputs)
///   * Xor gates (no complemented input)
///   * Maj gates (first input not complemented)
///
/// Or/Nor/Nand gates are replaced by And gates, Xnor gates by Xor gates.
/// Buf/Not and trivial gates are omitted.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Gate {
    /// Arbitrary 2-input gate (And/Xor)
    Binary([Signal; 2], BinaryType),
    /// Arbitrary 3-input gate (And/Xor/Maj)
    Ternary([Signal; 3], TernaryType),
    /// Arbitrary N-input gate (And/Or/Xor/Nand/Nor/Xnor)
    Nary(Box<[Signal]>, NaryType),
    /// Buf or Not
    Buf(Signal),
}

/// Result of normalizing a logic gate
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Normalization {
    /// A gate, with an optional complemented output
    Node(Gate, bool),
    /// The trivial case, where the gate reduces to a single signal or constant
    Copy(Signal),
}

impl Gate {
    /// Create a 2-input And
    pub fn and(a: Signal, b: Signal) -> Gate {
        Gate::Binary([a, b], BinaryType::And)
    }

    /// Create a 2-input Xor
    pub fn xor(a: Signal, b: Signal) -> Gate {
        Gate::Binary([a, b], BinaryType::Xor)
    }

    /// Create a 3-input And
    pub fn and3(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary([a, b, c], TernaryType::And)
    }

    /// Create a 3-input Xor
    pub fn xor3(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary([a, b, c], TernaryType::Xor)
    }

    /// Create a Maj
    pub fn maj(a: Signal, b: Signal, c: Signal) -> Gate {
        Gate::Ternary([a, b, c], TernaryType::Maj)
    }

    /// Create a n-input And
    pub fn andn(v: &[Signal]) -> Gate {
        Gate::Nary(v.into(), NaryType::And)
    }

    /// Create a n-input Xor
    pub fn xorn(v: &[Signal]) -> Gate {
        Gate::Nary(v.into(), NaryType::Xor)
    }

    /// Returns whether the gate is in canonical form
    pub fn is_canonical(&self) -> bool {
        use Gate::*;
        match self {
            Binary([a, b], BinaryType::And) => sorted_2(*a, *b) && !a.is_constant(),
            Binary([a, b], BinaryType::Xor) => {
                sorted_2(*a, *b) && !a.is_constant() && no_inv_2(*a, *b)
            }
            Ternary([a, b, c], TernaryType::And) => sorted_3(*a, *b, *c) && !a.is_constant(),
            Ternary([a, b, c], TernaryType::Xor) => {
                sorted_3(*a, *b, *c) && !a.is_constant() && no_inv_3(*a, *b, *c)
            }
            Ternary([a, b, c], TernaryType::Maj) => {
                sorted_3(*a, *b, *c) && !a.is_constant() && !a.is_inverted()
            }
            Nary(v, NaryType::And) => sorted_n(v) && v.len() > 3 && !v[0].is_constant(),
            Nary(v, NaryType::Xor) => {
                sorted_n(v) && v.len() > 3 && !v[0].is_constant() && no_inv_n(v)
            }
            Nary(_, _) => false,
            Buf(_) => false,
        }
    }

    /// Obtain the canonical form of the gate
    pub fn make_canonical(&self) -> Normalization {
        use Normalization::*;
        Node(self.clone(), false).make_canonical()
    }

    /// Obtain all signals feeding this gate
    pub fn dependencies(&self) -> &[Signal] {
        use Gate::*;
        match self {
            Binary(s, _) => s,
            Ternary(s, _) => s,
            Nary(v, _) => v,
            Buf(s) => slice::from_ref(s),
        }
    }

    /// Obtain all internal variables feeding this gate (not inputs or constants)
    pub fn vars(&self) -> impl Iterator<Item = u32> + '_ {
        self.dependencies()
            .iter()
            .filter(|s| s.is_var())
            .map(|s| s.var())
    }

    /// Returns whether the gate is a Maj
    pub fn is_maj(&self) -> bool {
        matches!(self, Gate::Ternary(_, TernaryType::Maj))
    }

    /// Returns whether the gate is an And, Or, Nand or Nor of any arity
    pub fn is_and_like(&self) -> bool {
        matches!(
            self,
            Gate::Binary(_, BinaryType::And)
                | Gate::Ternary(_, TernaryType::And)
                | Gate::Nary(_, NaryType::And)
                | Gate::Nary(_, NaryType::Nand)
                | Gate::Nary(_, NaryType::Or)
                | Gate::Nary(_, NaryType::Nor)
        )
    }

    /// Returns whether the gate is a Xor or Xnor of any arity
    pub fn is_xor_like(&self) -> bool {
        matches!(
            self,
            Gate::Binary(_, BinaryType::Xor)
                | Gate::Ternary(_, TernaryType::Xor)
                | Gate::Nary(_, NaryType::Xor)
                | Gate::Nary(_, NaryType::Xnor)
        )
    }

    /// Returns whether the gate is a Buf
    pub fn is_buf_like(&self) -> bool {
        matches!(self, Gate::Buf(_))
    }

    /// Apply a remapping of the signals to the gate
    pub(crate) fn remap<F: Fn(&Signal) -> Signal>(&self, t: F) -> Gate {
        use Gate::*;
        match self {
            Binary([a, b], tp) => Binary([t(a), t(b)], *tp),
            Ternary([a, b, c], tp) => Ternary([t(a), t(b), t(c)], *tp),
            Nary(v, tp) => Nary(v.iter().map(&t).collect(), *tp),
            Buf(s) => Buf(t(s)),
        }
    }

    /// Apply a remapping of variable order to the gate
    pub(crate) fn remap_order(&self, t: &[Signal]) -> Gate {
        self.remap(|s| s.remap_order(t))
    }
}

/// Normalize an And
fn make_and(a: Signal, b: Signal, inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let (i0, i1) = sort_2(a, b);
    if i0 == Signal::zero() || i0 == !i1 {
        Copy(Signal::zero() ^ inv)
    } else if i0 == Signal::one() || i0 == i1 {
        Copy(i1 ^ inv)
    } else {
        Node(Binary([i0, i1], BinaryType::And), inv)
    }
}

/// Normalize a Xor
fn make_xor(a: Signal, b: Signal, inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let new_inv = a.is_inverted() ^ b.is_inverted() ^ inv;
    let (i0, i1) = sort_2(a.without_inversion(), b.without_inversion());
    if i0 == Signal::zero() {
        Copy(i1 ^ new_inv)
    } else if i0 == i1 {
        Copy(Signal::from(new_inv))
    } else {
        Node(Binary([i0, i1], BinaryType::Xor), new_inv)
    }
}

/// Normalize an And3
fn make_and3(a: Signal, b: Signal, c: Signal, inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let (i0, i1, i2) = sort_3(a, b, c);
    if i0 == Signal::zero() || i0 == !i1 || i2 == !i1 {
        Copy(Signal::zero() ^ inv)
    } else if i0 == Signal::one() || i0 == i1 {
        make_and(i1, i2, inv)
    } else if i1 == i2 {
        make_and(i0, i1, inv)
    } else {
        Node(Ternary([i0, i1, i2], TernaryType::And), inv)
    }
}

/// Normalize a Xor3
fn make_xor3(a: Signal, b: Signal, c: Signal, inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let new_inv = a.is_inverted() ^ b.is_inverted() ^ c.is_inverted() ^ inv;
    let (i0, i1, i2) = sort_3(
        a.without_inversion(),
        b.without_inversion(),
        c.without_inversion(),
    );
    if i0 == Signal::zero() {
        make_xor(i1, i2, new_inv)
    } else if i0 == i1 {
        Copy(i2 ^ new_inv)
    } else if i1 == i2 {
        Copy(i0 ^ new_inv)
    } else {
        Node(Ternary([i0, i1, i2], TernaryType::Xor), new_inv)
    }
}

/// Normalize a Maj
fn make_maj(a: Signal, b: Signal, c: Signal, inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let (i0, i1, i2) = sort_3(a, b, c);
    if i0 == !i1 || i1 == i2 {
        Copy(i2 ^ inv)
    } else if i1 == !i2 || i0 == i1 {
        Copy(i0 ^ inv)
    } else if i0.is_inverted() {
        // Terminates because the order does not change: signals differing only
        // by their complement were removed above
        make_maj(!i0, !i1, !i2, !inv)
    } else if i0 == Signal::zero() {
        make_and(i1, i2, inv)
    } else {
        Node(Ternary([i0, i1, i2], TernaryType::Maj), inv)
    }
}

/// Normalize a n-ary And
fn make_andn(v: &[Signal], inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let mut vs = v.to_vec();
    vs.retain(|s| *s != Signal::one());
    vs.sort();
    vs.dedup();
    for i in 1..vs.len() {
        if vs[i - 1] == !vs[i] {
            return Copy(Signal::zero() ^ inv);
        }
    }
    if vs.is_empty() {
        Copy(Signal::one() ^ inv)
    } else if vs[0] == Signal::zero() {
        Copy(Signal::zero() ^ inv)
    } else if vs.len() == 1 {
        Copy(vs[0] ^ inv)
    } else if vs.len() == 2 {
        make_and(vs[0], vs[1], inv)
    } else if vs.len() == 3 {
        make_and3(vs[0], vs[1], vs[2], inv)
    } else {
        Node(Nary(vs.into(), NaryType::And), inv)
    }
}

/// Normalize a n-ary Xor
fn make_xorn(v: &[Signal], inv: bool) -> Normalization {
    use Gate::*;
    use Normalization::*;
    let mut vs = v.to_vec();
    // Remove polarity
    let mut pol = inv;
    for s in vs.iter() {
        pol ^= s.is_inverted();
    }
    for s in &mut vs {
        *s = s.without_inversion();
    }
    vs.retain(|s| *s != Signal::zero());
    vs.sort();
    // Remove duplicates, which cancel out pairwise
    let mut dd = Vec::new();
    for s in vs {
        if dd.last() == Some(&s) {
            dd.pop();
        } else {
            dd.push(s);
        }
    }
    let vs = dd;

    if vs.is_empty() {
        Copy(Signal::zero() ^ pol)
    } else if vs.len() == 1 {
        Copy(vs[0] ^ pol)
    } else if vs.len() == 2 {
        make_xor(vs[0], vs[1], pol)
    } else if vs.len() == 3 {
        make_xor3(vs[0], vs[1], vs[2], pol)
    } else {
        Node(Nary(vs.into(), NaryType::Xor), pol)
    }
}

impl Normalization {
    /// Returns whether the normalization is canonical
    pub fn is_canonical(&self) -> bool {
        use Normalization::*;
        match self {
            Copy(_) => true,
            Node(g, _) => g.is_canonical(),
        }
    }

    /// Apply the normalization algorithm
    pub fn make_canonical(&self) -> Self {
        use Gate::*;
        use Normalization::*;
        match self {
            Copy(s) => Copy(*s),
            Node(g, inv) => match g {
                Binary([a, b], BinaryType::And) => make_and(*a, *b, *inv),
                Binary([a, b], BinaryType::Xor) => make_xor(*a, *b, *inv),
                Ternary([a, b, c], TernaryType::And) => make_and3(*a, *b, *c, *inv),
                Ternary([a, b, c], TernaryType::Xor) => make_xor3(*a, *b, *c, *inv),
                Ternary([a, b, c], TernaryType::Maj) => make_maj(*a, *b, *c, *inv),
                Nary(v, t) => {
                    let vi: Box<[Signal]> = v.iter().map(|s| !s).collect();
                    match t {
                        NaryType::And => make_andn(v, *inv),
                        NaryType::Nand => make_andn(v, !inv),
                        NaryType::Xor => make_xorn(v, *inv),
                        NaryType::Xnor => make_xorn(v, !inv),
                        NaryType::Or => make_andn(&vi, !inv),
                        NaryType::Nor => make_andn(&vi, *inv),
                    }
                }
                Buf(s) => Copy(*s ^ *inv),
            },
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Gate::*;
        match self {
            Binary([a, b], BinaryType::And) => {
                write!(f, "{a} & {b}")
            }
            Binary([a, b], BinaryType::Xor) => {
                write!(f, "{a} ^ {b}")
            }
            Ternary([a, b, c], TernaryType::And) => {
                write!(f, "{a} & {b} & {c}")
            }
            Ternary([a, b, c], TernaryType::Xor) => {
                write!(f, "{a} ^ {b} ^ {c}")
            }
            Ternary([a, b, c], TernaryType::Maj) => {
                write!(f, "Maj({a}, {b}, {c})")
            }
            Nary(v, tp) => {
                let sep = match tp {
                    NaryType::And | NaryType::Nand => " & ",
                    NaryType::Or | NaryType::Nor => " | ",
                    NaryType::Xor | NaryType::Xnor => " ^ ",
                };
                let inv = matches!(tp, NaryType::Nand | NaryType::Nor | NaryType::Xnor);
                let st = v
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(sep);
                if inv {
                    write!(f, "!({})", st)
                } else {
                    write!(f, "{}", st)
                }
            }
            Buf(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Normalization::*;
        match self {
            Copy(s) => write!(f, "{s}"),
            Node(g, inv) => {
                if *inv {
                    write!(f, "!(")?;
                }
                write!(f, "{g}")?;
                if *inv {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

fn sorted_2(a: Signal, b: Signal) -> bool {
    a.ind() < b.ind()
}

fn sorted_3(a: Signal, b: Signal, c: Signal) -> bool {
    a.ind() < b.ind() && b.ind() < c.ind()
}

fn sorted_n(v: &[Signal]) -> bool {
    v.windows(2).all(|w| w[0].ind() < w[1].ind())
}

fn no_inv_2(a: Signal, b: Signal) -> bool {
    !a.is_inverted() && !b.is_inverted()
}

fn no_inv_3(a: Signal, b: Signal, c: Signal) -> bool {
    !a.is_inverted() && !b.is_inverted() && !c.is_inverted()
}

fn no_inv_n(v: &[Signal]) -> bool {
    v.iter().all(|s| !s.is_inverted())
}

fn sort_2(a: Signal, b: Signal) -> (Signal, Signal) {
    (cmp::min(a, b), cmp::max(a, b))
}

fn sort_3(a: Signal, b: Signal, c: Signal) -> (Signal, Signal, Signal) {
    let (mut i0, mut i1, mut i2) = (a, b, c);
    (i1, i2) = sort_2(i1, i2);
    (i0, i1) = sort_2(i0, i1);
    (i1, i2) = sort_2(i1, i2);
    (i0, i1, i2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Gate::*;
    use Normalization::*;

    fn check_canonization(n: Gate) {
        let e0 = Node(n.clone(), false);
        let e1 = Node(n, true);
        let c0 = e0.make_canonical();
        let c1 = e1.make_canonical();
        assert!(c0.is_canonical(), "Canonization is wrong: {e0} to {c0}");
        assert!(c1.is_canonical(), "Canonization is wrong: {e1} to {c1}");

        match (c0, c1) {
            (Copy(s0), Copy(s1)) => assert_eq!(s0, !s1),
            (Node(g0, i0), Node(g1, i1)) => {
                assert_eq!(g0, g1);
                assert_eq!(i0, !i1);
            }
            _ => panic!("Canonization of complements resulted in different gates"),
        }
    }

    #[test]
    fn test_make_canonical() {
        let mut vars = vec![Signal::zero(), Signal::one()];
        for i in 0..4 {
            for b in [false, true] {
                vars.push(Signal::from_ind(i) ^ b);
            }
        }

        for i0 in vars.iter() {
            check_canonization(Buf(*i0));
            for i1 in vars.iter() {
                check_canonization(Gate::and(*i0, *i1));
                check_canonization(Gate::xor(*i0, *i1));
                for i2 in vars.iter() {
                    check_canonization(Gate::maj(*i0, *i1, *i2));
                    check_canonization(Gate::and3(*i0, *i1, *i2));
                    check_canonization(Gate::xor3(*i0, *i1, *i2));
                    for i3 in vars.iter() {
                        check_canonization(Nary(vec![*i0, *i1, *i2, *i3].into(), NaryType::And));
                        check_canonization(Nary(vec![*i0, *i1, *i2, *i3].into(), NaryType::Nand));
                        check_canonization(Nary(vec![*i0, *i1, *i2, *i3].into(), NaryType::Or));
                        check_canonization(Nary(vec![*i0, *i1, *i2, *i3].into(), NaryType::Nor));
                        check_canonization(Nary(vec![*i0, *i1, *i2, *i3].into(), NaryType::Xor));
                        check_canonization(Nary(vec![*i0, *i1, *i2, *i3].into(), NaryType::Xnor));
                    }
                }
            }
        }

        check_canonization(Nary(Vec::new().into(), NaryType::And));
        check_canonization(Nary(Vec::new().into(), NaryType::Xor));
    }

    #[test]
    fn test_and_is_canonical() {
        let l0 = Signal::zero();
        let l1 = Signal::one();
        let i0 = Signal::from_var(0);
        let i1 = Signal::from_var(1);

        assert!(Gate::and(i0, i1).is_canonical());
        assert!(Gate::and(i0, !i1).is_canonical());
        assert!(Gate::and(!i0, i1).is_canonical());
        assert!(Gate::and(!i0, !i1).is_canonical());

        // Wrong ordering
        assert!(!Gate::and(i1, i0).is_canonical());
        assert!(!Gate::and(!i1, i0).is_canonical());

        // Constant
        assert!(!Gate::and(l0, i1).is_canonical());
        assert!(!Gate::and(l1, i1).is_canonical());

        // Repetition
        assert!(!Gate::and(i0, i0).is_canonical());
        assert!(!Gate::and(i0, !i0).is_canonical());
    }

    #[test]
    fn test_xor_is_canonical() {
        let l0 = Signal::zero();
        let i0 = Signal::from_var(0);
        let i1 = Signal::from_var(1);

        assert!(Gate::xor(i0, i1).is_canonical());

        // Wrong ordering
        assert!(!Gate::xor(i1, i0).is_canonical());

        // Bad polarity
        assert!(!Gate::xor(i0, !i1).is_canonical());
        assert!(!Gate::xor(!i0, i1).is_canonical());

        // Constant
        assert!(!Gate::xor(l0, i1).is_canonical());

        // Repetition
        assert!(!Gate::xor(i0, i0).is_canonical());
    }

    #[test]
    fn test_maj_is_canonical() {
        let l0 = Signal::zero();
        let l1 = Signal::one();
        let i0 = Signal::from_var(0);
        let i1 = Signal::from_var(1);
        let i2 = Signal::from_var(2);

        assert!(Gate::maj(i0, i1, i2).is_canonical());
        assert!(Gate::maj(i0, !i1, i2).is_canonical());
        assert!(Gate::maj(i0, !i1, !i2).is_canonical());

        // Wrong ordering
        assert!(!Gate::maj(i0, i2, i1).is_canonical());
        assert!(!Gate::maj(i1, i0, i2).is_canonical());

        // Constant
        assert!(!Gate::maj(l0, i1, i2).is_canonical());
        assert!(!Gate::maj(l1, i1, i2).is_canonical());

        // Wrong polarity
        assert!(!Gate::maj(!i0, i1, i2).is_canonical());
        assert!(!Gate::maj(!i0, !i1, !i2).is_canonical());

        // Repetition
        assert!(!Gate::maj(i0, i0, i2).is_canonical());
        assert!(!Gate::maj(i0, !i0, i2).is_canonical());
        assert!(!Gate::maj(i0, i2, i2).is_canonical());
        assert!(!Gate::maj(i0, i2, !i2).is_canonical());
    }
}
