//! Two-level mixed-polarity Reed-Muller synthesis
//!
//! A two-level Reed-Muller form is a Xor of And terms over the window leaves, where
//! each variable is used either true or complemented throughout, as chosen by a
//! polarity assignment. For k variables there are 2^k polarity assignments; the
//! synthesizer tries them all and keeps the cheapest realization. This exhaustive
//! search is exponential in k, which is why the window enumerator bounds the leaf
//! count in the first place.

use fxhash::FxHashMap;
use volute::Lut;

use crate::network::{BinaryType, TernaryType};
use crate::optim::window::Window;
use crate::{Gate, NaryType, Network, Signal};

/// Hard bound on the number of window leaves supported by the synthesizer
pub const MAX_WINDOW_LEAVES: usize = 8;

/// Cost of a realization: total gate count and And gate count
///
/// And gates are the multiplicative part of the realization; minimizing them instead
/// of the total is the multiplicative complexity objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    /// Total number of gates
    pub gates: usize,
    /// Number of And gates among them
    pub and_gates: usize,
}

impl Cost {
    /// Comparison key under the selected metric; ties always break toward the other one
    pub(crate) fn key(&self, multiplicative_complexity: bool) -> (usize, usize) {
        if multiplicative_complexity {
            (self.and_gates, self.gates)
        } else {
            (self.gates, self.and_gates)
        }
    }
}

/// A two-level mixed-polarity Reed-Muller realization
///
/// Each term is a bitmask over the window leaves: bit i selects the literal of leaf i,
/// complemented iff bit i of the polarity is set. The zero mask is the constant-1 term.
#[derive(Debug, Clone)]
pub struct RmForm {
    /// Number of variables
    pub nb_vars: usize,
    /// Chosen polarity assignment
    pub polarity: u32,
    /// Nonzero spectrum coefficients
    pub terms: Vec<u32>,
    /// Cost of the realization
    pub cost: Cost,
}

impl RmForm {
    /// Evaluate the realization on one input row, mostly for checks and tests
    pub fn eval(&self, row: u32) -> bool {
        // Literal i of a term is row bit i xored with the polarity bit; a term is true
        // when all its literals are, which the mask form expresses directly
        self.terms
            .iter()
            .filter(|t| (row ^ self.polarity) & **t == **t)
            .count()
            % 2
            == 1
    }
}

/// Compute the function of a window root over its leaves
///
/// The cone is evaluated with truth table values, leaf i being the i-th variable.
/// Evaluation is memoized and purely structural, so it remains correct while the
/// network is transiently out of topological order during a rewriting pass.
pub fn window_function(ntk: &Network, window: &Window) -> Lut {
    let k = window.leaves.len();
    assert!(
        k <= MAX_WINDOW_LEAVES,
        "Window with {k} leaves exceeds the supported bound"
    );
    let mut values = FxHashMap::default();
    for (i, l) in window.leaves.iter().enumerate() {
        values.insert(*l, Lut::nth_var(k, i));
    }
    node_function(ntk, window.root, k, &mut values)
}

/// Evaluate one node of the cone, memoized by uninverted signal
fn node_function(ntk: &Network, node: u32, k: usize, values: &mut FxHashMap<Signal, Lut>) -> Lut {
    let key = Signal::from_var(node);
    if let Some(l) = values.get(&key) {
        return l.clone();
    }
    let deps: Vec<Lut> = ntk
        .gate(node as usize)
        .dependencies()
        .iter()
        .map(|s| signal_function(ntk, *s, k, values))
        .collect();
    let ret = match ntk.gate(node as usize) {
        Gate::Binary(_, BinaryType::And) => deps[0].clone() & deps[1].clone(),
        Gate::Binary(_, BinaryType::Xor) => deps[0].clone() ^ deps[1].clone(),
        Gate::Ternary(_, TernaryType::And) => deps[0].clone() & deps[1].clone() & deps[2].clone(),
        Gate::Ternary(_, TernaryType::Xor) => deps[0].clone() ^ deps[1].clone() ^ deps[2].clone(),
        Gate::Ternary(_, TernaryType::Maj) => {
            (deps[0].clone() & deps[1].clone())
                | (deps[0].clone() & deps[2].clone())
                | (deps[1].clone() & deps[2].clone())
        }
        Gate::Nary(_, tp) => match tp {
            NaryType::And => and_fold(&deps, k, false),
            NaryType::Nand => !and_fold(&deps, k, false),
            NaryType::Or => !and_fold(&deps, k, true),
            NaryType::Nor => and_fold(&deps, k, true),
            NaryType::Xor => xor_fold(&deps, k),
            NaryType::Xnor => !xor_fold(&deps, k),
        },
        Gate::Buf(_) => deps[0].clone(),
    };
    values.insert(key, ret.clone());
    ret
}

/// Evaluate a fan-in signal, recursing into the cone as needed
fn signal_function(ntk: &Network, s: Signal, k: usize, values: &mut FxHashMap<Signal, Lut>) -> Lut {
    if s == Signal::zero() {
        return Lut::zero(k);
    }
    if s == Signal::one() {
        return Lut::one(k);
    }
    let f = match values.get(&s.without_inversion()) {
        Some(l) => l.clone(),
        None => {
            assert!(s.is_var(), "Window leaves do not cover the cone");
            node_function(ntk, s.var(), k, values)
        }
    };
    if s.is_inverted() {
        !f
    } else {
        f
    }
}

fn and_fold(deps: &[Lut], k: usize, inv_in: bool) -> Lut {
    let mut ret = Lut::one(k);
    for d in deps {
        ret = ret & if inv_in { !d.clone() } else { d.clone() };
    }
    ret
}

fn xor_fold(deps: &[Lut], k: usize) -> Lut {
    let mut ret = Lut::zero(k);
    for d in deps {
        ret = ret ^ d.clone();
    }
    ret
}

/// Fixed-polarity Reed-Muller spectrum of a truth table
///
/// Per-variable Davio butterflies: for a positive variable the upper cofactor gets the
/// lower xored in; for a complemented variable the cofactors are swapped first. The
/// result maps each term mask to its coefficient.
fn fixed_polarity_spectrum(table: &[bool], nb_vars: usize, polarity: u32) -> Vec<bool> {
    let mut f = table.to_vec();
    for i in 0..nb_vars {
        let step = 1usize << i;
        let mut blk = 0;
        while blk < f.len() {
            for j in blk..blk + step {
                let lo = f[j];
                let hi = f[j + step];
                if (polarity >> i) & 1 == 0 {
                    f[j + step] = lo ^ hi;
                } else {
                    f[j] = hi;
                    f[j + step] = lo ^ hi;
                }
            }
            blk += 2 * step;
        }
    }
    f
}

/// Cost of realizing a set of terms as Ands feeding a Xor
///
/// Terms with two or more literals each need one And gate; single literals and the
/// constant-1 term need none. One Xor gate combines the terms when there are at least
/// two of them, the constant being folded into an output complement.
fn terms_cost(terms: &[u32]) -> Cost {
    let and_gates = terms.iter().filter(|t| t.count_ones() >= 2).count();
    let nonconst = terms.iter().filter(|t| **t != 0).count();
    Cost {
        gates: and_gates + usize::from(nonconst >= 2),
        and_gates,
    }
}

/// Compute the cheapest two-level mixed-polarity Reed-Muller realization of a function
///
/// All 2^k polarity assignments are searched in ascending order, keeping the first
/// realization with the strictly best cost, so ties break toward the lowest polarity
/// index. With `multiplicative_complexity` the And count is minimized first, otherwise
/// the total gate count is.
pub fn minimum_rm_form(function: &Lut, multiplicative_complexity: bool) -> RmForm {
    let k = function.num_vars();
    assert!(k <= MAX_WINDOW_LEAVES);
    let table: Vec<bool> = (0..1usize << k).map(|i| function.value(i)).collect();

    let mut best: Option<RmForm> = None;
    for polarity in 0..1u32 << k {
        let spectrum = fixed_polarity_spectrum(&table, k, polarity);
        let terms: Vec<u32> = spectrum
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| i as u32)
            .collect();
        let cost = terms_cost(&terms);
        let better = match &best {
            None => true,
            Some(b) => cost.key(multiplicative_complexity) < b.cost.key(multiplicative_complexity),
        };
        if better {
            best = Some(RmForm {
                nb_vars: k,
                polarity,
                terms,
                cost,
            });
        }
    }
    // There is always at least one polarity assignment
    best.unwrap()
}

/// Materialize a realization in a network, wired to the given leaf signals
///
/// Each term becomes an n-ary And of the polarity-adjusted leaf literals, combined by
/// an n-ary Xor; the constant-1 term becomes an output complement. Gates are added in
/// canonical form, so trivial terms do not allocate nodes.
pub fn materialize_rm_form(ntk: &mut Network, form: &RmForm, leaves: &[Signal]) -> Signal {
    assert_eq!(form.nb_vars, leaves.len());
    let mut term_signals = Vec::new();
    let mut invert = false;
    for t in &form.terms {
        if *t == 0 {
            invert = !invert;
            continue;
        }
        let literals: Vec<Signal> = (0..form.nb_vars)
            .filter(|i| (t >> i) & 1 != 0)
            .map(|i| leaves[i] ^ ((form.polarity >> i) & 1 != 0))
            .collect();
        term_signals.push(ntk.and_n(&literals));
    }
    ntk.xor_n(&term_signals) ^ invert
}
