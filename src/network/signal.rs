use std::fmt;
use std::ops::{BitXor, BitXorAssign, Not};

/// Representation of a signal: a boolean variable, a design input or a constant, with an
/// optional complement
///
/// The complement is stored in the low bit, so that `!s` is a single xor.
/// Constants 0 and 1 share the index 0, and design inputs are tagged with the high bit.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Signal {
    a: u32,
}

impl Signal {
    /// Constant zero signal
    pub fn zero() -> Signal {
        Signal { a: 0 }
    }

    /// Constant one signal
    pub fn one() -> Signal {
        Signal { a: 1 }
    }

    /// Create a signal from a variable index
    pub fn from_var(v: u32) -> Signal {
        Self::from_ind(v + 1)
    }

    /// Create a signal from a design input index
    pub fn from_input(v: u32) -> Signal {
        Self::from_ind(!v)
    }

    /// Create a signal from an index (including zero signal at index 0)
    pub(crate) fn from_ind(v: u32) -> Signal {
        Signal { a: v << 1 }
    }

    /// Obtain the variable index associated with the signal
    pub fn var(&self) -> u32 {
        assert!(self.is_var());
        self.ind() - 1u32
    }

    /// Obtain the design input index associated with the signal
    pub fn input(&self) -> u32 {
        assert!(self.is_input());
        !self.ind() & !0x8000_0000
    }

    /// Obtain the internal index associated with the signal: 0 for a constant, otherwise var() + 1
    pub fn ind(&self) -> u32 {
        self.a >> 1
    }

    /// Returns true if the signal represents a constant
    pub fn is_constant(&self) -> bool {
        self.ind() == 0
    }

    /// Returns true if the signal represents a design input
    pub fn is_input(&self) -> bool {
        self.a & 0x8000_0000 != 0
    }

    /// Returns true if the signal represents an internal variable
    pub fn is_var(&self) -> bool {
        !self.is_input() && !self.is_constant()
    }

    /// Clear the complement, if set
    pub(crate) fn without_inversion(&self) -> Signal {
        Signal { a: self.a & !1u32 }
    }

    /// Returns true if the signal is complemented
    ///
    /// False for inputs, variables and zero; true for their complements and for one.
    pub fn is_inverted(&self) -> bool {
        self.a & 1 != 0
    }

    /// Return the internal representation of the signal
    pub fn raw(&self) -> u32 {
        self.a
    }

    /// Apply a remapping of variable order to the signal
    pub(crate) fn remap_order(&self, t: &[Signal]) -> Signal {
        if !self.is_var() {
            *self
        } else {
            t[self.var() as usize] ^ self.is_inverted()
        }
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Signal {
        if b {
            Signal::one()
        } else {
            Signal::zero()
        }
    }
}

impl Not for Signal {
    type Output = Signal;
    fn not(self) -> Signal {
        Signal { a: self.a ^ 1u32 }
    }
}

impl Not for &'_ Signal {
    type Output = Signal;
    fn not(self) -> Signal {
        Signal { a: self.a ^ 1u32 }
    }
}

impl BitXorAssign<bool> for Signal {
    fn bitxor_assign(&mut self, rhs: bool) {
        self.a ^= rhs as u32;
    }
}

impl BitXor<bool> for Signal {
    type Output = Signal;
    fn bitxor(self, rhs: bool) -> Self::Output {
        let mut l = self;
        l ^= rhs;
        l
    }
}

impl BitXor<bool> for &'_ Signal {
    type Output = Signal;
    fn bitxor(self, rhs: bool) -> Self::Output {
        let mut l = *self;
        l ^= rhs;
        l
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            let a = self.a & 1;
            write!(f, "{a}")
        } else {
            if self.is_inverted() {
                write!(f, "!")?;
            }
            if self.is_input() {
                let v = self.input();
                write!(f, "i{v}")
            } else {
                let v = self.var();
                write!(f, "x{v}")
            }
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
