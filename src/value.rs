//! The constant-propagation lattice.
//!
//! # Elements
//!
//! - `Undef` (⊥): no information yet
//! - `Constant(n)`: exactly the 32-bit value `n`
//! - `Nac` (⊤): not a constant, any value is possible
//!
//! # Lattice Structure
//!
//! ```text
//!              NAC
//!          /  |   |  \
//!   ... Constant(n) ...
//!          \  |   |  /
//!             UNDEF
//! ```
//!
//! The lattice is flat with height 3, so any monotone iteration over it
//! stabilizes after at most two raises per variable.

use std::fmt;

/// Abstract value of an `int`-like variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// Bottom: no definition seen yet
    #[default]
    Undef,
    /// Known constant value
    Constant(i32),
    /// Top: not a constant
    Nac,
}

impl Value {
    pub const fn undef() -> Self {
        Value::Undef
    }

    pub const fn nac() -> Self {
        Value::Nac
    }

    pub const fn constant(n: i32) -> Self {
        Value::Constant(n)
    }

    /// Encodes a boolean as `Constant(1)` or `Constant(0)`.
    pub const fn from_bool(b: bool) -> Self {
        Value::Constant(b as i32)
    }

    pub fn is_undef(self) -> bool {
        matches!(self, Value::Undef)
    }

    pub fn is_constant(self) -> bool {
        matches!(self, Value::Constant(_))
    }

    pub fn is_nac(self) -> bool {
        matches!(self, Value::Nac)
    }

    /// Returns the integer of a `Constant`, or `None` otherwise.
    pub fn as_constant(self) -> Option<i32> {
        match self {
            Value::Constant(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer of a `Constant`.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a `Constant`.
    pub fn constant_value(self) -> i32 {
        match self {
            Value::Constant(n) => n,
            other => panic!("Value {} is not a constant", other),
        }
    }

    /// Meet (`⊓`) of two values.
    ///
    /// `Nac` absorbs everything, `Undef` is the identity, and two constants
    /// survive only if they agree.
    pub fn meet(self, other: Value) -> Value {
        match (self, other) {
            (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
            (Value::Undef, v) | (v, Value::Undef) => v,
            (Value::Constant(a), Value::Constant(b)) => {
                if a == b {
                    Value::Constant(a)
                } else {
                    Value::Nac
                }
            }
        }
    }

    /// Partial order: `self ⊑ other`.
    pub fn le(self, other: Value) -> bool {
        match (self, other) {
            (Value::Undef, _) => true,
            (_, Value::Nac) => true,
            (Value::Constant(a), Value::Constant(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Constant(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undef => write!(f, "UNDEF"),
            Value::Constant(n) => write!(f, "{}", n),
            Value::Nac => write!(f, "NAC"),
        }
    }
}
