//! Abstract store: one [`Value`] per tracked variable.

use std::collections::HashMap;
use std::fmt;

use crate::types::Var;
use crate::value::Value;

/// Constant-propagation fact at one program point.
///
/// Absent variables are implicitly [`Value::Undef`]. Entries are never
/// removed. [`CpFact::meet_update`] only moves a variable upward in the
/// lattice; [`CpFact::copy_from`] overwrites.
#[derive(Debug, Clone, Default)]
pub struct CpFact {
    values: HashMap<Var, Value>,
}

impl CpFact {
    /// Create a new empty fact.
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Get the value of a variable (`Undef` if not present).
    pub fn get(&self, var: &Var) -> Value {
        self.values.get(var).copied().unwrap_or(Value::Undef)
    }

    /// Overwrite the value of a variable.
    ///
    /// This is the strong update of an assignment and may lower the value;
    /// use it only on a scratch copy, never on a committed fact.
    ///
    /// Returns `true` if the stored value changed.
    pub fn update(&mut self, var: Var, value: Value) -> bool {
        let old = self.values.insert(var, value).unwrap_or(Value::Undef);
        old != value
    }

    /// Meet `value` into the current value of `var`.
    ///
    /// Returns `true` if the stored value changed.
    pub fn meet_update(&mut self, var: &Var, value: Value) -> bool {
        let slot = self.values.entry(var.clone()).or_insert(Value::Undef);
        let old = *slot;
        *slot = old.meet(value);
        old != *slot
    }

    /// Replace the contents of `self` with `other`.
    ///
    /// Returns `true` if `self` changed, comparing by value. A variable may
    /// move down the lattice: `NAC / 0` is `Undef` while `NAC / Undef` is
    /// `NAC`, so a divisor rising from `Undef` to `0` lowers the quotient.
    pub fn copy_from(&mut self, other: &CpFact) -> bool {
        if *self == *other {
            return false;
        }
        // Keys of `self` that `other` lacks are kept so entries are never dropped.
        for (var, &value) in &other.values {
            self.values.insert(var.clone(), value);
        }
        true
    }

    /// Returns `true` if `var` has an explicit entry.
    pub fn contains(&self, var: &Var) -> bool {
        self.values.contains_key(var)
    }

    /// Iterate over tracked variables and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&Var, Value)> + '_ {
        self.values.iter().map(|(var, &value)| (var, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pointwise partial order: `self ⊑ other`.
    pub fn le(&self, other: &CpFact) -> bool {
        self.values.iter().all(|(var, &v)| v.le(other.get(var)))
    }
}

impl PartialEq for CpFact {
    /// Facts are equal when every variable maps to the same value; an
    /// explicit `Undef` entry equals an absent one.
    fn eq(&self, other: &Self) -> bool {
        self.values.iter().all(|(var, &v)| other.get(var) == v) && other.values.iter().all(|(var, &v)| self.get(var) == v)
    }
}

impl Eq for CpFact {}

impl FromIterator<(Var, Value)> for CpFact {
    fn from_iter<I: IntoIterator<Item = (Var, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CpFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.values.iter().collect();
        entries.sort_by_key(|(var, _)| var.index());
        write!(f, "{{")?;
        for (i, (var, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", var, value)?;
        }
        write!(f, "}}")
    }
}
