//! Cubes: conjunctions of literals over 1-indexed variables.
//!
//! A DNF is a list of cubes. The analyzer reads its cover off the decision
//! diagram (see [`Bdd::isop`](crate::bdd::Bdd::isop)) and sorts it with the
//! [`Ord`] defined here, so equal inputs print the same way.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A literal over a 1-indexed variable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit {
    pub var: u32,
    pub positive: bool,
}

impl Lit {
    pub fn new(var: u32, positive: bool) -> Self {
        Self { var, positive }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "x{}", self.var)
        } else {
            write!(f, "~x{}", self.var)
        }
    }
}

/// A consistent conjunction of literals, at most one per variable.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Cube {
    lits: BTreeMap<u32, bool>,
}

impl Cube {
    /// Builds a cube from `(variable, value)` pairs.
    ///
    /// Returns `None` if the pairs contain both polarities of a variable.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, bool)>) -> Option<Self> {
        let mut lits = BTreeMap::new();
        for (var, value) in pairs {
            if let Some(&prev) = lits.get(&var) {
                if prev != value {
                    return None;
                }
            }
            lits.insert(var, value);
        }
        Some(Self { lits })
    }

    pub fn len(&self) -> usize {
        self.lits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn get(&self, var: u32) -> Option<bool> {
        self.lits.get(&var).copied()
    }

    /// Literals ordered by variable.
    pub fn lits(&self) -> impl Iterator<Item = Lit> + '_ {
        self.lits.iter().map(|(&var, &positive)| Lit { var, positive })
    }

    /// `self` absorbs `other` when every literal of `self` occurs in `other`,
    /// i.e. `other` implies `self`.
    pub fn absorbs(&self, other: &Cube) -> bool {
        self.len() <= other.len() && self.lits.iter().all(|(var, value)| other.lits.get(var) == Some(value))
    }

    /// Evaluates the cube; `value(var)` supplies variable values.
    pub fn eval(&self, value: impl Fn(u32) -> bool) -> bool {
        self.lits.iter().all(|(&var, &positive)| value(var) == positive)
    }
}

impl Ord for Cube {
    /// Lexicographic by literals (variable first, positive before negative),
    /// a shorter prefix first.
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |c: &Cube| c.lits().map(|l| (l.var, !l.positive)).collect::<Vec<_>>();
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for Cube {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "1");
        }
        for (i, lit) in self.lits().enumerate() {
            if i > 0 {
                write!(f, "·")?;
            }
            write!(f, "{}", lit)?;
        }
        Ok(())
    }
}
