//! Named signals and the symbol table that shares them.
//!
//! Every occurrence of a signal name across the whole circuit resolves to the
//! same [`Var`] instance, so identical names denote the identical signal.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A named Boolean signal.
///
/// Equality, ordering and hashing are by name. Clones share the underlying
/// string, which lets a [`SymbolTable`] hand out one instance per name.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(Arc<str>);

impl Var {
    /// Creates a standalone variable (not registered in any table).
    pub fn new(name: &str) -> Self {
        Var(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Checks whether both handles point at the same interned instance.
    pub fn ptr_eq(&self, other: &Var) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl AsRef<str> for Var {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Interner mapping signal names to their shared [`Var`].
///
/// Iteration follows declaration order.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    index: HashMap<Arc<str>, usize>,
    vars: Vec<Var>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variable for `name`, declaring it on first use.
    pub fn intern(&mut self, name: &str) -> Var {
        if let Some(&i) = self.index.get(name) {
            return self.vars[i].clone();
        }
        let var = Var::new(name);
        self.index.insert(var.0.clone(), self.vars.len());
        self.vars.push(var.clone());
        var
    }

    pub fn get(&self, name: &str) -> Option<&Var> {
        self.index.get(name).map(|&i| &self.vars[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter()
    }
}

impl<'a> FromIterator<&'a str> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = SymbolTable::new();
        for name in iter {
            table.intern(name);
        }
        table
    }
}
