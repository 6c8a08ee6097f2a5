//! Reduced ordered binary decision diagrams.
//!
//! A small manager used by the logic analyzer to decide satisfiability, count
//! models and extract an irredundant DNF cover. Variables are
//! 1-indexed (0 is reserved for the terminals); a lower index is closer to
//! the root. All operations go through the manager, which hash-conses nodes
//! so that every Boolean function has exactly one representation.
//!
//! The manager carries an optional node limit. Operations that would grow
//! the diagram past it fail with [`Error::AnalysisTimeout`] instead of
//! running away on large inputs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

use log::debug;
use num_bigint::BigUint;

use crate::error::{Error, Result};

/// Handle to a node of a [`Bdd`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    pub const ZERO: Ref = Ref(0);
    pub const ONE: Ref = Ref(1);

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct Node {
    variable: u32,
    low: Ref,
    high: Ref,
}

pub struct Bdd {
    nodes: RefCell<Vec<Node>>,
    unique: RefCell<HashMap<Node, Ref>>,
    cache: RefCell<HashMap<(Ref, Ref, Ref), Ref>>,
    limit: Option<usize>,
}

impl Bdd {
    pub fn new(limit: Option<usize>) -> Self {
        // Terminals: 0 and 1, both with the reserved variable 0.
        let terminal = Node {
            variable: 0,
            low: Ref::ZERO,
            high: Ref::ZERO,
        };
        Self {
            nodes: RefCell::new(vec![terminal, terminal]),
            unique: RefCell::new(HashMap::new()),
            cache: RefCell::new(HashMap::new()),
            limit,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(None)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bdd")
            .field("size", &self.nodes.borrow().len())
            .field("limit", &self.limit)
            .field("cache", &self.cache.borrow().len())
            .finish()
    }
}

impl Bdd {
    pub fn zero(&self) -> Ref {
        Ref::ZERO
    }
    pub fn one(&self) -> Ref {
        Ref::ONE
    }
    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::ONE
    }

    /// Total number of allocated nodes, terminals included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn variable(&self, node: Ref) -> u32 {
        self.nodes.borrow()[node.index()].variable
    }
    pub fn low(&self, node: Ref) -> Ref {
        self.nodes.borrow()[node.index()].low
    }
    pub fn high(&self, node: Ref) -> Ref {
        self.nodes.borrow()[node.index()].high
    }

    /// Position of the node's variable in the order; terminals sort last.
    fn level(&self, node: Ref) -> u32 {
        if node.is_terminal() {
            u32::MAX
        } else {
            self.variable(node)
        }
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Result<Ref> {
        assert_ne!(v, 0, "Variable index should not be zero");

        if low == high {
            return Ok(low);
        }

        let node = Node { variable: v, low, high };
        if let Some(&r) = self.unique.borrow().get(&node) {
            return Ok(r);
        }

        let mut nodes = self.nodes.borrow_mut();
        if let Some(limit) = self.limit {
            if nodes.len() >= limit {
                debug!("mk_node: node limit {} reached", limit);
                return Err(Error::AnalysisTimeout { resource: "node", limit });
            }
        }
        let r = Ref(nodes.len() as u32);
        nodes.push(node);
        self.unique.borrow_mut().insert(node, r);
        Ok(r)
    }

    pub fn mk_var(&self, v: u32) -> Result<Ref> {
        self.mk_node(v, Ref::ZERO, Ref::ONE)
    }

    /// Cofactors of `node` with respect to variable `v`, which must not be
    /// below the node's own variable.
    fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        if node.is_terminal() || v < self.variable(node) {
            return (node, node);
        }
        (self.low(node), self.high(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Result<Ref> {
        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        if self.is_one(f) {
            return Ok(g);
        }
        if self.is_zero(f) {
            return Ok(h);
        }
        if g == h {
            return Ok(g);
        }
        if self.is_one(g) && self.is_zero(h) {
            return Ok(f);
        }

        let key = (f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return Ok(res);
        }

        // Determine the top variable:
        let m = self.level(f).min(self.level(g)).min(self.level(h));
        debug_assert_ne!(m, u32::MAX);

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0)?;
        let t = self.apply_ite(f1, g1, h1)?;
        let res = self.mk_node(m, e, t)?;

        self.cache.borrow_mut().insert(key, res);
        Ok(res)
    }

    pub fn apply_not(&self, f: Ref) -> Result<Ref> {
        self.apply_ite(f, Ref::ZERO, Ref::ONE)
    }

    pub fn apply_and(&self, f: Ref, g: Ref) -> Result<Ref> {
        self.apply_ite(f, g, Ref::ZERO)
    }

    pub fn apply_or(&self, f: Ref, g: Ref) -> Result<Ref> {
        self.apply_ite(f, Ref::ONE, g)
    }
}

struct CubeBudget {
    limit: Option<usize>,
    spent: usize,
}

impl CubeBudget {
    fn spend(&mut self, cubes: usize) -> Result<()> {
        self.spent += cubes;
        match self.limit {
            Some(limit) if self.spent > limit => {
                debug!("isop: cube limit {} reached", limit);
                Err(Error::AnalysisTimeout { resource: "cube", limit })
            }
            _ => Ok(()),
        }
    }
}

impl Bdd {
    /// Returns one satisfying path, preferring the high branch, as a list of
    /// `(variable, value)` pairs. Variables not on the path are unconstrained.
    ///
    /// Returns `None` for the constant false function.
    pub fn one_sat(&self, node: Ref) -> Option<Vec<(u32, bool)>> {
        if self.is_zero(node) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = node;

        // In a reduced diagram every non-terminal node reaches ONE, so the
        // walk only has to avoid the ZERO terminal.
        while !self.is_one(current) {
            let var = self.variable(current);
            let high = self.high(current);
            if !self.is_zero(high) {
                path.push((var, true));
                current = high;
            } else {
                path.push((var, false));
                current = self.low(current);
            }
        }

        Some(path)
    }

    /// Number of satisfying assignments over variables `1..=num_vars`.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let max = BigUint::from(1u32) << num_vars;
        let mut cache = HashMap::new();
        self._sat_count(node, &max, &mut cache)
    }

    fn _sat_count(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let count_low = self._sat_count(self.low(node), max, cache);
        let count_high = self._sat_count(self.high(node), max, cache);
        let count: BigUint = (count_low + count_high) >> 1;

        cache.insert(node, count.clone());
        count
    }

    /// Irredundant sum of products for the interval `lower <= f <= upper`
    /// (Minato-Morreale). With `lower == upper` this is a cover of exactly
    /// that function.
    ///
    /// Returns the diagram of the cover and its cubes, each as `(variable,
    /// value)` pairs ordered by variable. Every cube assembled along the way
    /// counts against `cube_limit`; going past it fails with
    /// [`Error::AnalysisTimeout`].
    pub fn isop(&self, lower: Ref, upper: Ref, cube_limit: Option<usize>) -> Result<(Ref, Vec<Vec<(u32, bool)>>)> {
        let mut budget = CubeBudget {
            limit: cube_limit,
            spent: 0,
        };
        let mut cache = HashMap::new();
        let res = self._isop(lower, upper, &mut budget, &mut cache)?;
        debug!(
            "isop: {} cubes, {} assembled in total, {} cached intervals",
            res.1.len(),
            budget.spent,
            cache.len()
        );
        Ok(res)
    }

    fn _isop(
        &self,
        lower: Ref,
        upper: Ref,
        budget: &mut CubeBudget,
        cache: &mut HashMap<(Ref, Ref), (Ref, Vec<Vec<(u32, bool)>>)>,
    ) -> Result<(Ref, Vec<Vec<(u32, bool)>>)> {
        if self.is_zero(lower) {
            return Ok((Ref::ZERO, Vec::new()));
        }
        if self.is_one(upper) {
            return Ok((Ref::ONE, vec![Vec::new()]));
        }

        if let Some((r, cubes)) = cache.get(&(lower, upper)).cloned() {
            budget.spend(cubes.len())?;
            return Ok((r, cubes));
        }

        // `lower` is not a terminal here, so the top level is a variable.
        let v = self.level(lower).min(self.level(upper));
        let (l0, l1) = self.top_cofactors(lower, v);
        let (u0, u1) = self.top_cofactors(upper, v);

        // Cubes that need the literal ~v, then v:
        let (r0, c0) = self._isop(self.apply_and(l0, self.apply_not(u1)?)?, u0, budget, cache)?;
        let (r1, c1) = self._isop(self.apply_and(l1, self.apply_not(u0)?)?, u1, budget, cache)?;

        // What is left is covered without mentioning v:
        let rest0 = self.apply_and(l0, self.apply_not(r0)?)?;
        let rest1 = self.apply_and(l1, self.apply_not(r1)?)?;
        let (rd, cd) = self._isop(self.apply_or(rest0, rest1)?, self.apply_and(u0, u1)?, budget, cache)?;

        let r = self.apply_or(self.mk_node(v, r0, r1)?, rd)?;

        let mut cubes = Vec::with_capacity(c0.len() + c1.len() + cd.len());
        for (value, part) in [(true, c1), (false, c0)] {
            for cube in part {
                let mut lits = Vec::with_capacity(cube.len() + 1);
                lits.push((v, value));
                lits.extend(cube);
                cubes.push(lits);
            }
        }
        cubes.extend(cd);
        budget.spend(cubes.len())?;

        cache.insert((lower, upper), (r, cubes.clone()));
        Ok((r, cubes))
    }
}
