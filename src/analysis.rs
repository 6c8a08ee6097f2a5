//! Logic analysis: simplification to DNF, satisfiability, model counting.
//!
//! The analyzer compiles an [`Expr`] into a reduced ordered BDD with the
//! expression's variables ordered by name. Everything else is read off the
//! diagram:
//!
//! - **Satisfiability** is a walk to the ONE terminal, so a returned witness
//!   always satisfies the expression and `None` means no assignment does.
//! - **Simplification** extracts an irredundant sum of products straight
//!   from the diagram (Minato-Morreale), so absorbed, duplicate and
//!   complementary terms never appear. The result is a DNF equivalent to the
//!   input, in a fixed literal and cube order.
//! - **Model counting** is exact for any number of variables.
//!
//! No bound on the number of variables is assumed for correctness. Two
//! budgets bound the work instead: the node limit of the diagram, and the
//! number of cubes simplification may assemble. Either one running out is
//! reported as [`Error::AnalysisTimeout`].
//!
//! [`Error::AnalysisTimeout`]: crate::error::Error::AnalysisTimeout
//!
//! # Examples
//!
//! ```
//! use circuit_proof::analysis::{satisfiable, simplify};
//! use circuit_proof::parser::parse_formula;
//! use circuit_proof::symbol::SymbolTable;
//!
//! let symbols: SymbolTable = ["A", "B"].into_iter().collect();
//! let e = parse_formula("Or(And(A, B), And(A, Not(B)))", &symbols).unwrap();
//! assert_eq!(simplify(&e).unwrap().to_string(), "A");
//!
//! let witness = satisfiable(&e).unwrap().unwrap();
//! assert_eq!(e.evaluate(&witness), Some(true));
//! ```

use std::collections::BTreeMap;

use log::debug;
use num_bigint::BigUint;

use crate::bdd::{Bdd, Ref};
use crate::cube::Cube;
use crate::error::Result;
use crate::expr::{Assignment, Expr, Layer};
use crate::symbol::Var;

/// Default node budget for one analysis.
pub const DEFAULT_NODE_LIMIT: usize = 1 << 20;

/// Default number of cubes simplification may assemble, intermediate ones
/// included.
pub const DEFAULT_CUBE_LIMIT: usize = 1 << 16;

pub struct LogicAnalyzer {
    bdd: Bdd,
    root: Ref,
    cube_limit: Option<usize>,
    /// Variables in BDD order; `vars[i]` has BDD index `i + 1`.
    vars: Vec<Var>,
}

impl LogicAnalyzer {
    /// Compiles `expr` into a decision diagram of at most `node_limit` nodes.
    pub fn new(expr: &Expr, node_limit: Option<usize>) -> Result<Self> {
        let vars: Vec<Var> = expr.variables().into_iter().collect();
        let index: BTreeMap<&Var, u32> = vars.iter().enumerate().map(|(i, v)| (v, i as u32 + 1)).collect();

        let bdd = Bdd::new(node_limit);
        let root = expr.fold(&mut |layer: Layer<'_, Result<Ref>>| -> Result<Ref> {
            match layer {
                Layer::Const(true) => Ok(bdd.one()),
                Layer::Const(false) => Ok(bdd.zero()),
                Layer::Var(v) => bdd.mk_var(index[v]),
                Layer::Not(x) => bdd.apply_not(x?),
                Layer::And(xs) => xs.into_iter().try_fold(bdd.one(), |acc, x| bdd.apply_and(acc, x?)),
                Layer::Or(xs) => xs.into_iter().try_fold(bdd.zero(), |acc, x| bdd.apply_or(acc, x?)),
            }
        })?;
        debug!("LogicAnalyzer: {} variables, {} nodes", vars.len(), bdd.num_nodes());

        Ok(Self {
            bdd,
            root,
            cube_limit: Some(DEFAULT_CUBE_LIMIT),
            vars,
        })
    }

    /// Sets the cube budget of [`simplify`](Self::simplify); `None` for unbounded.
    pub fn with_cube_limit(mut self, cube_limit: Option<usize>) -> Self {
        self.cube_limit = cube_limit;
        self
    }

    /// Variables of the analyzed expression, ordered by name.
    pub fn variables(&self) -> &[Var] {
        &self.vars
    }

    fn var(&self, index: u32) -> &Var {
        &self.vars[index as usize - 1]
    }

    pub fn is_satisfiable(&self) -> bool {
        !self.bdd.is_zero(self.root)
    }

    pub fn is_tautology(&self) -> bool {
        self.bdd.is_one(self.root)
    }

    /// Returns a witness assigning every variable of the expression, or
    /// `None` if the expression is unsatisfiable.
    ///
    /// Variables the witness path leaves open are set to false.
    pub fn satisfiable(&self) -> Option<Assignment> {
        let path = self.bdd.one_sat(self.root)?;
        let mut assignment: Assignment = self.vars.iter().map(|v| (v.clone(), false)).collect();
        for (index, value) in path {
            assignment.set(self.var(index).clone(), value);
        }
        Some(assignment)
    }

    /// Number of satisfying assignments over the expression's variables.
    pub fn model_count(&self) -> BigUint {
        self.bdd.sat_count(self.root, self.vars.len())
    }

    /// Equivalent DNF: a disjunction of conjunctions of literals.
    ///
    /// Unsatisfiable input gives `False`, a tautology gives `True`.
    pub fn simplify(&self) -> Result<Expr> {
        if self.bdd.is_zero(self.root) {
            return Ok(Expr::Const(false));
        }
        if self.bdd.is_one(self.root) {
            return Ok(Expr::Const(true));
        }

        let (cover, pairs) = self.bdd.isop(self.root, self.root, self.cube_limit)?;
        debug_assert_eq!(cover, self.root);

        let mut cubes: Vec<Cube> = pairs.into_iter().filter_map(Cube::from_pairs).collect();
        cubes.sort();
        debug!("simplify: {} cubes", cubes.len());

        Ok(Expr::disjunction(cubes.iter().map(|cube| self.cube_to_expr(cube))))
    }

    fn cube_to_expr(&self, cube: &Cube) -> Expr {
        Expr::conjunction(cube.lits().map(|lit| Expr::literal(self.var(lit.var).clone(), lit.positive)))
    }
}

/// Simplifies `expr` to DNF with the default node budget.
pub fn simplify(expr: &Expr) -> Result<Expr> {
    LogicAnalyzer::new(expr, Some(DEFAULT_NODE_LIMIT))?.simplify()
}

/// Finds a satisfying assignment of `expr` with the default node budget.
pub fn satisfiable(expr: &Expr) -> Result<Option<Assignment>> {
    Ok(LogicAnalyzer::new(expr, Some(DEFAULT_NODE_LIMIT))?.satisfiable())
}

/// Checks whether two expressions agree on every assignment.
pub fn equivalent(a: &Expr, b: &Expr) -> Result<bool> {
    let diff = Expr::Or(vec![
        Expr::And(vec![a.clone(), Expr::not(b.clone())]),
        Expr::And(vec![Expr::not(a.clone()), b.clone()]),
    ]);
    Ok(!LogicAnalyzer::new(&diff, Some(DEFAULT_NODE_LIMIT))?.is_satisfiable())
}
