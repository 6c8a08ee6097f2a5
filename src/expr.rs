//! Immutable logic expressions over named signals.
//!
//! An [`Expr`] is a finite tree of `And`/`Or`/`Not` nodes with [`Var`] leaves.
//! Equality is structural. The textual form produced by [`Display`] uses the
//! same function-style syntax the parser accepts, e.g. `And(A, Or(B, Not(C)))`,
//! so printing and re-parsing yields a structurally identical tree.
//!
//! [`Display`]: std::fmt::Display

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::symbol::Var;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    /// Constant truth value. Only produced by simplification.
    Const(bool),
    Var(Var),
    /// Conjunction of at least two operands, in argument order.
    And(Vec<Expr>),
    /// Disjunction of at least two operands, in argument order.
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

/// One layer of an expression with children already folded into `R`.
pub enum Layer<'a, R> {
    Const(bool),
    Var(&'a Var),
    And(Vec<R>),
    Or(Vec<R>),
    Not(R),
}

// Constructors
impl Expr {
    pub fn var(var: Var) -> Self {
        Expr::Var(var)
    }

    pub fn not(value: Self) -> Self {
        Expr::Not(Box::new(value))
    }

    /// Conjunction of `operands`, collapsing the degenerate cases:
    /// no operands is `True`, a single operand is returned as is.
    pub fn conjunction(operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut operands: Vec<Expr> = operands.into_iter().collect();
        match operands.len() {
            0 => Expr::Const(true),
            1 => operands.remove(0),
            _ => Expr::And(operands),
        }
    }

    /// Disjunction of `operands`: no operands is `False`, one is returned as is.
    pub fn disjunction(operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut operands: Vec<Expr> = operands.into_iter().collect();
        match operands.len() {
            0 => Expr::Const(false),
            1 => operands.remove(0),
            _ => Expr::Or(operands),
        }
    }

    /// A literal: `var` or `Not(var)`.
    pub fn literal(var: Var, positive: bool) -> Self {
        if positive {
            Expr::Var(var)
        } else {
            Expr::not(Expr::Var(var))
        }
    }
}

// Getters
impl Expr {
    /// Immediate operands, in argument order.
    pub fn operands(&self) -> &[Expr] {
        match self {
            Expr::Const(_) | Expr::Var(_) => &[],
            Expr::And(args) | Expr::Or(args) => args,
            Expr::Not(arg) => std::slice::from_ref(arg.as_ref()),
        }
    }

    /// All variables occurring in the expression, ordered by name.
    pub fn variables(&self) -> BTreeSet<Var> {
        let mut vars = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Var(v) => {
                    vars.insert(v.clone());
                }
                _ => stack.extend(expr.operands()),
            }
        }
        vars
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.fold(&mut |layer: Layer<'_, usize>| match layer {
            Layer::Const(_) | Layer::Var(_) => 1,
            Layer::And(xs) | Layer::Or(xs) => 1 + xs.into_iter().sum::<usize>(),
            Layer::Not(x) => 1 + x,
        })
    }
}

impl Expr {
    /// Bottom-up fold over the tree. Children are folded in argument order
    /// before their parent.
    pub fn fold<R, F>(&self, f: &mut F) -> R
    where
        F: FnMut(Layer<'_, R>) -> R,
    {
        let layer = match self {
            Expr::Const(b) => Layer::Const(*b),
            Expr::Var(v) => Layer::Var(v),
            Expr::And(args) => Layer::And(args.iter().map(|a| a.fold(&mut *f)).collect()),
            Expr::Or(args) => Layer::Or(args.iter().map(|a| a.fold(&mut *f)).collect()),
            Expr::Not(arg) => Layer::Not(arg.fold(f)),
        };
        f(layer)
    }

    /// Evaluates the expression under `assignment`.
    ///
    /// Returns `None` if some variable of the expression is unassigned.
    pub fn evaluate(&self, assignment: &Assignment) -> Option<bool> {
        self.fold(&mut |layer: Layer<'_, Option<bool>>| match layer {
            Layer::Const(b) => Some(b),
            Layer::Var(v) => assignment.get(v),
            Layer::And(xs) => xs.into_iter().try_fold(true, |acc, x| Some(acc & x?)),
            Layer::Or(xs) => xs.into_iter().try_fold(false, |acc, x| Some(acc | x?)),
            Layer::Not(x) => x.map(|x| !x),
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_args(f: &mut fmt::Formatter<'_>, name: &str, args: &[Expr]) -> fmt::Result {
            write!(f, "{}(", name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ")")
        }

        match self {
            Expr::Const(true) => write!(f, "True"),
            Expr::Const(false) => write!(f, "False"),
            Expr::Var(v) => write!(f, "{}", v),
            Expr::And(args) => write_args(f, "And", args),
            Expr::Or(args) => write_args(f, "Or", args),
            Expr::Not(arg) => write!(f, "Not({})", arg),
        }
    }
}

/// A truth assignment to named signals, ordered by name.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Assignment(BTreeMap<Var, bool>);

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, var: Var, value: bool) {
        self.0.insert(var, value);
    }

    pub fn get(&self, var: &Var) -> Option<bool> {
        self.0.get(var).copied()
    }

    /// Value of the signal with the given name, if assigned.
    pub fn value_of(&self, name: &str) -> Option<bool> {
        self.get(&Var::new(name))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, bool)> {
        self.0.iter().map(|(v, &b)| (v, b))
    }
}

impl FromIterator<(Var, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        Assignment(iter.into_iter().collect())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", var, value as u8)?;
        }
        Ok(())
    }
}
