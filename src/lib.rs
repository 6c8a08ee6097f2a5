//! # circuit-proof: Logic Analysis for Small Combinational Circuits
//!
//! **`circuit-proof`** takes a circuit described as sub-circuits of components, each defined by a
//! function-style Boolean formula such as `Y2 = Or(Y1, C)` and an integer delay, and answers questions about it:
//! what the whole circuit computes, whether it can be satisfied, how its outputs settle over time,
//! and how its logic decomposes into an explainable tree.
//!
//! ## Pipeline
//!
//! 1. **Parse and bind**: formulas are parsed by the combinator-based [`parser`] into [`Expr`][crate::expr::Expr]
//!    trees whose leaves are shared [`Var`][crate::symbol::Var] symbols. No formula text is ever evaluated as code.
//! 2. **Compose**: the [`compose`] step conjoins every component definition, in encounter order.
//! 3. **Analyze**: the [`analysis`] module compiles the composed logic into a reduced ordered [`bdd`],
//!    simplifies it to DNF (see [`cube`]), finds a witness and counts models.
//! 4. **Simulate**: [`simulate`] produces a table of signal values per time step.
//! 5. **Explain**: [`proof`] decomposes the logic into a tree with stable pre-order ids,
//!    exposed as an abstract [`graph`] that [`dot`] renders for Graphviz.
//!
//! The [`engine`] module runs all of the above in one call.
//!
//! ## Basic Usage
//!
//! ```rust
//! use circuit_proof::circuit::{Circuit, ComponentDef, SubCircuitDef};
//! use circuit_proof::engine::{analyze, AnalysisConfig};
//!
//! let circuit = Circuit::new(vec![SubCircuitDef::new(
//!     "SC1",
//!     vec![
//!         ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = And(A,B)", 0),
//!         ComponentDef::new("C2", &["Y1", "C"], "Y2", "Y2 = Or(Y1,C)", 1),
//!     ],
//! )])
//! .unwrap();
//!
//! let analysis = analyze(&circuit, &AnalysisConfig::default()).unwrap();
//!
//! // The witness satisfies the composed logic
//! let witness = analysis.witness.as_ref().unwrap();
//! assert_eq!(analysis.logic.evaluate(witness), Some(true));
//!
//! // Y2 has delay 1: low at t=0, high afterwards
//! assert_eq!(analysis.table.bits("Y2"), Some(vec![0, 1, 1]));
//! ```
//!
//! ## Errors
//!
//! Every failure is an [`Error`][crate::error::Error] and ends the run. There are no partial results.

pub mod analysis;
pub mod bdd;
pub mod circuit;
pub mod compose;
pub mod cube;
pub mod dot;
pub mod engine;
pub mod error;
pub mod expr;
pub mod graph;
pub mod parser;
pub mod proof;
pub mod simulate;
pub mod symbol;

pub use error::{Error, Result};
