//! One analysis run over a circuit.
//!
//! [`analyze`] chains the stages: compose, simplify and check
//! satisfiability, simulate, and build the proof tree. The run is a pure
//! function of the circuit and the configuration; the first failing stage
//! ends it.

use std::fmt;

use log::info;
use num_bigint::BigUint;

use crate::analysis::{LogicAnalyzer, DEFAULT_CUBE_LIMIT, DEFAULT_NODE_LIMIT};
use crate::circuit::Circuit;
use crate::compose::compose;
use crate::error::Result;
use crate::expr::{Assignment, Expr};
use crate::proof::{self, ProofTree};
use crate::simulate::{simulate, SimulationTable};

/// Options for a single analysis run.
///
/// Use `AnalysisConfig::default()` and struct-update syntax to change
/// individual fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Number of simulated time steps (default: 3)
    pub steps: usize,
    /// Decision diagram node budget; `None` for unbounded (default: 2^20)
    pub node_limit: Option<usize>,
    /// Number of cubes simplification may assemble; `None` for unbounded (default: 2^16)
    pub cube_limit: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            steps: 3,
            node_limit: Some(DEFAULT_NODE_LIMIT),
            cube_limit: Some(DEFAULT_CUBE_LIMIT),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    /// The composed circuit logic.
    pub logic: Expr,
    /// DNF equivalent of `logic`.
    pub simplified: Expr,
    /// A satisfying assignment, if there is one.
    pub witness: Option<Assignment>,
    /// Number of satisfying assignments over the variables of `logic`.
    pub model_count: BigUint,
    pub table: SimulationTable,
    pub proof: ProofTree,
}

impl Analysis {
    pub fn is_satisfiable(&self) -> bool {
        self.witness.is_some()
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "logic: {}", self.logic)?;
        writeln!(f, "simplified: {}", self.simplified)?;
        match &self.witness {
            Some(witness) => writeln!(f, "satisfiable: {}", witness)?,
            None => writeln!(f, "unsatisfiable")?,
        }
        writeln!(f, "models: {}", self.model_count)?;
        write!(f, "{}", self.table)
    }
}

/// Runs the full analysis of `circuit`.
pub fn analyze(circuit: &Circuit, config: &AnalysisConfig) -> Result<Analysis> {
    info!(
        "analyzing circuit: {} sub-circuits, {} components, {} signals",
        circuit.sub_circuits().len(),
        circuit.num_components(),
        circuit.symbols().len()
    );

    let logic = compose(circuit)?;

    let analyzer = LogicAnalyzer::new(&logic, config.node_limit)?.with_cube_limit(config.cube_limit);
    let simplified = analyzer.simplify()?;
    let witness = analyzer.satisfiable();
    let model_count = analyzer.model_count();

    let delays = circuit.delays().into_iter().map(|(var, d)| (var, d as i64));
    let table = simulate(circuit.variables(), delays, config.steps)?;

    let proof = proof::build(&logic);

    info!(
        "analysis done: {}, {} models, {} proof nodes",
        if witness.is_some() { "satisfiable" } else { "unsatisfiable" },
        model_count,
        proof.len()
    );
    Ok(Analysis {
        logic,
        simplified,
        witness,
        model_count,
        table,
        proof,
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::circuit::{ComponentDef, SubCircuitDef};
    use crate::error::Error;

    fn circuit(components: Vec<ComponentDef>) -> Circuit {
        Circuit::new(vec![SubCircuitDef::new("SC1", components)]).unwrap()
    }

    #[test]
    fn test_analyze_unsatisfiable() {
        let c = circuit(vec![
            ComponentDef::new("C1", &["A"], "Y1", "Y1 = And(A, Not(A))", 1),
        ]);
        let analysis = analyze(&c, &AnalysisConfig::default()).unwrap();
        assert!(!analysis.is_satisfiable());
        assert_eq!(analysis.simplified, Expr::Const(false));
        assert_eq!(analysis.model_count, BigUint::from(0u32));
        assert_eq!(analysis.table.bits("Y1"), Some(vec![0, 1, 1]));
    }

    #[test]
    fn test_analyze_steps() {
        let c = circuit(vec![ComponentDef::new("C1", &["A"], "Y1", "Y1 = Not(A)", 4)]);
        let config = AnalysisConfig {
            steps: 5,
            ..AnalysisConfig::default()
        };
        let analysis = analyze(&c, &config).unwrap();
        assert_eq!(analysis.table.steps(), 5);
        assert_eq!(analysis.table.bits("Y1"), Some(vec![0, 0, 0, 0, 1]));
    }

    #[test]
    fn test_analyze_node_limit() {
        let c = circuit(vec![ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = Or(A, B)", 0)]);
        let config = AnalysisConfig {
            node_limit: Some(2),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            analyze(&c, &config).unwrap_err(),
            Error::AnalysisTimeout {
                resource: "node",
                limit: 2
            }
        );
    }

    #[test]
    fn test_analyze_cube_limit() {
        // Nine independent OR gates: the composed logic has a 512-term DNF.
        let sub_circuits = (0..3)
            .map(|s| {
                let components = (1..=3)
                    .map(|c| {
                        let i = 3 * s + c;
                        let (a, b, y) = (format!("A{}", i), format!("B{}", i), format!("Y{}", i));
                        let definition = format!("{} = Or({}, {})", y, a, b);
                        ComponentDef::new(&format!("C{}", i), &[a.as_str(), b.as_str()], &y, &definition, 1)
                    })
                    .collect();
                SubCircuitDef::new(&format!("SC{}", s + 1), components)
            })
            .collect();
        let c = Circuit::new(sub_circuits).unwrap();
        let logic = compose(&c).unwrap();
        assert!(LogicAnalyzer::new(&logic, Some(DEFAULT_NODE_LIMIT)).is_ok());

        let config = AnalysisConfig {
            cube_limit: Some(100),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            analyze(&c, &config).unwrap_err(),
            Error::AnalysisTimeout {
                resource: "cube",
                limit: 100
            }
        );
        assert!(analyze(&c, &AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn test_analysis_display() {
        let c = circuit(vec![ComponentDef::new("C1", &["A"], "Y1", "Y1 = Not(A)", 2)]);
        let text = analyze(&c, &AnalysisConfig::default()).unwrap().to_string();
        assert!(text.starts_with("logic: Not(A)\nsimplified: Not(A)\nsatisfiable: A=0\nmodels: 1\n"));
    }
}
