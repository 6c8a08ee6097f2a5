//! Whole-circuit logic: the conjunction of every component definition.
//!
//! Definitions are conjoined as they are, in encounter order. An
//! intermediate output such as `Y1` stays a variable of the composed
//! expression; it is not replaced by the formula that drives it.

use log::debug;

use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::expr::Expr;

/// Composes the circuit into a single expression.
///
/// A circuit with a single component composes to that component's
/// expression; otherwise the result is an `And` with one operand per
/// component, in sub-circuit order and then component order.
pub fn compose(circuit: &Circuit) -> Result<Expr> {
    if circuit.is_empty() {
        return Err(Error::EmptyCircuit);
    }
    let logic = Expr::conjunction(circuit.components().map(|c| c.expr().clone()));
    debug!("composed {} components into {} nodes", circuit.num_components(), logic.size());
    Ok(logic)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::circuit::{ComponentDef, SubCircuitDef};

    #[test]
    fn test_compose_preserves_order() {
        let circuit = Circuit::new(vec![
            SubCircuitDef::new(
                "SC1",
                vec![
                    ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = And(A,B)", 0),
                    ComponentDef::new("C2", &["Y1", "C"], "Y2", "Y2 = Or(Y1,C)", 1),
                ],
            ),
            SubCircuitDef::new("SC2", vec![ComponentDef::new("C1", &["Y2"], "Y3", "Y3 = Not(Y2)", 0)]),
        ])
        .unwrap();
        let logic = compose(&circuit).unwrap();
        assert_eq!(logic.to_string(), "And(And(A, B), Or(Y1, C), Not(Y2))");
    }

    #[test]
    fn test_compose_single() {
        let circuit = Circuit::new(vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &["A"], "Y1", "Y1 = Not(A)", 2)],
        )])
        .unwrap();
        assert_eq!(compose(&circuit).unwrap().to_string(), "Not(A)");
    }

    #[test]
    fn test_compose_empty() {
        let circuit = Circuit::new(vec![SubCircuitDef::new("SC1", vec![])]).unwrap();
        assert_eq!(compose(&circuit), Err(Error::EmptyCircuit));
        assert_eq!(compose(&Circuit::new(vec![]).unwrap()), Err(Error::EmptyCircuit));
    }
}
