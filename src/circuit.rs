//! Hierarchical circuit model.
//!
//! A [`Circuit`] holds named sub-circuits, each owning named components. It is
//! built in one step from plain definitions ([`SubCircuitDef`]) supplied by the
//! caller. Building validates names and delays, interns every signal in one
//! [`SymbolTable`], and binds each component's defining expression against it.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::graph::Graph;
use crate::parser::parse_definition;
use crate::symbol::{SymbolTable, Var};

/// Raw definition of one component, as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDef {
    pub name: String,
    pub inputs: Vec<String>,
    pub output: String,
    /// Defining expression, `OUTPUT = FORMULA`.
    pub expression: String,
    pub delay: i64,
}

impl ComponentDef {
    pub fn new(name: &str, inputs: &[&str], output: &str, expression: &str, delay: i64) -> Self {
        Self {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: output.to_string(),
            expression: expression.to_string(),
            delay,
        }
    }
}

/// Raw definition of a named group of components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCircuitDef {
    pub name: String,
    pub components: Vec<ComponentDef>,
}

impl SubCircuitDef {
    pub fn new(name: &str, components: Vec<ComponentDef>) -> Self {
        Self {
            name: name.to_string(),
            components,
        }
    }
}

/// A bound component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    name: String,
    inputs: Vec<Var>,
    output: Var,
    /// Original definition text, kept for display.
    text: String,
    expr: Expr,
    delay: u64,
}

impl Component {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn inputs(&self) -> &[Var] {
        &self.inputs
    }
    pub fn output(&self) -> &Var {
        &self.output
    }
    /// The bound right-hand side of the defining expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Right-hand side of the definition text, trimmed.
    pub fn formula_text(&self) -> &str {
        match self.text.split_once('=') {
            Some((_, rhs)) => rhs.trim(),
            None => self.text.trim(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCircuit {
    name: String,
    components: Vec<Component>,
}

impl SubCircuit {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn components(&self) -> &[Component] {
        &self.components
    }
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Circuit {
    sub_circuits: Vec<SubCircuit>,
    symbols: SymbolTable,
}

fn signal_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidComponent {
            reason: "empty signal name".to_string(),
        });
    }
    Ok(name)
}

fn check_component(def: &ComponentDef) -> Result<()> {
    if def.inputs.is_empty() {
        return Err(Error::InvalidComponent {
            reason: "component has no inputs".to_string(),
        });
    }
    for input in &def.inputs {
        signal_name(input)?;
    }
    signal_name(&def.output)?;
    if def.delay < 0 {
        return Err(Error::InvalidDelay {
            signal: def.output.trim().to_string(),
            delay: def.delay,
        });
    }
    Ok(())
}

impl Circuit {
    /// Builds and binds a circuit from its definitions.
    ///
    /// Fails with [`Error::DuplicateName`] before anything is parsed when two
    /// sub-circuits, or two components of one sub-circuit, share a name.
    /// Per-component failures are wrapped in [`Error::Component`].
    pub fn new(defs: Vec<SubCircuitDef>) -> Result<Self> {
        let mut seen = HashSet::new();
        for sc in &defs {
            if !seen.insert(sc.name.as_str()) {
                return Err(Error::DuplicateName {
                    kind: "sub-circuit",
                    name: sc.name.clone(),
                });
            }
            let mut seen_components = HashSet::new();
            for c in &sc.components {
                if !seen_components.insert(c.name.as_str()) {
                    return Err(Error::DuplicateName {
                        kind: "component",
                        name: c.name.clone(),
                    });
                }
            }
        }

        // Every input and output of every component declares a signal.
        let mut symbols = SymbolTable::new();
        for sc in &defs {
            for c in &sc.components {
                check_component(c).map_err(|e| e.in_component(&sc.name, &c.name))?;
                for input in &c.inputs {
                    symbols.intern(input.trim());
                }
                symbols.intern(c.output.trim());
            }
        }

        let mut sub_circuits = Vec::with_capacity(defs.len());
        for sc in defs {
            let mut components = Vec::with_capacity(sc.components.len());
            for c in sc.components {
                let name = c.name.clone();
                let component = Self::bind(c, &symbols).map_err(|e| e.in_component(&sc.name, &name))?;
                components.push(component);
            }
            sub_circuits.push(SubCircuit {
                name: sc.name,
                components,
            });
        }

        debug!(
            "built circuit with {} sub-circuits and {} signals",
            sub_circuits.len(),
            symbols.len()
        );
        Ok(Self { sub_circuits, symbols })
    }

    fn bind(def: ComponentDef, symbols: &SymbolTable) -> Result<Component> {
        let definition = parse_definition(&def.expression, symbols)?;
        let output = symbols.get(def.output.trim()).cloned().ok_or_else(|| Error::UnknownVariable {
            name: def.output.trim().to_string(),
        })?;
        if definition.output != output {
            return Err(Error::malformed(
                format!(
                    "left-hand side `{}` does not name output `{}`",
                    definition.output, output
                ),
                0,
            ));
        }

        let inputs = def
            .inputs
            .iter()
            .filter_map(|name| symbols.get(name.trim()).cloned())
            .collect();
        Ok(Component {
            name: def.name,
            inputs,
            output,
            text: def.expression,
            expr: definition.formula,
            delay: def.delay as u64,
        })
    }
}

// Getters
impl Circuit {
    pub fn sub_circuits(&self) -> &[SubCircuit] {
        &self.sub_circuits
    }

    pub fn sub_circuit(&self, name: &str) -> Option<&SubCircuit> {
        self.sub_circuits.iter().find(|sc| sc.name == name)
    }

    /// Looks up a component by sub-circuit name and component name.
    pub fn component(&self, sub_circuit: &str, name: &str) -> Option<&Component> {
        self.sub_circuit(sub_circuit)?.component(name)
    }

    /// All components in encounter order: sub-circuit order, then component
    /// order within each sub-circuit.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.sub_circuits.iter().flat_map(|sc| sc.components.iter())
    }

    pub fn num_components(&self) -> usize {
        self.sub_circuits.iter().map(|sc| sc.components.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.num_components() == 0
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The variable universe: every input and output of every component,
    /// ordered by name.
    pub fn variables(&self) -> BTreeSet<Var> {
        self.symbols.iter().cloned().collect()
    }

    /// Output signals with their delays. When several components drive the
    /// same output, the one encountered last wins.
    pub fn delays(&self) -> BTreeMap<Var, u64> {
        let mut delays = BTreeMap::new();
        for c in self.components() {
            if let Some(previous) = delays.insert(c.output.clone(), c.delay) {
                warn!(
                    "output `{}` redefined by component `{}` (delay {} replaces {})",
                    c.output, c.name, c.delay, previous
                );
            }
        }
        delays
    }

    /// Display form of the composed circuit: the right-hand sides of all
    /// definitions joined with ` & `.
    pub fn top_level_text(&self) -> String {
        self.components()
            .map(|c| c.formula_text())
            .collect::<Vec<_>>()
            .join(" & ")
    }

    /// Signal-flow graph: one node per signal, an edge from every input to
    /// the output of its component. Output nodes show their delay.
    pub fn to_graph(&self) -> Graph {
        let delays = self.delays();
        let mut graph = Graph::new("circuit");
        for var in self.variables() {
            let label = match delays.get(&var) {
                Some(d) => format!("{} ({}t)", var, d),
                None => var.to_string(),
            };
            graph.add_node(var.name(), &label, None, None);
        }
        for c in self.components() {
            for input in &c.inputs {
                graph.add_edge(input.name(), c.output.name());
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn scenario() -> Vec<SubCircuitDef> {
        vec![SubCircuitDef::new(
            "SC1",
            vec![
                ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = And(A,B)", 0),
                ComponentDef::new("C2", &["Y1", "C"], "Y2", "Y2 = Or(Y1,C)", 1),
            ],
        )]
    }

    #[test]
    fn test_build() {
        let circuit = Circuit::new(scenario()).unwrap();
        assert_eq!(circuit.num_components(), 2);
        let names: Vec<&str> = circuit.components().map(|c| c.name()).collect();
        assert_eq!(names, vec!["C1", "C2"]);

        let c2 = circuit.component("SC1", "C2").unwrap();
        assert_eq!(c2.output().name(), "Y2");
        assert_eq!(c2.delay(), 1);
        assert_eq!(c2.inputs(), &[Var::new("Y1"), Var::new("C")]);
        assert_eq!(c2.expr().to_string(), "Or(Y1, C)");
        assert!(circuit.component("SC1", "C3").is_none());
        assert!(circuit.component("SC2", "C1").is_none());
    }

    #[test]
    fn test_variables_shared() {
        let circuit = Circuit::new(scenario()).unwrap();
        let names: Vec<String> = circuit.variables().iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["A", "B", "C", "Y1", "Y2"]);

        let c1 = circuit.component("SC1", "C1").unwrap();
        let c2 = circuit.component("SC1", "C2").unwrap();
        assert!(c1.output().ptr_eq(&c2.inputs()[0]));
    }

    #[test]
    fn test_duplicate_component() {
        let defs = vec![SubCircuitDef::new(
            "SC1",
            vec![
                ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = And(A,B)", 0),
                ComponentDef::new("C1", &["A"], "Y2", "Y2 = Not(A)", 0),
            ],
        )];
        let err = Circuit::new(defs).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateName {
                kind: "component",
                name: "C1".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_sub_circuit() {
        let defs = vec![
            SubCircuitDef::new("SC", vec![ComponentDef::new("C1", &["A"], "Y1", "Y1 = Not(A)", 0)]),
            SubCircuitDef::new("SC", vec![ComponentDef::new("C2", &["A"], "Y2", "Y2 = Not(A)", 0)]),
        ];
        let err = Circuit::new(defs).unwrap_err();
        assert!(matches!(err, Error::DuplicateName { kind: "sub-circuit", .. }));
    }

    #[test]
    fn test_same_component_name_in_different_sub_circuits() {
        let defs = vec![
            SubCircuitDef::new("SC1", vec![ComponentDef::new("C", &["A"], "Y1", "Y1 = Not(A)", 0)]),
            SubCircuitDef::new("SC2", vec![ComponentDef::new("C", &["A"], "Y2", "Y2 = Not(A)", 0)]),
        ];
        let circuit = Circuit::new(defs).unwrap();
        assert_eq!(circuit.num_components(), 2);
    }

    #[test]
    fn test_negative_delay() {
        let defs = vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &["A"], "Y1", "Y1 = Not(A)", -1)],
        )];
        let err = Circuit::new(defs).unwrap_err();
        assert!(matches!(err.root_cause(), Error::InvalidDelay { delay: -1, .. }));
    }

    #[test]
    fn test_unknown_variable_in_component() {
        let defs = vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &["A", "B"], "Y1", "Y1 = And(A,D)", 0)],
        )];
        let err = Circuit::new(defs).unwrap_err();
        assert!(matches!(err, Error::Component { ref component, .. } if component == "C1"));
        assert_eq!(err.root_cause(), &Error::UnknownVariable { name: "D".to_string() });
    }

    #[test]
    fn test_output_mismatch() {
        let defs = vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &["A", "B"], "Y1", "B = And(A,B)", 0)],
        )];
        let err = Circuit::new(defs).unwrap_err();
        assert!(matches!(err.root_cause(), Error::MalformedExpression { .. }));
    }

    #[test]
    fn test_invalid_component() {
        let no_inputs = vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &[], "Y1", "Y1 = Not(A)", 0)],
        )];
        let err = Circuit::new(no_inputs).unwrap_err();
        assert!(matches!(err.root_cause(), Error::InvalidComponent { .. }));

        let blank_input = vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &["A", " "], "Y1", "Y1 = Not(A)", 0)],
        )];
        let err = Circuit::new(blank_input).unwrap_err();
        assert!(matches!(err.root_cause(), Error::InvalidComponent { .. }));
    }

    #[test]
    fn test_input_names_trimmed() {
        let defs = vec![SubCircuitDef::new(
            "SC1",
            vec![ComponentDef::new("C1", &["A", " B"], "Y1", "Y1 = And(A, B)", 0)],
        )];
        let circuit = Circuit::new(defs).unwrap();
        assert!(circuit.symbols().contains("B"));
        assert!(!circuit.symbols().contains(" B"));
    }

    #[test]
    fn test_delays_last_wins() {
        let defs = vec![SubCircuitDef::new(
            "SC1",
            vec![
                ComponentDef::new("C1", &["A"], "Y", "Y = Not(A)", 1),
                ComponentDef::new("C2", &["B"], "Y", "Y = Not(B)", 2),
            ],
        )];
        let circuit = Circuit::new(defs).unwrap();
        assert_eq!(circuit.delays().get(&Var::new("Y")), Some(&2));
    }

    #[test]
    fn test_top_level_text() {
        let circuit = Circuit::new(scenario()).unwrap();
        assert_eq!(circuit.top_level_text(), "And(A,B) & Or(Y1,C)");
    }

    #[test]
    fn test_to_graph() {
        let circuit = Circuit::new(scenario()).unwrap();
        let graph = circuit.to_graph();
        assert_eq!(graph.nodes().len(), 5);
        assert_eq!(graph.node("Y2").unwrap().label, "Y2 (1t)");
        assert_eq!(graph.node("A").unwrap().label, "A");
        assert_eq!(
            graph.edges(),
            &[
                ("A".to_string(), "Y1".to_string()),
                ("B".to_string(), "Y1".to_string()),
                ("Y1".to_string(), "Y2".to_string()),
                ("C".to_string(), "Y2".to_string()),
            ]
        );
    }
}
