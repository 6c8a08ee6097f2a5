//! Proof trees: structural decomposition of an expression.
//!
//! Every subexpression becomes a [`ProofNode`] carrying its textual form and
//! a short explanation of how it is built from its operands. Ids are
//! assigned in pre-order (a node before its children, children in argument
//! order), so building the tree twice from the same expression yields the
//! same ids and external anchors such as `#n3` stay valid.

use std::fmt;

use log::debug;

use crate::expr::Expr;
use crate::graph::Graph;

/// Pre-order position of a node within its tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ProofNodeId(usize);

impl ProofNodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProofNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofNode {
    pub id: ProofNodeId,
    pub label: String,
    pub explanation: String,
    pub children: Vec<ProofNodeId>,
}

impl ProofNode {
    /// Link target for this node, e.g. `#n0`.
    pub fn anchor(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Nodes stored in pre-order; the root is the first node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofTree {
    nodes: Vec<ProofNode>,
}

impl ProofTree {
    pub fn root(&self) -> &ProofNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: ProofNodeId) -> Option<&ProofNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[ProofNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: ProofNodeId) -> impl Iterator<Item = &ProofNode> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .map(move |c| &self.nodes[c.0])
    }

    /// Parent-to-child edges, in pre-order of the parents.
    pub fn edges(&self) -> impl Iterator<Item = (ProofNodeId, ProofNodeId)> + '_ {
        self.nodes.iter().flat_map(|n| n.children.iter().map(move |&c| (n.id, c)))
    }

    /// Graph view: the explanation becomes the tooltip and the anchor the link.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new("proof");
        for node in &self.nodes {
            let id = node.id.to_string();
            graph.add_node(&id, &node.label, Some(&node.explanation), Some(&node.anchor()));
        }
        for (from, to) in self.edges() {
            graph.add_edge(&from.to_string(), &to.to_string());
        }
        graph
    }
}

fn list(operands: &[Expr]) -> String {
    operands.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

fn explain(expr: &Expr) -> String {
    match expr {
        Expr::Const(b) => format!("constant: {}", Expr::Const(*b)),
        Expr::Var(v) => format!("primitive output: {}", v),
        Expr::And(args) => format!("AND combines: {}", list(args)),
        Expr::Or(args) => format!("OR combines: {}", list(args)),
        Expr::Not(arg) => format!("negation of: {}", arg),
    }
}

/// Decomposes `expr` into a proof tree without modifying it.
pub fn build(expr: &Expr) -> ProofTree {
    let mut nodes: Vec<ProofNode> = Vec::with_capacity(expr.size());
    let mut stack: Vec<(&Expr, Option<ProofNodeId>)> = vec![(expr, None)];

    while let Some((current, parent)) = stack.pop() {
        let id = ProofNodeId(nodes.len());
        nodes.push(ProofNode {
            id,
            label: current.to_string(),
            explanation: explain(current),
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            nodes[parent.0].children.push(id);
        }
        // Reversed, so that the first operand is popped (and numbered) first.
        for child in current.operands().iter().rev() {
            stack.push((child, Some(id)));
        }
    }

    debug!("proof tree with {} nodes", nodes.len());
    ProofTree { nodes }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_log::test;

    use super::*;
    use crate::parser::parse_formula;
    use crate::symbol::{SymbolTable, Var};

    fn parse(text: &str) -> Expr {
        let symbols: SymbolTable = ["A", "B", "C", "Y1"].into_iter().collect();
        parse_formula(text, &symbols).unwrap()
    }

    #[test]
    fn test_build_preorder() {
        let tree = build(&parse("And(And(A, B), Or(Y1, C))"));
        let labels: Vec<_> = tree.nodes().iter().map(|n| (n.id.to_string(), n.label.as_str())).collect();
        assert_eq!(
            labels,
            vec![
                ("n0".to_string(), "And(And(A, B), Or(Y1, C))"),
                ("n1".to_string(), "And(A, B)"),
                ("n2".to_string(), "A"),
                ("n3".to_string(), "B"),
                ("n4".to_string(), "Or(Y1, C)"),
                ("n5".to_string(), "Y1"),
                ("n6".to_string(), "C"),
            ]
        );
        assert_eq!(tree.root().children, vec![ProofNodeId(1), ProofNodeId(4)]);
        assert_eq!(tree.root().explanation, "AND combines: And(A, B), Or(Y1, C)");
        assert_eq!(tree.nodes()[4].explanation, "OR combines: Y1, C");
        assert_eq!(tree.nodes()[2].explanation, "primitive output: A");
    }

    #[test]
    fn test_negation() {
        let tree = build(&parse("Not(Or(A, B))"));
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().explanation, "negation of: Or(A, B)");
        assert_eq!(tree.children(ProofNodeId(0)).count(), 1);
    }

    #[test]
    fn test_constant_leaf() {
        let tree = build(&Expr::Const(true));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().explanation, "constant: True");
    }

    #[test]
    fn test_to_graph() {
        let tree = build(&parse("Not(A)"));
        let graph = tree.to_graph();
        assert_eq!(graph.edges(), &[("n0".to_string(), "n1".to_string())]);
        let root = graph.node("n0").unwrap();
        assert_eq!(root.url.as_deref(), Some("#n0"));
        assert_eq!(root.tooltip.as_deref(), Some("negation of: A"));
    }

    fn arb_expr() -> impl Strategy<Value = Expr> {
        let leaf = prop::sample::select(vec!["A", "B", "C"]).prop_map(|n| Expr::Var(Var::new(n)));
        leaf.prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(Expr::not),
                prop::collection::vec(inner.clone(), 2..4).prop_map(Expr::And),
                prop::collection::vec(inner, 2..4).prop_map(Expr::Or),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_deterministic(e in arb_expr()) {
            let first = build(&e);
            let second = build(&e);
            prop_assert_eq!(first.len(), e.size());
            prop_assert_eq!(first.edges().count(), e.size() - 1);
            prop_assert_eq!(first, second);
        }
    }
}
