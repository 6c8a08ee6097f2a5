//! Format-agnostic node/edge graphs.
//!
//! Proof trees and circuit diagrams are handed to presentation code as a
//! [`Graph`]: nodes with an id, a label, an optional tooltip and link, plus
//! directed edges between node ids. Rendering (see [`crate::dot`]) is a
//! separate concern.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub tooltip: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    name: String,
    nodes: Vec<GraphNode>,
    edges: Vec<(String, String)>,
}

impl Graph {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Adds a node. Re-adding an existing id replaces its attributes but
    /// keeps its original position.
    pub fn add_node(&mut self, id: &str, label: &str, tooltip: Option<&str>, url: Option<&str>) {
        let node = GraphNode {
            id: id.to_string(),
            label: label.to_string(),
            tooltip: tooltip.map(str::to_string),
            url: url.map(str::to_string),
        };
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.push((from.to_string(), to.to_string()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }

    /// Ids of the direct successors of `id`, in edge insertion order.
    pub fn successors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges.iter().filter(move |(from, _)| from == id).map(|(_, to)| to.as_str())
    }

    /// Adjacency-list view: every node id with its successors.
    pub fn adjacency(&self) -> Vec<(&str, Vec<&str>)> {
        self.nodes
            .iter()
            .map(|n| (n.id.as_str(), self.successors(&n.id).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_replaces() {
        let mut g = Graph::new("g");
        g.add_node("a", "A", None, None);
        g.add_node("b", "B", None, None);
        g.add_node("a", "A2", Some("tip"), None);
        assert_eq!(g.nodes().len(), 2);
        assert_eq!(g.nodes()[0].label, "A2");
        assert_eq!(g.node("a").unwrap().tooltip.as_deref(), Some("tip"));
    }

    #[test]
    fn test_adjacency() {
        let mut g = Graph::new("g");
        g.add_node("a", "A", None, None);
        g.add_node("b", "B", None, None);
        g.add_node("c", "C", None, None);
        g.add_edge("a", "b");
        g.add_edge("a", "c");
        g.add_edge("b", "c");
        assert_eq!(g.adjacency(), vec![("a", vec!["b", "c"]), ("b", vec!["c"]), ("c", vec![])]);
        assert_eq!(g.successors("a").collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
