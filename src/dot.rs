//! Graph to DOT (Graphviz) conversion.
//!
//! Renders a [`Graph`] (a proof tree or a circuit diagram) as a DOT digraph
//! that can be fed to `dot`, `neato` or an online viewer.
//!
//! # DOT Format
//!
//! - Every graph node becomes a DOT node with its label.
//! - Tooltips and links (`URL`) are emitted when present, so that an SVG
//!   rendering has hoverable explanations and clickable anchors.
//! - Edges are directed, parent to child (or input to output).
//!
//! # Examples
//!
//! ```
//! use circuit_proof::dot::{to_dot, DotConfig};
//! use circuit_proof::graph::Graph;
//!
//! let mut g = Graph::new("example");
//! g.add_node("n0", "And(A, B)", Some("AND combines: A, B"), Some("#n0"));
//! g.add_node("n1", "A", None, None);
//! g.add_edge("n0", "n1");
//!
//! let dot = to_dot(&g, &DotConfig::default()).unwrap();
//! assert!(dot.starts_with("digraph"));
//! ```

use std::fmt::Write as _;

use crate::graph::Graph;

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings and struct-update syntax
/// to tweak individual fields.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for nodes (default: "box")
    pub node_shape: &'static str,
    /// Style for edges (default: "solid")
    pub edge_style: &'static str,
    /// Layout direction (default: "TB")
    pub rank_dir: &'static str,
    /// Whether to emit `tooltip` attributes (default: true)
    pub tooltips: bool,
    /// Whether to emit `URL` attributes (default: true)
    pub links: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "box",
            edge_style: "solid",
            rank_dir: "TB",
            tooltips: true,
            links: true,
        }
    }
}

/// Quotes a string for use as a DOT attribute value.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Converts a graph to DOT format.
///
/// # Returns
///
/// * `Ok(String)` - A DOT-formatted string representation of the graph
/// * `Err(std::fmt::Error)` - If string formatting fails (rare)
pub fn to_dot(graph: &Graph, config: &DotConfig) -> Result<String, std::fmt::Error> {
    let mut dot = String::new();
    writeln!(dot, "digraph {} {{", quote(graph.name()))?;
    writeln!(dot, "rankdir={};", config.rank_dir)?;
    writeln!(dot, "node [shape={}];", config.node_shape)?;
    writeln!(dot, "edge [style={}];", config.edge_style)?;

    for node in graph.nodes() {
        write!(dot, "{} [label={}", quote(&node.id), quote(&node.label))?;
        if let (true, Some(tooltip)) = (config.tooltips, &node.tooltip) {
            write!(dot, ", tooltip={}", quote(tooltip))?;
        }
        if let (true, Some(url)) = (config.links, &node.url) {
            write!(dot, ", URL={}", quote(url))?;
        }
        writeln!(dot, "];")?;
    }

    for (from, to) in graph.edges() {
        writeln!(dot, "{} -> {};", quote(from), quote(to))?;
    }

    writeln!(dot, "}}")?;
    Ok(dot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        let mut g = Graph::new("proof");
        g.add_node("n0", "Not(A)", Some("negation of: A"), Some("#n0"));
        g.add_node("n1", "A", Some("primitive output: A"), Some("#n1"));
        g.add_edge("n0", "n1");
        g
    }

    /// Basic test: verify DOT output is generated without errors
    #[test]
    fn test_to_dot_basic() {
        let dot = to_dot(&sample(), &DotConfig::default()).unwrap();
        assert!(dot.starts_with("digraph \"proof\" {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("\"n0\" -> \"n1\";"));
        assert!(dot.contains("tooltip=\"negation of: A\""));
        assert!(dot.contains("URL=\"#n1\""));
    }

    #[test]
    fn test_to_dot_without_links() {
        let config = DotConfig {
            tooltips: false,
            links: false,
            ..DotConfig::default()
        };
        let dot = to_dot(&sample(), &config).unwrap();
        assert!(!dot.contains("tooltip"));
        assert!(!dot.contains("URL"));
        assert!(dot.contains("\"n1\" [label=\"A\"];"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_empty_graph() {
        let dot = to_dot(&Graph::new("empty"), &DotConfig::default()).unwrap();
        assert_eq!(dot, "digraph \"empty\" {\nrankdir=TB;\nnode [shape=box];\nedge [style=solid];\n}\n");
    }

    /// Helper test to write DOT file for manual inspection (disabled by default)
    #[test]
    #[ignore]
    fn test_write_dot_file() {
        let dot = to_dot(&sample(), &DotConfig::default()).unwrap();
        std::fs::write("test_output.dot", &dot).unwrap();
        println!("DOT output:\n{}", dot);

        let output = std::process::Command::new("dot")
            .arg("-Tsvg")
            .arg("test_output.dot")
            .arg("-o")
            .arg("test_output.svg")
            .output();
        if let Ok(output) = output {
            if output.status.success() {
                println!("Generated test_output.svg");
            }
        }
    }
}
