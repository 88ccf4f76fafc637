//! Record of the dependency edges discovered during a walk.
//!
//! The walk itself only needs the visited set; this graph keeps the edges
//! as well so callers can inspect cycles or render the closure.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Write;

/// Directed graph of base names; an edge `a -> b` means `a` depends on `b`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning the existing index if the name is known.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(name) {
            return node;
        }
        let node = self.graph.add_node(name.to_string());
        self.name_to_node.insert(name.to_string(), node);
        node
    }

    /// Record that `from` depends on `to`. Duplicate edges are ignored.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        if self.graph.find_edge(from, to).is_none() {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Number of base names in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the discovered dependencies contain a cycle.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Direct dependencies of `name`, in the order they were discovered.
    #[must_use]
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let Some(&node) = self.name_to_node.get(name) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges(node).collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| self.graph[edge.target()].as_str())
            .collect()
    }

    /// Render as a Graphviz digraph, labelling nodes with `label(name)`.
    #[must_use]
    pub fn to_dot(&self, label: impl Fn(&str) -> String) -> String {
        let mut out = String::from("digraph closure {\n");
        for node in self.graph.node_indices() {
            let _ = writeln!(out, "    {};", quote(&label(&self.graph[node])));
        }
        for edge in self.graph.edge_references() {
            let _ = writeln!(
                out,
                "    {} -> {};",
                quote(&label(&self.graph[edge.source()])),
                quote(&label(&self.graph[edge.target()]))
            );
        }
        out.push_str("}\n");
        out
    }
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
