//! Condensed page output without geometry.
//!
//! The simplified output is a JSON list: one `text` entry holding every text
//! region joined by newlines, followed by one `graph` entry per canonical
//! graph whose nodes carry no bounding boxes.

use serde::Serialize;

use inkgraph_core::{
    graph::{CanonicalGraph, NodeKind},
    identifier::Id,
};

use crate::text::TextRegion;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimplifiedEntry {
    Text { content: String, source: String },
    Graph { graph: SimplifiedGraph, source: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedGraph {
    nodes: Vec<SimplifiedNode>,
    edges: Vec<SimplifiedEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedNode {
    id: Id,
    label: String,
    #[serde(rename = "type")]
    kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedEdge {
    from: Id,
    to: Id,
    relation: String,
}

impl From<&CanonicalGraph> for SimplifiedGraph {
    fn from(graph: &CanonicalGraph) -> Self {
        Self {
            nodes: graph
                .nodes()
                .iter()
                .map(|node| SimplifiedNode {
                    id: node.id(),
                    label: node.label().to_string(),
                    kind: node.kind(),
                })
                .collect(),
            edges: graph
                .edges()
                .iter()
                .map(|edge| SimplifiedEdge {
                    from: edge.from(),
                    to: edge.to(),
                    relation: edge.relation().to_string(),
                })
                .collect(),
        }
    }
}

/// Builds the simplified output of a page.
pub fn simplify(
    text_regions: &[TextRegion],
    graphs: &[CanonicalGraph],
    source: &str,
) -> Vec<SimplifiedEntry> {
    let mut entries = Vec::with_capacity(graphs.len() + 1);
    if !text_regions.is_empty() {
        let content = text_regions
            .iter()
            .map(TextRegion::content)
            .collect::<Vec<_>>()
            .join("\n");
        entries.push(SimplifiedEntry::Text {
            content,
            source: source.to_string(),
        });
    }
    entries.extend(graphs.iter().map(|graph| SimplifiedEntry::Graph {
        graph: SimplifiedGraph::from(graph),
        source: graph.source().to_string(),
    }));
    entries
}
