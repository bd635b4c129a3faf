//! Diagram graphs before and after canonicalization.
//!
//! A [`DiagramGraph`] is built from one diagram group: node ids are local to
//! that group and edges carry the connector that produced them. A
//! [`CanonicalGraph`] is the merged, deduplicated page graph whose edges are
//! guaranteed to reference existing nodes and never loop on themselves.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{geometry::Bounds, identifier::Id};

/// Relation assigned to every edge inferred from a connector.
pub const CONNECTED_TO: &str = "connected_to";

/// What a graph node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A container outline labelled by the text inside it
    Container,
    /// A text line not enclosed by any container
    TextBlob,
}

/// A node of a diagram graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    id: Id,
    label: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(rename = "bbox")]
    bounds: Bounds,
}

impl GraphNode {
    pub fn new(id: Id, label: impl Into<String>, kind: NodeKind, bounds: Bounds) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            bounds,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Folds another node into this one: labels are joined with a space
    /// and the bounds become the union of both.
    pub fn absorb(&mut self, other: &GraphNode) {
        if !other.label.is_empty() {
            self.label = format!("{} {}", self.label, other.label).trim().to_string();
        }
        self.bounds = self.bounds.merge(&other.bounds);
    }
}

/// A directed edge between two nodes.
///
/// Direction is a reading-order heuristic, not ground truth: the page
/// geometry carries no arrowhead information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    from: Id,
    to: Id,
    relation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    connector_id: Option<Id>,
}

impl GraphEdge {
    pub fn new(from: Id, to: Id, relation: impl Into<String>) -> Self {
        Self {
            from,
            to,
            relation: relation.into(),
            connector_id: None,
        }
    }

    /// Records the connector region this edge was inferred from.
    pub fn with_connector(mut self, connector_id: Id) -> Self {
        self.connector_id = Some(connector_id);
        self
    }

    /// Returns the same edge with its endpoints replaced.
    pub fn rewired(&self, from: Id, to: Id) -> Self {
        Self {
            from,
            to,
            ..self.clone()
        }
    }

    /// Returns the same edge carrying another relation.
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = relation.into();
        self
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn connector_id(&self) -> Option<Id> {
        self.connector_id
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// The graph extracted from a single diagram group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    source: String,
    #[serde(rename = "bbox")]
    bounds: Bounds,
}

impl DiagramGraph {
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        source: impl Into<String>,
        bounds: Bounds,
    ) -> Self {
        Self {
            nodes,
            edges,
            source: source.into(),
            bounds,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Splits the graph into its owned node and edge lists.
    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        (self.nodes, self.edges)
    }
}

/// A refined page graph.
///
/// Invariant: every edge endpoint names a node in `nodes`, and no edge is a
/// self-loop. [`CanonicalGraph::new`] drops any edge that violates this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    source: String,
    #[serde(rename = "bbox")]
    bounds: Bounds,
}

impl CanonicalGraph {
    /// Creates a canonical graph, discarding edges that break the invariant.
    pub fn new(
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        source: impl Into<String>,
        bounds: Bounds,
    ) -> Self {
        let ids: HashSet<Id> = nodes.iter().map(GraphNode::id).collect();
        let edges = edges
            .into_iter()
            .filter(|edge| {
                !edge.is_self_loop() && ids.contains(&edge.from) && ids.contains(&edge.to)
            })
            .collect();
        Self {
            nodes,
            edges,
            source: source.into(),
            bounds,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn node(&self, id: Id) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
