//! Typed knowledge artifacts handed to downstream indexing services.
//!
//! Field names here are a persisted contract: the graph artifact is
//! `{"graph_id", "nodes", "edges", "metadata"}` and each text chunk is
//! `{"doc_id", "chunk_id", "type": "text", "content", "metadata"}`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// Page number recorded on every artifact; inputs are single pages.
pub const SINGLE_PAGE: u32 = 1;

/// Semantic type of a knowledge node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Concept,
    Process,
    Data,
    Model,
    Definition,
    Example,
}

impl NodeType {
    /// Returns `true` for the types that take part in sibling-edge suppression.
    pub fn is_model_like(self) -> bool {
        matches!(self, NodeType::Model | NodeType::Example)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Concept => "concept",
            NodeType::Process => "process",
            NodeType::Data => "data",
            NodeType::Model => "model",
            NodeType::Definition => "definition",
            NodeType::Example => "example",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concept" => Ok(NodeType::Concept),
            "process" => Ok(NodeType::Process),
            "data" => Ok(NodeType::Data),
            "model" => Ok(NodeType::Model),
            "definition" => Ok(NodeType::Definition),
            "example" => Ok(NodeType::Example),
            other => Err(format!("unknown node type `{other}`")),
        }
    }
}

/// A node of the knowledge graph, identified by the slug of its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeNode {
    node_id: Id,
    label: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    aliases: Vec<String>,
    source: String,
}

impl KnowledgeNode {
    /// Creates a node whose only alias is the lowercased label.
    pub fn new(
        node_id: Id,
        label: impl Into<String>,
        node_type: NodeType,
        source: impl Into<String>,
    ) -> Self {
        let label = label.into();
        Self {
            node_id,
            aliases: vec![label.to_lowercase()],
            label,
            node_type,
            source: source.into(),
        }
    }

    pub fn node_id(&self) -> Id {
        self.node_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Adds the aliases of `other` that are not already known.
    pub fn merge_aliases(&mut self, other: &KnowledgeNode) {
        for alias in &other.aliases {
            if !self.aliases.contains(alias) {
                self.aliases.push(alias.clone());
            }
        }
    }
}

/// A typed, directed relation between two knowledge nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEdge {
    from: Id,
    to: Id,
    relation: String,
    confidence: f64,
    source: String,
}

impl KnowledgeEdge {
    pub fn new(
        from: Id,
        to: Id,
        relation: impl Into<String>,
        confidence: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            relation: relation.into(),
            confidence,
            source: source.into(),
        }
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

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub source_image: String,
    pub page: u32,
}

/// The canonical knowledge graph of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    graph_id: String,
    nodes: Vec<KnowledgeNode>,
    edges: Vec<KnowledgeEdge>,
    metadata: GraphMetadata,
}

impl KnowledgeGraph {
    /// Creates the graph for `source`, with id `kg_{source}`.
    pub fn new(source: &str, nodes: Vec<KnowledgeNode>, edges: Vec<KnowledgeEdge>) -> Self {
        Self {
            graph_id: format!("kg_{source}"),
            nodes,
            edges,
            metadata: GraphMetadata {
                source_image: source.to_string(),
                page: SINGLE_PAGE,
            },
        }
    }

    /// Creates a graph with no nodes or edges.
    pub fn empty(source: &str) -> Self {
        Self::new(source, Vec::new(), Vec::new())
    }

    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    pub fn nodes(&self) -> &[KnowledgeNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[KnowledgeEdge] {
        &self.edges
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn node(&self, id: &str) -> Option<&KnowledgeNode> {
        self.nodes.iter().find(|node| node.node_id == *id)
    }

    /// Finds the first edge between two node ids.
    pub fn edge(&self, from: &str, to: &str) -> Option<&KnowledgeEdge> {
        self.edges
            .iter()
            .find(|edge| edge.from == *from && edge.to == *to)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Marker for the `"type": "text"` field of a text chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source_image: String,
    pub topic: String,
    pub page: u32,
}

/// A reading-order paragraph of prose recovered from graph nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    doc_id: String,
    chunk_id: String,
    #[serde(rename = "type")]
    kind: ChunkKind,
    content: String,
    metadata: ChunkMetadata,
}

impl TextChunk {
    /// Creates a chunk for `source`, keyed by the id of its first node.
    ///
    /// Runs of whitespace in `content` are collapsed to single spaces.
    pub fn new(source: &str, first_node: Id, content: &str, topic: &str) -> Self {
        Self {
            doc_id: format!("page_{source}"),
            chunk_id: format!("chunk_{first_node}"),
            kind: ChunkKind::Text,
            content: collapse_whitespace(content),
            metadata: ChunkMetadata {
                source_image: source.to_string(),
                topic: topic.to_string(),
                page: SINGLE_PAGE,
            },
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn chunk_id(&self) -> &str {
        &self.chunk_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }
}

/// Both artifacts produced for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeArtifacts {
    pub text_knowledge: Vec<TextChunk>,
    pub graph_knowledge: KnowledgeGraph,
}

/// Collapses whitespace runs into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
