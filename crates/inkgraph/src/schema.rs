//! Knowledge artifacts for downstream indexing.
//!
//! [`SchemaGenerator`] turns one canonical graph into the two persisted
//! artifacts of a page: reading-order text chunks for a vector store, and a
//! typed knowledge graph whose node ids are label slugs.

pub mod graph;
pub mod text;

use log::info;

use inkgraph_core::{
    graph::CanonicalGraph,
    knowledge::{KnowledgeArtifacts, KnowledgeGraph},
};

pub use graph::KnowledgeGraphBuilder;
pub use text::TextChunker;

use crate::{config::VocabularyConfig, error::InkgraphError};

/// Generates text chunks and the knowledge graph of a page.
#[derive(Debug, Clone)]
pub struct SchemaGenerator {
    chunker: TextChunker,
    graph_builder: KnowledgeGraphBuilder,
}

impl SchemaGenerator {
    /// Creates a generator, compiling the type rules of `vocabulary`.
    ///
    /// # Errors
    ///
    /// Returns [`InkgraphError::Config`] when a type rule is not a valid
    /// regular expression.
    pub fn new(vocabulary: &VocabularyConfig) -> Result<Self, InkgraphError> {
        Ok(Self {
            chunker: TextChunker::new(vocabulary),
            graph_builder: KnowledgeGraphBuilder::new(vocabulary)?,
        })
    }

    /// Generates both artifacts of `graph`, attributed to `source`.
    pub fn generate(&self, graph: &CanonicalGraph, source: &str) -> KnowledgeArtifacts {
        let text_knowledge = self.chunker.chunk(graph.nodes(), source);
        let graph_knowledge = self.graph_builder.build(graph, source);

        info!(
            source = source,
            chunks = text_knowledge.len(),
            nodes = graph_knowledge.nodes().len(),
            edges = graph_knowledge.edges().len();
            "Generated knowledge artifacts"
        );

        KnowledgeArtifacts {
            text_knowledge,
            graph_knowledge,
        }
    }

    /// Artifacts of a page without any canonical graph.
    pub fn empty(source: &str) -> KnowledgeArtifacts {
        KnowledgeArtifacts {
            text_knowledge: Vec::new(),
            graph_knowledge: KnowledgeGraph::empty(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use inkgraph_core::{
        geometry::Bounds,
        graph::{GraphEdge, GraphNode, NodeKind},
        identifier::Id,
    };

    use super::*;

    #[test]
    fn test_generate_both_artifacts() {
        let nodes = vec![
            GraphNode::new(
                Id::new("g0_text0"),
                "Machine learning is the field of study",
                NodeKind::TextBlob,
                Bounds::new(0, 0, 400, 20),
            ),
            GraphNode::new(Id::new("g0_box0"), "Data", NodeKind::Container, Bounds::new(0, 300, 80, 340)),
            GraphNode::new(
                Id::new("g0_box1"),
                "Learning Program",
                NodeKind::Container,
                Bounds::new(0, 500, 160, 540),
            ),
        ];
        let edges = vec![GraphEdge::new(Id::new("g0_box0"), Id::new("g0_box1"), "input_to")];
        let graph = CanonicalGraph::new(nodes, edges, "notes.png", Bounds::new(0, 0, 400, 540));

        let generator = SchemaGenerator::new(&VocabularyConfig::default()).unwrap();
        let artifacts = generator.generate(&graph, "notes.png");

        assert_eq!(artifacts.text_knowledge.len(), 1);
        assert_eq!(artifacts.text_knowledge[0].chunk_id(), "chunk_g0_text0");

        let knowledge = &artifacts.graph_knowledge;
        assert_eq!(knowledge.graph_id(), "kg_notes.png");
        // The sentence is prose, not a concept.
        assert_eq!(knowledge.nodes().len(), 2);
        assert_eq!(knowledge.edge("data", "learning_program").unwrap().relation(), "input_to");
    }

    #[test]
    fn test_empty_artifacts() {
        let artifacts = SchemaGenerator::empty("blank.png");
        assert!(artifacts.text_knowledge.is_empty());
        assert!(artifacts.graph_knowledge.is_empty());
        assert_eq!(artifacts.graph_knowledge.metadata().source_image, "blank.png");
    }
}
