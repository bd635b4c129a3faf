//! Prose extraction from canonical graph nodes.

use inkgraph_core::{graph::GraphNode, knowledge::TextChunk};

use crate::config::VocabularyConfig;

/// Groups long or definitional node labels into reading-order text chunks.
#[derive(Debug, Clone)]
pub struct TextChunker {
    sentence_words: usize,
    definition_keywords: Vec<String>,
    topic: String,
}

impl TextChunker {
    pub fn new(vocabulary: &VocabularyConfig) -> Self {
        Self {
            sentence_words: vocabulary.sentence_words(),
            definition_keywords: vocabulary
                .definition_keywords()
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
            topic: vocabulary.topic().to_string(),
        }
    }

    /// Builds the text chunks of a page.
    ///
    /// Nodes are visited top to bottom. A chunk only opens on a sentence
    /// (more than `sentence_words` words) or a label naming a definition,
    /// including right after a paragraph break. Other labels are kept only
    /// when they continue an open chunk.
    pub fn chunk(&self, nodes: &[GraphNode], source: &str) -> Vec<TextChunk> {
        let mut sorted: Vec<&GraphNode> = nodes.iter().collect();
        sorted.sort_by_key(|node| node.bounds().min_y());

        let mut chunks = Vec::new();
        let mut current: Vec<&GraphNode> = Vec::new();

        for node in sorted {
            match current.last().copied() {
                None if self.opens_chunk(node.label()) => current.push(node),
                None => {}
                Some(prev) if same_paragraph(prev, node) => current.push(node),
                Some(_) => {
                    chunks.extend(self.flush(&current, source));
                    current.clear();
                    if self.opens_chunk(node.label()) {
                        current.push(node);
                    }
                }
            }
        }
        chunks.extend(self.flush(&current, source));

        chunks
    }

    fn opens_chunk(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        label.split_whitespace().count() > self.sentence_words
            || self
                .definition_keywords
                .iter()
                .any(|keyword| lower.contains(keyword.as_str()))
    }

    fn flush(&self, nodes: &[&GraphNode], source: &str) -> Option<TextChunk> {
        let first = nodes.first()?.id();
        let content = nodes
            .iter()
            .map(|node| node.label())
            .collect::<Vec<_>>()
            .join(" ");
        Some(TextChunk::new(source, first, &content, &self.topic))
    }
}

/// Checks whether `next` starts within the paragraph spacing of `prev`.
///
/// The gap from the bottom of `prev` may be a small overlap of half its
/// height, and must stay under 1.8 times that height.
fn same_paragraph(prev: &GraphNode, next: &GraphNode) -> bool {
    let (b1, b2) = (prev.bounds(), next.bounds());
    let dy = f64::from(b2.min_y() - b1.max_y());
    let height = f64::from(b1.height());
    -0.5 * height <= dy && dy < 1.8 * height
}
