//! Free-text regions of a page.

use serde::{Deserialize, Serialize};

use inkgraph_core::{
    geometry::Bounds,
    knowledge::{ChunkKind, collapse_whitespace},
    region::TextParagraph,
};

/// A paragraph outside every diagram, with whitespace normalized.
///
/// Serialized as `{"type": "text", "content", "source", "bbox"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    #[serde(rename = "type")]
    kind: ChunkKind,
    content: String,
    source: String,
    #[serde(rename = "bbox")]
    bounds: Bounds,
}

impl TextRegion {
    pub fn from_paragraph(paragraph: &TextParagraph, source: &str) -> Self {
        Self {
            kind: ChunkKind::Text,
            content: collapse_whitespace(paragraph.text()),
            source: source.to_string(),
            bounds: paragraph.bounds(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
