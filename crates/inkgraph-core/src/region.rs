//! Page regions: the pre-semantic primitives and their consolidated groups.
//!
//! # Overview
//!
//! - [`Region`] - A geometric primitive produced by contour analysis
//! - [`TextLine`] - A line box produced by the external OCR adapter
//! - [`DiagramGroup`] - A connected cluster of structural regions plus attached text
//! - [`TextParagraph`] - A run of aligned text lines outside any diagram
//! - [`ConsolidatedRegion`] - Either of the two, as emitted by consolidation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

/// Semantic category of a detected region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    /// Small compact blob, most likely a handwritten glyph cluster
    Text,
    /// Wide, short blob that reads as a line of text
    TextLine,
    /// Thin line or arrow linking two diagram elements
    Connector,
    /// Closed outline enclosing other content
    DiagramContainer,
    Unknown,
}

impl RegionKind {
    /// Returns `true` for kinds that carry text rather than diagram structure.
    pub fn is_textual(self) -> bool {
        matches!(self, RegionKind::Text | RegionKind::TextLine)
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Text => "text",
            RegionKind::TextLine => "text_line",
            RegionKind::Connector => "connector",
            RegionKind::DiagramContainer => "diagram_container",
            RegionKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Outline shape of a region, from polygon approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Line,
    Triangle,
    Square,
    Rectangle,
    Circle,
    ArrowOrLine,
    ComplexPolygon,
    #[default]
    Unknown,
}

impl Shape {
    /// Returns `true` for shapes that read as a line or an arrow.
    pub fn is_linear(self) -> bool {
        matches!(self, Shape::Line | Shape::ArrowOrLine)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Line => "line",
            Shape::Triangle => "triangle",
            Shape::Square => "square",
            Shape::Rectangle => "rectangle",
            Shape::Circle => "circle",
            Shape::ArrowOrLine => "arrow_or_line",
            Shape::ComplexPolygon => "complex_polygon",
            Shape::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A typed geometric region detected on the page.
///
/// Regions are immutable once emitted by the detector. The persisted form is
/// `{"type", "bbox", "shape"}`; the contour area is kept in memory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "type")]
    kind: RegionKind,
    #[serde(rename = "bbox")]
    bounds: Bounds,
    #[serde(default)]
    shape: Shape,
    #[serde(skip)]
    area: f64,
}

impl Region {
    /// Creates a new region.
    pub fn new(kind: RegionKind, bounds: Bounds, shape: Shape, area: f64) -> Self {
        Self {
            kind,
            bounds,
            shape,
            area,
        }
    }

    pub fn kind(&self) -> RegionKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Returns the contour area in square pixels.
    pub fn area(&self) -> f64 {
        self.area
    }
}

/// Marker for the OCR adapter's `"type": "text_content"` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextLineKind {
    #[default]
    TextContent,
}

fn default_confidence() -> f64 {
    1.0
}

/// A recognised line of text, as returned by the OCR adapter.
///
/// Deserializes `{"bbox": [x1, y1, x2, y2], "text", "confidence", "type": "text_content"}`.
/// `confidence` defaults to `1.0` and `type` to `text_content` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    #[serde(rename = "bbox")]
    bounds: Bounds,
    text: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(rename = "type", default)]
    kind: TextLineKind,
}

impl TextLine {
    /// Creates a text line with full confidence.
    pub fn new(bounds: Bounds, text: impl Into<String>) -> Self {
        Self {
            bounds,
            text: text.into(),
            confidence: default_confidence(),
            kind: TextLineKind::TextContent,
        }
    }

    /// Sets the recognition confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// One member of a [`DiagramGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagramElement {
    /// An OCR line attached to the diagram
    Text(TextLine),
    /// A structural region from the detector
    Structure(Region),
}

impl DiagramElement {
    pub fn bounds(&self) -> Bounds {
        match self {
            DiagramElement::Text(line) => line.bounds(),
            DiagramElement::Structure(region) => region.bounds(),
        }
    }

    /// Returns the line text for text members.
    pub fn text(&self) -> Option<&str> {
        match self {
            DiagramElement::Text(line) => Some(line.text()),
            DiagramElement::Structure(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, DiagramElement::Structure(r) if r.kind() == RegionKind::DiagramContainer)
    }

    pub fn is_connector(&self) -> bool {
        matches!(self, DiagramElement::Structure(r) if r.kind() == RegionKind::Connector)
    }
}

/// A connected component of structural regions plus the text attached to it.
///
/// Created once during consolidation; only its bounds grow and its element
/// list is appended to while consolidation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramGroup {
    #[serde(rename = "bbox")]
    bounds: Bounds,
    elements: Vec<DiagramElement>,
}

impl DiagramGroup {
    /// Creates a group from its members; the bounds are their union.
    ///
    /// Returns `None` for an empty member list.
    pub fn from_elements(elements: Vec<DiagramElement>) -> Option<Self> {
        let bounds = crate::geometry::union_all(elements.iter().map(DiagramElement::bounds))?;
        Some(Self { bounds, elements })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn elements(&self) -> &[DiagramElement] {
        &self.elements
    }

    /// Appends a member and grows the bounds to cover it.
    pub fn attach(&mut self, element: DiagramElement) {
        self.bounds = self.bounds.merge(&element.bounds());
        self.elements.push(element);
    }
}

/// A paragraph of free text assembled from aligned OCR lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParagraph {
    #[serde(rename = "bbox")]
    bounds: Bounds,
    text: String,
    /// Number of OCR lines folded into this paragraph
    #[serde(default)]
    line_count: usize,
}

impl TextParagraph {
    pub fn new(bounds: Bounds, text: impl Into<String>, line_count: usize) -> Self {
        Self {
            bounds,
            text: text.into(),
            line_count,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }
}

/// A region emitted by consolidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsolidatedRegion {
    #[serde(rename = "DIAGRAM")]
    Diagram(DiagramGroup),
    #[serde(rename = "TEXT_PARAGRAPH")]
    Paragraph(TextParagraph),
}

impl ConsolidatedRegion {
    pub fn bounds(&self) -> Bounds {
        match self {
            ConsolidatedRegion::Diagram(group) => group.bounds(),
            ConsolidatedRegion::Paragraph(paragraph) => paragraph.bounds(),
        }
    }

    /// Number of input primitives this region accounts for.
    pub fn member_count(&self) -> usize {
        match self {
            ConsolidatedRegion::Diagram(group) => group.elements().len(),
            ConsolidatedRegion::Paragraph(paragraph) => paragraph.line_count(),
        }
    }
}
