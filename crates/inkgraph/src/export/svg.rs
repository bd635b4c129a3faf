//! SVG debug overlay of a processed page.
//!
//! Draws, in page coordinates, the consolidated regions with their kind, the
//! nodes of every canonical graph with a short label, and the edges as
//! arrows between node centres annotated with their relation.

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{
    Document,
    node::element::{Definitions, Group, Marker, Path, Rectangle, Text},
};

use inkgraph_core::{
    color::Color,
    geometry::{Bounds, union_all},
    graph::{CanonicalGraph, NodeKind},
    region::ConsolidatedRegion,
};

use crate::{
    PageResult,
    config::StyleConfig,
    export::{self, Exporter},
};

const MARGIN: i32 = 20;
const NODE_LABEL_CHARS: usize = 15;
const ARROW_MARKER: &str = "arrow";

#[derive(Debug, Clone)]
struct Palette {
    background: Option<Color>,
    diagram: Color,
    paragraph: Color,
    container: Color,
    text_blob: Color,
    edge: Color,
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            background: style.background_color()?,
            diagram: style.diagram_color()?,
            paragraph: style.paragraph_color()?,
            container: style.container_color()?,
            text_blob: style.text_blob_color()?,
            edge: style.edge_color()?,
        })
    }
}

/// Writes the overlay of a page to an SVG file.
pub struct Svg {
    file_name: String,
    palette: Palette,
}

impl Svg {
    /// Creates an exporter writing to `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] when a style colour does not parse.
    pub fn new(file_name: &str, style: &StyleConfig) -> Result<Self, export::Error> {
        let palette = Palette::from_style(style).map_err(export::Error::Render)?;
        Ok(Self {
            file_name: file_name.to_string(),
            palette,
        })
    }

    /// Renders the overlay document.
    pub fn render(&self, page: &PageResult) -> Document {
        let canvas = canvas_bounds(page);
        let mut doc = Document::new()
            .set(
                "viewBox",
                (canvas.min_x(), canvas.min_y(), canvas.width(), canvas.height()),
            )
            .set("width", canvas.width())
            .set("height", canvas.height())
            .add(self.marker_definitions());

        if let Some(background) = &self.palette.background {
            doc = doc.add(
                Rectangle::new()
                    .set("x", canvas.min_x())
                    .set("y", canvas.min_y())
                    .set("width", canvas.width())
                    .set("height", canvas.height())
                    .set("fill", background),
            );
        }

        for region in page.consolidated().regions() {
            doc = doc.add(self.render_region(region));
        }
        for graph in page.graphs() {
            doc = doc.add(self.render_graph(graph));
        }

        debug!(regions = page.consolidated().regions().len(), graphs = page.graphs().len(); "SVG overlay rendered");
        doc
    }

    fn marker_definitions(&self) -> Definitions {
        Definitions::new().add(
            Marker::new()
                .set("id", ARROW_MARKER)
                .set("viewBox", "0 0 10 10")
                .set("refX", 9)
                .set("refY", 5)
                .set("markerWidth", 6)
                .set("markerHeight", 6)
                .set("orient", "auto")
                .add(
                    Path::new()
                        .set("d", "M 0 0 L 10 5 L 0 10 z")
                        .set("fill", &self.palette.edge),
                ),
        )
    }

    fn render_region(&self, region: &ConsolidatedRegion) -> Group {
        let (color, name) = match region {
            ConsolidatedRegion::Diagram(_) => (&self.palette.diagram, "DIAGRAM"),
            ConsolidatedRegion::Paragraph(_) => (&self.palette.paragraph, "TEXT_PARAGRAPH"),
        };
        let bounds = region.bounds();
        Group::new()
            .add(outline(bounds, color, 3))
            .add(caption(name, bounds.min_x(), bounds.min_y() - 10, color, 16))
    }

    fn render_graph(&self, graph: &CanonicalGraph) -> Group {
        let mut group = Group::new();

        for node in graph.nodes() {
            let color = match node.kind() {
                NodeKind::Container => &self.palette.container,
                NodeKind::TextBlob => &self.palette.text_blob,
            };
            let bounds = node.bounds();
            let label: String = node.label().chars().take(NODE_LABEL_CHARS).collect();
            group = group
                .add(outline(bounds, color, 2))
                .add(caption(&label, bounds.min_x(), bounds.min_y() - 5, color, 12));
        }

        for edge in graph.edges() {
            let (Some(source), Some(target)) = (graph.node(edge.from()), graph.node(edge.to())) else {
                continue;
            };
            let start = source.bounds().center();
            let end = target.bounds().center();
            let path = Path::new()
                .set("d", format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y()))
                .set("fill", "none")
                .set("stroke", &self.palette.edge)
                .set("stroke-width", 2)
                .set("marker-end", format!("url(#{ARROW_MARKER})"));
            let mid_x = (start.x() + end.x()) / 2.0;
            let mid_y = (start.y() + end.y()) / 2.0;
            let label = Text::new(edge.relation())
                .set("x", mid_x)
                .set("y", mid_y)
                .set("text-anchor", "middle")
                .set("font-family", "Arial")
                .set("font-size", 11)
                .set("fill", &self.palette.edge);
            group = group.add(path).add(label);
        }

        group
    }

    /// Writes an SVG document to the configured file
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl Exporter for Svg {
    fn export_page(&self, page: &PageResult) -> Result<(), export::Error> {
        let doc = self.render(page);
        self.write_document(doc)
    }
}

/// The drawing area: the page image when known, else everything drawn.
fn canvas_bounds(page: &PageResult) -> Bounds {
    if let Some((width, height)) = page.dimensions() {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        return Bounds::new(0, 0, width, height);
    }
    let drawn = page
        .consolidated()
        .regions()
        .iter()
        .map(ConsolidatedRegion::bounds)
        .chain(page.graphs().iter().map(CanonicalGraph::bounds));
    union_all(drawn)
        .map(|bounds| bounds.expand(MARGIN))
        .unwrap_or_else(|| Bounds::new(0, 0, 2 * MARGIN, 2 * MARGIN))
}

fn outline(bounds: Bounds, color: &Color, width: u32) -> Rectangle {
    Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
        .set("fill", "none")
        .set("stroke", color)
        .set("stroke-width", width)
}

fn caption(content: &str, x: i32, y: i32, color: &Color, size: u32) -> Text {
    Text::new(content)
        .set("x", x)
        .set("y", y)
        .set("font-family", "Arial")
        .set("font-size", size)
        .set("fill", color)
}

#[cfg(test)]
mod tests {
    use inkgraph_core::{
        graph::{GraphEdge, GraphNode},
        identifier::Id,
        region::{Region, RegionKind, Shape, TextLine},
    };

    use super::*;
    use crate::{PageBuilder, config::AppConfig};

    fn page() -> PageResult {
        let regions = vec![
            Region::new(RegionKind::DiagramContainer, Bounds::new(10, 10, 110, 60), Shape::Rectangle, 5000.0),
            Region::new(RegionKind::DiagramContainer, Bounds::new(10, 200, 110, 250), Shape::Rectangle, 5000.0),
            Region::new(RegionKind::Connector, Bounds::new(55, 70, 65, 190), Shape::Line, 1200.0),
        ];
        let lines = vec![
            TextLine::new(Bounds::new(30, 25, 90, 45), "Data"),
            TextLine::new(Bounds::new(20, 215, 100, 235), "Model"),
        ];
        PageBuilder::new(AppConfig::default())
            .unwrap()
            .process_regions(regions, lines, "page.png")
    }

    #[test]
    fn test_render_contains_regions_nodes_and_edges() {
        let exporter = Svg::new("unused.svg", &StyleConfig::default()).unwrap();
        let svg = exporter.render(&page()).to_string();
        assert!(svg.contains("DIAGRAM"));
        assert!(svg.contains("Data"));
        assert!(svg.contains("marker-end"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.svg");
        let exporter = Svg::new(path.to_str().unwrap(), &StyleConfig::default()).unwrap();
        exporter.export_page(&page()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
    }

    #[test]
    fn test_label_is_truncated() {
        let nodes = vec![GraphNode::new(
            Id::new("g0_text0"),
            "a very long label that keeps going",
            NodeKind::TextBlob,
            Bounds::new(0, 0, 300, 20),
        )];
        let graph = CanonicalGraph::new(nodes, Vec::<GraphEdge>::new(), "p.png", Bounds::new(0, 0, 300, 20));
        let exporter = Svg::new("unused.svg", &StyleConfig::default()).unwrap();
        let svg = exporter.render_graph(&graph).to_string();
        assert!(svg.contains("a very long lab"));
        assert!(!svg.contains("a very long labe"));
    }
}
