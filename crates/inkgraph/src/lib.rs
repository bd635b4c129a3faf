//! Turns photographed handwritten notes into text chunks and a typed
//! knowledge graph.
//!
//! A page runs through five stages:
//!
//! 1. region detection ([`inkgraph_vision::RegionDetector`]),
//! 2. consolidation into diagrams and paragraphs ([`consolidate`]),
//! 3. raw graph construction per diagram ([`construct`]),
//! 4. canonicalization of the raw graphs ([`refine`]),
//! 5. knowledge schema generation ([`schema`]).
//!
//! [`PageBuilder`] owns one instance of every stage and produces a
//! [`PageResult`] per page. Stages that come up empty never fail the page;
//! they add a [`PageWarning`] and the later stages see empty input.

pub mod config;
pub mod consolidate;
pub mod construct;
pub mod export;
pub mod refine;
pub mod schema;
pub mod simplified;
pub mod text;

mod error;

pub use inkgraph_core::{color, geometry, graph, identifier, knowledge, region};
pub use inkgraph_vision::SceneKind;

pub use error::{InkgraphError, PageWarning};

use std::{fs, path::Path};

use image::DynamicImage;
use log::{debug, info, trace, warn};

use inkgraph_core::{
    graph::{CanonicalGraph, DiagramGraph},
    knowledge::KnowledgeArtifacts,
    region::{Region, TextLine},
};
use inkgraph_vision::RegionDetector;

use config::AppConfig;
use consolidate::{Consolidation, RegionConsolidator};
use construct::GraphConstructor;
use refine::GraphRefiner;
use schema::SchemaGenerator;
use simplified::SimplifiedEntry;
use text::TextRegion;

/// Runs the whole pipeline for one page at a time.
///
/// Building the pipeline compiles every configured pattern, so a builder is
/// meant to be created once and reused across pages.
pub struct PageBuilder {
    config: AppConfig,
    detector: RegionDetector,
    consolidator: RegionConsolidator,
    constructor: GraphConstructor,
    refiner: GraphRefiner,
    schema: SchemaGenerator,
}

impl PageBuilder {
    /// Creates the pipeline from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InkgraphError::Config`] when a correction, type rule or
    /// other configured pattern does not compile.
    pub fn new(config: AppConfig) -> Result<Self, InkgraphError> {
        let detector = RegionDetector::new(config.detector().clone());
        let consolidator = RegionConsolidator::new(config.consolidation().clone());
        let refiner = GraphRefiner::new(config.refine())?;
        let schema = SchemaGenerator::new(config.vocabulary())?;
        Ok(Self {
            config,
            detector,
            consolidator,
            constructor: GraphConstructor::new(),
            refiner,
            schema,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Processes an image file with the OCR lines recognised on it.
    ///
    /// The page source is the file name of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InkgraphError::Input`] when the image cannot be read or
    /// decoded.
    pub fn process_file(&self, path: &Path, lines: Vec<TextLine>) -> Result<PageResult, InkgraphError> {
        let image = RegionDetector::load(path).map_err(|err| {
            warn!(path:% = path.display(), err:err; "Cannot read page image");
            InkgraphError::Input(err.to_string())
        })?;
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(self.process_image(&image, lines, &source))
    }

    /// Processes a decoded page image.
    pub fn process_image(&self, image: &DynamicImage, lines: Vec<TextLine>, source: &str) -> PageResult {
        info!(source = source; "Detecting regions");
        let detection = self.detector.detect(image);
        debug!(regions = detection.regions().len(), scene:% = detection.scene(); "Regions detected");

        let mut page = self.process_regions(detection.into_regions(), lines, source);
        page.dimensions = Some((image.width(), image.height()));
        page
    }

    /// Processes regions that were detected elsewhere.
    pub fn process_regions(&self, regions: Vec<Region>, lines: Vec<TextLine>, source: &str) -> PageResult {
        let mut warnings = Vec::new();
        if regions.is_empty() {
            warn!(source = source; "No regions detected");
            warnings.push(PageWarning::NoRegionsDetected);
        }
        if lines.is_empty() {
            warn!(source = source; "No OCR text lines supplied");
            warnings.push(PageWarning::NoTextLines);
        }

        info!(source = source, regions = regions.len(), lines = lines.len(); "Consolidating regions");
        let consolidated = self.consolidator.consolidate(&regions, &lines);
        if consolidated.diagrams().next().is_none() {
            warn!(source = source; "No diagram groups found");
            warnings.push(PageWarning::NoDiagramGroups);
        }

        let text_regions: Vec<TextRegion> = consolidated
            .paragraphs()
            .map(|paragraph| TextRegion::from_paragraph(paragraph, source))
            .collect();

        info!(source = source; "Constructing diagram graphs");
        let raw: Vec<DiagramGraph> = consolidated
            .diagrams()
            .enumerate()
            .map(|(index, group)| self.constructor.construct(index, group, source))
            .collect();
        trace!(raw:? = raw; "Raw diagram graphs");

        let graphs = self.refiner.refine(raw);
        debug!(graphs = graphs.len(); "Graphs refined");

        let knowledge = match graphs.first() {
            Some(graph) => self.schema.generate(graph, source),
            None => SchemaGenerator::empty(source),
        };
        if knowledge.graph_knowledge.is_empty() {
            warn!(source = source; "Knowledge graph is empty");
            warnings.push(PageWarning::EmptyGraph);
        }

        info!(
            source = source,
            text_regions = text_regions.len(),
            graphs = graphs.len(),
            warnings = warnings.len();
            "Page processed",
        );

        PageResult {
            source: source.to_string(),
            dimensions: None,
            scene: SceneKind::classify(&regions),
            regions,
            consolidated,
            text_regions,
            graphs,
            knowledge,
            warnings,
        }
    }
}

/// Everything produced for one page.
#[derive(Debug, Clone)]
pub struct PageResult {
    source: String,
    dimensions: Option<(u32, u32)>,
    scene: SceneKind,
    regions: Vec<Region>,
    consolidated: Consolidation,
    text_regions: Vec<TextRegion>,
    graphs: Vec<CanonicalGraph>,
    knowledge: KnowledgeArtifacts,
    warnings: Vec<PageWarning>,
}

impl PageResult {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Image width and height, when the page came from an image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn scene(&self) -> SceneKind {
        self.scene
    }

    /// Regions as supplied to consolidation.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn consolidated(&self) -> &Consolidation {
        &self.consolidated
    }

    pub fn text_regions(&self) -> &[TextRegion] {
        &self.text_regions
    }

    /// Canonical graphs, never empty ones.
    pub fn graphs(&self) -> &[CanonicalGraph] {
        &self.graphs
    }

    pub fn knowledge(&self) -> &KnowledgeArtifacts {
        &self.knowledge
    }

    pub fn warnings(&self) -> &[PageWarning] {
        &self.warnings
    }

    /// The condensed output of the page.
    pub fn simplified(&self) -> Vec<SimplifiedEntry> {
        simplified::simplify(&self.text_regions, &self.graphs, &self.source)
    }
}

/// Reads OCR lines from a JSON file holding a list of
/// `{"bbox": [x1, y1, x2, y2], "text", "confidence"}` objects.
///
/// # Errors
///
/// Returns [`InkgraphError::Io`] when the file cannot be read and
/// [`InkgraphError::Input`] when its content is not a list of lines.
pub fn read_ocr_lines(path: &Path) -> Result<Vec<TextLine>, InkgraphError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| {
        InkgraphError::Input(format!("malformed OCR lines in {}: {err}", path.display()))
    })
}
