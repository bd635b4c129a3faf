//! Error and warning types for page processing.
//!
//! [`InkgraphError`] halts processing of one page. [`PageWarning`] never
//! does: it marks a stage that produced nothing, and the page still yields
//! empty but well-formed artifacts.

use std::{fmt, io};

use thiserror::Error;

use inkgraph_vision::VisionError;

/// The main error type for inkgraph operations.
#[derive(Debug, Error)]
pub enum InkgraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unreadable image or malformed region/OCR input.
    #[error("Input error: {0}")]
    Input(String),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for InkgraphError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

/// A stage of the pipeline that came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageWarning {
    /// The detector found no structural or text regions.
    NoRegionsDetected,
    /// No OCR lines were supplied for the page.
    NoTextLines,
    /// Consolidation produced no diagram groups.
    NoDiagramGroups,
    /// Refinement left no nodes, so the knowledge graph is empty.
    EmptyGraph,
}

impl fmt::Display for PageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PageWarning::NoRegionsDetected => "no regions detected",
            PageWarning::NoTextLines => "no OCR text lines supplied",
            PageWarning::NoDiagramGroups => "no diagram groups found",
            PageWarning::EmptyGraph => "knowledge graph is empty",
        };
        f.write_str(message)
    }
}
