//! CLI logic for the inkgraph notes tool.
//!
//! Runs one page image through the pipeline and writes its artifacts.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, MergeModeArg};

use std::path::Path;

use log::{info, warn};

use inkgraph::{
    InkgraphError, PageBuilder,
    export::{Exporter, json::JsonExporter, svg::Svg},
};

/// Run the inkgraph CLI application
///
/// This function processes the input image through the inkgraph pipeline
/// and writes the JSON artifacts, plus the SVG overlay when requested.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `InkgraphError` for:
/// - Configuration loading errors
/// - Unreadable images or malformed OCR files
/// - Artifact export errors
pub fn run(args: &Args) -> Result<(), InkgraphError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing page"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(merge_mode) = args.merge_mode {
        app_config = app_config.with_merge_mode(merge_mode.into());
    }

    let lines = match &args.ocr {
        Some(path) => inkgraph::read_ocr_lines(Path::new(path))?,
        None => {
            warn!("No OCR file given, the page has no text lines");
            Vec::new()
        }
    };

    let builder = PageBuilder::new(app_config)?;
    let page = builder.process_file(Path::new(&args.input), lines)?;

    for warning in page.warnings() {
        info!(warning:% = warning; "Page produced partial results");
    }

    JsonExporter::new(&args.output).export_page(&page)?;
    info!(output_dir = args.output; "JSON artifacts exported successfully");

    if let Some(svg_path) = &args.svg {
        let svg = Svg::new(svg_path, builder.config().style())?;
        svg.export_page(&page)?;
        info!(output_file = svg_path; "SVG overlay exported successfully");
    }

    Ok(())
}
