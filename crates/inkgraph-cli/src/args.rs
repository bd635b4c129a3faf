//! Command-line argument definitions for the inkgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the page image and its OCR lines, the
//! output locations, the configuration file and logging verbosity.

use clap::{Parser, ValueEnum};

use inkgraph::config::MergeMode;

/// Command-line arguments for the inkgraph notes tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the page image
    #[arg(help = "Path to the page image (PNG or JPEG)")]
    pub input: String,

    /// Path to the OCR lines of the page (JSON list)
    #[arg(long)]
    pub ocr: Option<String>,

    /// Directory receiving the JSON artifacts
    #[arg(short, long, default_value = "output")]
    pub output: String,

    /// Also write an SVG overlay to this path
    #[arg(long)]
    pub svg: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overrides the configured graph merge mode
    #[arg(long, value_enum)]
    pub merge_mode: Option<MergeModeArg>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Command-line spelling of [`MergeMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MergeModeArg {
    PageLevel,
    Proximity,
}

impl From<MergeModeArg> for MergeMode {
    fn from(arg: MergeModeArg) -> Self {
        match arg {
            MergeModeArg::PageLevel => MergeMode::PageLevel,
            MergeModeArg::Proximity => MergeMode::Proximity,
        }
    }
}
