//! Error adapter for converting InkgraphError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every variant of
//! [`InkgraphError`] gets a stable diagnostic code and, where the fix is
//! usually the same, a help line.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use inkgraph::InkgraphError;

/// Adapter rendering an [`InkgraphError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a InkgraphError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            InkgraphError::Io(_) => "inkgraph::io",
            InkgraphError::Input(_) => "inkgraph::input",
            InkgraphError::Vision(_) => "inkgraph::vision",
            InkgraphError::Json(_) => "inkgraph::json",
            InkgraphError::Config(_) => "inkgraph::config",
            InkgraphError::Export(_) => "inkgraph::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            InkgraphError::Input(_) => {
                "the page must be a PNG or JPEG image and --ocr a JSON list of {\"bbox\", \"text\"} lines"
            }
            InkgraphError::Config(_) => "check the TOML syntax and the regular expressions in [vocabulary]",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap an [`InkgraphError`] for rendering.
pub fn to_reportable(err: &InkgraphError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}
