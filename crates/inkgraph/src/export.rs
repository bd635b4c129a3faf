pub mod json;
pub mod svg;

use crate::PageResult;

/// Writes the results of one page somewhere.
pub trait Exporter {
    fn export_page(&self, _page: &PageResult) -> Result<(), Error> {
        Err(Error::Render("Page export not implemented".to_string()))
    }
}

#[derive(Debug)]
pub enum Error {
    Render(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}
