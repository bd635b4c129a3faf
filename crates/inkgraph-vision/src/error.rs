use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading a page image.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("I/O error reading `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image `{path}`: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image `{0}` has no pixels")]
    EmptyImage(PathBuf),
}
