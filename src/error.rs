//! Crate-level error type.

use std::path::PathBuf;

use crate::ico::IcoError;

/// Errors produced while rendering and packaging favicons.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The SVG source could not be parsed.
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    /// The SVG parsed but has no drawable area, or the target size is zero.
    #[error("cannot render SVG at {size}x{size}")]
    Render { size: u32 },

    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),

    /// The ICO container could not be built.
    #[error(transparent)]
    Ico(#[from] IcoError),

    /// The manifest is not valid JSON or does not match the expected shape.
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest parsed but describes an impossible output set.
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
