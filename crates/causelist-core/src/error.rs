//! Error type for the download-and-record pipeline.
//!
//! Transient download failures are not errors: the downloader reports them
//! as a `false` result after its retry budget runs out. Everything here is
//! fatal to the call that produced it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest on disk is not a valid record. The file is left as is.
    #[error("manifest {} is not valid: {source}", .path.display())]
    CorruptManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A jurisdiction or date segment resolved outside the output root.
    #[error("path {} escapes output root {}", .path.display(), .root.display())]
    PathEscape { root: PathBuf, path: PathBuf },

    /// A prerequisite the portal should have shown was not found.
    #[error("not found on portal: {0}")]
    MissingElement(String),

    #[error("invalid PDF URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("lock manifest {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A PDF could not be read or the merged document could not be built.
    #[error("pdf {}: {reason}", .path.display())]
    Pdf { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
