use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup and serve-loop errors. None of these are produced while
/// answering an individual request.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: hyper::Error,
    },

    #[error("invalid serve directory {path:?}: {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },

    #[error("server error: {0}")]
    Hyper(#[from] hyper::Error),
}

/// Errors from parsing a `Range` request header against a known file size.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("malformed byte range")]
    Malformed,

    #[error("range does not overlap the file")]
    Unsatisfiable,
}
