use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::error::ServeError;

/// Serve a directory of static assets over HTTP with permissive CORS
/// headers, for browser clients running on another origin.
#[derive(Debug, Clone, Parser)]
#[command(name = "asset-serve", version)]
pub struct ServeConfig {
    /// Port to serve on
    #[arg(short, long, default_value_t = 8080, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Directory to serve
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,
}

impl ServeConfig {
    pub fn new(port: u16, directory: impl Into<PathBuf>) -> Self {
        Self {
            port,
            directory: directory.into(),
        }
    }

    /// Canonicalize and validate the serve root. Fails when the path does
    /// not exist, is not a directory, or cannot be read.
    pub fn canonical_root(&self) -> Result<PathBuf, ServeError> {
        let invalid = |reason: String| ServeError::InvalidDirectory {
            path: self.directory.clone(),
            reason,
        };
        let root = self
            .directory
            .canonicalize()
            .map_err(|e| invalid(e.to_string()))?;
        if !root.is_dir() {
            return Err(invalid("not a directory".to_string()));
        }
        fs::read_dir(&root).map_err(|e| invalid(e.to_string()))?;
        Ok(root)
    }
}
