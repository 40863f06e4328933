use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::ContainerExport;

/// Errors that can occur while loading a container export.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was not valid JSON, was not UTF-8, or had an unexpected shape.
    #[error("failed to parse export JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse JSON bytes into a [`ContainerExport`].
pub fn parse(json: &[u8]) -> Result<ContainerExport, ParseError> {
    Ok(serde_json::from_slice(json)?)
}

/// Parse a container export file.
pub fn parse_file(path: &Path) -> Result<ContainerExport, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}
