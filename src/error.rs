//! Error types for the styling pipeline.
//!
//! Document model failures carry the offending path and the model's own
//! message. Style failures name the catalogue entry that could not be
//! resolved against the manuscript and template style parts.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be read as a DOCX package.
    #[error("Failed to open DOCX '{}': {detail}", path.display())]
    Open { path: PathBuf, detail: String },

    /// The package opened but its XML parts did not parse.
    #[error("Failed to parse DOCX content of '{}': {detail}", path.display())]
    Parse { path: PathBuf, detail: String },

    #[error("Failed to write DOCX '{}': {detail}", path.display())]
    Write { path: PathBuf, detail: String },

    /// A catalogue style is defined neither in the manuscript nor in the template.
    #[error("Style '{name}' is not defined in the manuscript or the template")]
    MissingStyle { name: String },

    #[error("Failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid layout format '{format}': {reason}")]
    InvalidLayoutFormat { format: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
