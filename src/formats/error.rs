//! Encoder error types
//!
//! Every encoder reports failures through `EncodeError`, whether the input
//! had the wrong shape or the underlying writer failed.

use thiserror::Error;

/// Unified encoder error type
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Tabular encoders need a non-empty array of objects
    #[error("Expected a non-empty array of objects, got {0}")]
    NotTabular(&'static str),

    /// A row of a tabular input was not an object
    #[error("Row {index} is {found}, expected an object")]
    RowNotObject { index: usize, found: &'static str },

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// YAML serializer error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// XML writer error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// PDF assembly error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Workbook archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking encoder task did not complete
    #[error("Encoder task failed: {0}")]
    Worker(String),
}

/// Result type alias for encoder operations
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
