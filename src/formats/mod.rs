//! Output format encoders
//!
//! Each encoder maps a normalized JSON value to the bytes of one output
//! format. `FormatTag` is the dispatch table: adding a format means adding a
//! variant, and every `match` on it has to handle the new case.
//!
//! | Tag  | Accepts                    | Content-Type |
//! |------|----------------------------|--------------|
//! | csv  | non-empty array of objects | `text/csv` |
//! | xml  | any value                  | `application/xml` |
//! | yaml | any value                  | `application/x-yaml` |
//! | pdf  | any value                  | `application/pdf` |
//! | xlsx | non-empty array of objects | `application/vnd.openxmlformats-officedocument.spreadsheetml.sheet` |
//! | png  | any value                  | `image/png` |

mod csv;
mod error;
mod pdf;
mod png;
mod tabular;
mod xlsx;
mod xml;
mod yaml;

use std::fmt;

use serde_json::Value;

pub use error::{EncodeError, EncodeResult};

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Csv,
    Xml,
    Yaml,
    Pdf,
    Xlsx,
    Png,
}

impl FormatTag {
    pub const ALL: [FormatTag; 6] = [
        FormatTag::Csv,
        FormatTag::Xml,
        FormatTag::Yaml,
        FormatTag::Pdf,
        FormatTag::Xlsx,
        FormatTag::Png,
    ];

    /// Parse a request tag. Tags are matched exactly, lowercase.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "csv" => Some(Self::Csv),
            "xml" => Some(Self::Xml),
            "yaml" => Some(Self::Yaml),
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Wire tag, also used as the file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xml => "application/xml",
            Self::Yaml => "application/x-yaml",
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Png => "image/png",
        }
    }

    /// Suggested download name
    pub fn filename(&self) -> String {
        format!("data.{}", self.as_str())
    }

    /// Name used in user-facing error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xml => "XML",
            Self::Yaml => "YAML",
            Self::Pdf => "PDF",
            Self::Xlsx => "Excel",
            Self::Png => "PNG",
        }
    }

    /// Run the encoder for this format
    pub fn encode(&self, value: &Value) -> EncodeResult<Vec<u8>> {
        match self {
            Self::Csv => self::csv::encode(value),
            Self::Xml => xml::encode(value),
            Self::Yaml => yaml::encode(value),
            Self::Pdf => pdf::encode(value),
            Self::Xlsx => xlsx::encode(value),
            Self::Png => png::encode(value),
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-space indented JSON text, as drawn by the PDF and PNG encoders
pub(crate) fn pretty_text(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
