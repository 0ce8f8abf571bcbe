//! Request validation
//!
//! Turns the `{ data, format }` envelope into a normalized JSON value and a
//! format tag. String `data` is parsed as JSON text; structured `data` is
//! serialized and parsed back so every request goes through the same parser.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{ConvertError, ConvertResult};
use crate::formats::FormatTag;

/// Body of `POST /convert`
///
/// Only a JSON object is accepted. Members other than `data` and `format`
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ConvertRequest {
    pub data: Option<Value>,
    pub format: Option<Value>,
}

impl From<Map<String, Value>> for ConvertRequest {
    fn from(mut body: Map<String, Value>) -> Self {
        Self {
            data: body.remove("data"),
            format: body.remove("format"),
        }
    }
}

/// JSON input after validation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    /// Input exactly as received; this is what the cache key is derived from
    pub raw: String,
    /// Parsed value handed to the encoders
    pub value: Value,
}

impl ConvertRequest {
    /// Validate `data` first, then `format`
    pub fn validate(&self) -> ConvertResult<(NormalizedInput, FormatTag)> {
        let input = normalize(self.data.as_ref())?;
        let format = parse_format(self.format.as_ref())?;
        Ok((input, format))
    }
}

/// Normalize the `data` field into a parsed JSON value
pub fn normalize(data: Option<&Value>) -> ConvertResult<NormalizedInput> {
    match data {
        None | Some(Value::Null) => Err(ConvertError::InvalidInput("missing data".to_string())),
        Some(Value::String(text)) => {
            let value = serde_json::from_str(text)
                .map_err(|e| ConvertError::InvalidInput(e.to_string()))?;
            Ok(NormalizedInput {
                raw: text.clone(),
                value,
            })
        }
        Some(structured) => {
            let raw = serde_json::to_string(structured)
                .map_err(|e| ConvertError::InvalidInput(e.to_string()))?;
            let value = serde_json::from_str(&raw)
                .map_err(|e| ConvertError::InvalidInput(e.to_string()))?;
            Ok(NormalizedInput { raw, value })
        }
    }
}

/// Parse the `format` field into a tag
pub fn parse_format(format: Option<&Value>) -> ConvertResult<FormatTag> {
    match format {
        Some(Value::String(tag)) => FormatTag::parse(tag)
            .ok_or_else(|| ConvertError::UnsupportedFormat(tag.clone())),
        Some(other) => Err(ConvertError::UnsupportedFormat(other.to_string())),
        None => Err(ConvertError::UnsupportedFormat("missing format".to_string())),
    }
}
