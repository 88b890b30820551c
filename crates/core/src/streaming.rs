//! Stage Event Types
//!
//! Types shared between the demultiplexer (this crate) and the verdict
//! resolver (client crate): the decoded stage object and the extraction
//! outcomes that are not a complete object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The stage label carrying the authoritative result.
pub const FINAL_STAGE: &str = "final";

/// One incremental processing stage emitted by the fact-check service.
///
/// Only `stage` and `content` are read; any other fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StageEvent {
    /// Pipeline position label. Missing labels are treated as non-final.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Stage payload. Meaningful only for the final stage.
    #[serde(default)]
    pub content: Value,
}

impl StageEvent {
    /// Create a stage event.
    pub fn new(stage: impl Into<String>, content: Value) -> Self {
        Self {
            stage: Some(stage.into()),
            content,
        }
    }

    /// Whether this is the final stage.
    pub fn is_final(&self) -> bool {
        self.stage.as_deref() == Some(FINAL_STAGE)
    }

    /// Stage label for logging; `"<none>"` when absent.
    pub fn stage_name(&self) -> &str {
        self.stage.as_deref().unwrap_or("<none>")
    }

    /// Decode a stage event from an extracted JSON object.
    ///
    /// A non-string `stage` is treated as absent rather than failing the
    /// whole object.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let stage = match map.remove("stage") {
                    Some(Value::String(s)) => Some(s),
                    _ => None,
                };
                let content = map.remove("content").unwrap_or(Value::Null);
                Self { stage, content }
            }
            _ => Self::default(),
        }
    }
}

/// Reasons the demultiplexer could not hand out a complete object.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No complete object at the start of the buffer yet; wait for more input.
    #[error("No complete JSON object in buffer")]
    Incomplete,

    /// Text that does not start an object precedes the next `{`.
    #[error("Skipped {consumed} bytes of non-object text")]
    Stray {
        /// Bytes to drop from the front of the buffer
        consumed: usize,
    },

    /// A balanced `{...}` unit was found but is not valid JSON.
    #[error("Malformed JSON object ({consumed} bytes): {source}")]
    Malformed {
        /// Bytes to drop from the front of the buffer (unit plus trailing whitespace)
        consumed: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractError {
    /// Whether this is the expected "wait for more input" condition.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ExtractError::Incomplete)
    }

    /// Bytes the caller should discard before retrying, if any.
    pub fn consumed(&self) -> usize {
        match self {
            ExtractError::Incomplete => 0,
            ExtractError::Stray { consumed } | ExtractError::Malformed { consumed, .. } => {
                *consumed
            }
        }
    }
}
