use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body the analyser service sends alongside a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Server-provided detail, if any. Blank messages count as absent.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {name}")]
pub struct UnknownFieldError {
    pub name: String,
}

impl UnknownFieldError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
