//! Structured errors for operation-keyed calls
//!
//! Every failure class (unknown operation, bad arguments, transport failure,
//! non-success status, transform failure) collapses into the single
//! [`CallError`] shape carried by an error [`CallResult`]. Callers inspect
//! `message`/`status_code`/`cause`; they never match on error subtypes.
//!
//! [`CallResult`]: crate::types::CallResult

use crate::registry::RegistryError;
use crate::template::TemplateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error reported by a payload transform
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The structured error carried by an error call result
///
/// `message` is always present. `status_code` is set only for non-success
/// HTTP responses. `cause` carries the underlying error or response body
/// when one is available.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct CallError {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Value>,
}

impl CallError {
    /// Create an error with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            cause: None,
        }
    }

    /// Attach the HTTP status code
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Attach the underlying cause
    pub fn with_cause(mut self, cause: Value) -> Self {
        self.cause = Some(cause);
        self
    }
}

impl From<RegistryError> for CallError {
    fn from(err: RegistryError) -> Self {
        CallError::new(err.to_string())
    }
}

impl From<TemplateError> for CallError {
    fn from(err: TemplateError) -> Self {
        CallError::new(err.to_string())
    }
}
