//! Registry manifest loading
//!
//! A manifest is the JSON form of a registry: a base URL plus one entry per
//! operation. Transforms are code, not data, so manifests never carry them;
//! attach transforms programmatically when you need reshaping.
//!
//! ```json
//! {
//!   "base_url": "https://api.example.com",
//!   "operations": [
//!     { "name": "getUserTodos", "url": "users/{userId}/todos", "method": "GET" }
//!   ]
//! }
//! ```

use crate::registry::{EndpointRegistry, RegistryError};
use crate::types::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// One operation entry in a manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationEntry {
    pub name: String,
    pub url: String,
    pub method: Method,
}

/// The JSON form of an endpoint registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryManifest {
    pub base_url: String,
    pub operations: Vec<OperationEntry>,
}

impl RegistryManifest {
    /// Parse a manifest from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Json` on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compile the manifest into a validated registry
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` for empty/duplicate names, malformed
    /// templates, or an empty base URL.
    pub fn build_registry(&self) -> Result<EndpointRegistry, RegistryError> {
        let mut builder = EndpointRegistry::builder(self.base_url.clone());
        for entry in &self.operations {
            builder = builder.operation(entry.name.clone(), entry.method, &entry.url)?;
        }
        builder.build()
    }
}
