//! Recorded list conversations
//!
//! A fixture holds the initial request body and the response body served for
//! each page token. The empty token `""` keys the first page.
//!
//! ```yaml
//! request:
//!   parent: projects/demo
//! pages:
//!   "":
//!     resources: [a, b]
//!     nextPageToken: t1
//!   t1:
//!     resources: [c]
//! ```

use crate::error::{Error, Result};
use crate::json::JsonRequest;
use crate::pagination::PageRequest;
use crate::types::{JsonObject, JsonValue};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Failure to serve a page from a fixture
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("no recorded page for token '{token}'")]
    MissingPage { token: String },
}

/// Recorded request and pages of one listing
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Body of the first request
    #[serde(default = "empty_request")]
    pub request: JsonValue,

    /// Response body per request page token
    pub pages: HashMap<String, JsonValue>,
}

fn empty_request() -> JsonValue {
    JsonValue::Object(JsonObject::new())
}

impl Fixture {
    /// Serve the recorded response for the request's page token
    pub fn respond(&self, request: &JsonRequest) -> std::result::Result<JsonValue, ReplayError> {
        let token = request.page_token().unwrap_or_default();
        self.pages
            .get(token)
            .cloned()
            .ok_or_else(|| ReplayError::MissingPage {
                token: token.to_string(),
            })
    }
}

/// Load a fixture from a YAML or JSON file
pub fn load_fixture(path: impl AsRef<Path>) -> Result<Fixture> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    load_fixture_from_str(&content)
}

/// Load a fixture from a YAML or JSON string
pub fn load_fixture_from_str(content: &str) -> Result<Fixture> {
    let fixture: Fixture = serde_yaml::from_str(content)?;
    Ok(fixture)
}
