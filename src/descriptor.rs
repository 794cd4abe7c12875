//! Page descriptors
//!
//! A descriptor names the three fields that drive pagination of a list
//! method: the request's page-token field, the response's next-page-token
//! field and the response field holding the items. Descriptors are plain
//! configuration and can be loaded from YAML or JSON.
//!
//! ```yaml
//! request_token_field: pageToken
//! response_token_field: nextPageToken
//! resource_field: instances
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Field names used to paginate one list method.
///
/// Names are dotted paths into the JSON body (`meta.next`), optionally
/// prefixed with `$.`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorDefinition")]
pub struct PageDescriptor {
    request_token_field: String,
    response_token_field: String,
    resource_field: String,
}

impl PageDescriptor {
    /// Create a descriptor, rejecting empty field names
    pub fn new(
        request_token_field: impl Into<String>,
        response_token_field: impl Into<String>,
        resource_field: impl Into<String>,
    ) -> Result<Self> {
        let descriptor = Self {
            request_token_field: request_token_field.into(),
            response_token_field: response_token_field.into(),
            resource_field: resource_field.into(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Descriptor for the `pageToken`/`nextPageToken` convention
    pub fn google(resource_field: impl Into<String>) -> Result<Self> {
        Self::new("pageToken", "nextPageToken", resource_field)
    }

    /// Request field carrying the page token
    pub fn request_token_field(&self) -> &str {
        &self.request_token_field
    }

    /// Response field carrying the next page token
    pub fn response_token_field(&self) -> &str {
        &self.response_token_field
    }

    /// Response field carrying the items
    pub fn resource_field(&self) -> &str {
        &self.resource_field
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("request_token_field", &self.request_token_field),
            ("response_token_field", &self.response_token_field),
            ("resource_field", &self.resource_field),
        ];
        for (name, value) in fields {
            let path = value.trim();
            let path = path.strip_prefix("$.").unwrap_or(path);
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(Error::config(format!(
                    "descriptor field '{name}' must be a non-empty field path, got '{value}'"
                )));
            }
        }
        Ok(())
    }
}

/// Serialized form of a descriptor, validated on conversion
#[derive(Debug, Deserialize)]
struct DescriptorDefinition {
    #[serde(alias = "requestTokenField")]
    request_token_field: String,
    #[serde(alias = "responseTokenField")]
    response_token_field: String,
    #[serde(alias = "resourceField")]
    resource_field: String,
}

impl TryFrom<DescriptorDefinition> for PageDescriptor {
    type Error = Error;

    fn try_from(def: DescriptorDefinition) -> Result<Self> {
        Self::new(
            def.request_token_field,
            def.response_token_field,
            def.resource_field,
        )
    }
}

/// Load a descriptor from a YAML or JSON file
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<PageDescriptor> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    load_descriptor_from_str(&content)
}

/// Load a descriptor from a YAML or JSON string
pub fn load_descriptor_from_str(content: &str) -> Result<PageDescriptor> {
    let descriptor: PageDescriptor = serde_yaml::from_str(content)?;
    Ok(descriptor)
}
