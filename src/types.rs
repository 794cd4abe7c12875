//! Common types used throughout pagekit
//!
//! This module contains shared type aliases used across multiple modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Type-erased error returned by page fetchers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
