//! # pagekit
//!
//! Lazy, pull-based iteration over paginated list APIs.
//!
//! A list call that returns results one page at a time, with a continuation
//! token, becomes a single flat sequence of items. Pages are fetched only
//! when earlier ones run out; empty intermediate pages are skipped.
//!
//! ## Features
//!
//! - **Typed capability traits**: `PageRequest` / `PageResponse` for generated API bindings
//! - **Descriptor-driven JSON**: paginate untyped bodies by naming three fields
//! - **Restart and resume**: replay a listing, or continue from a saved token
//! - **Page granularity**: iterate whole pages when items are too fine-grained
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagekit::{json, PageDescriptor, Result};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let descriptor = Arc::new(PageDescriptor::google("instances")?);
//!     let request = serde_json::json!({ "project": "demo" });
//!
//!     let instances = json::paged_sequence(descriptor, request, |body: &serde_json::Value| {
//!         transport.call("instances.list", body)
//!     })?;
//!
//!     for instance in instances {
//!         println!("{}", instance?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      PagedSequence                        │
//! │  next_item()  peek()  current_page_items()  restart()     │
//! │  Unfetched ─▶ InPage(cursor) ─▶ Exhausted | Failed        │
//! └───────────────────────────────────────────────────────────┘
//!                │                          │
//!      ┌─────────┴─────────┐      ┌─────────┴──────────┐
//!      │ PageRequest       │      │ fetcher closure    │
//!      │ PageResponse      │      │ FnMut(&R) -> P     │
//!      ├───────────────────┤      └────────────────────┘
//!      │ typed bindings    │
//!      │ JSON + descriptor │
//!      └───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for pagekit
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paged sequence and capability traits
pub mod pagination;

/// Page descriptors and their loaders
pub mod descriptor;

/// Descriptor-driven JSON adapter
pub mod json;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use descriptor::{load_descriptor, load_descriptor_from_str, PageDescriptor};
pub use json::{JsonRequest, JsonResponse};
pub use pagination::{Page, PageRequest, PageResponse, PagedSequence, Pages, PagingStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
