//! Pagination module
//!
//! Flattens a paginated list call into a lazy sequence of items.
//!
//! # Overview
//!
//! A list API is described to this module through two capability traits:
//! [`PageRequest`] gives access to the request's page-token field and
//! [`PageResponse`] to the response's continuation token and items. A
//! [`PagedSequence`] drives any fetcher closure over such types, fetching
//! pages only as earlier ones are used up.

mod sequence;
mod types;

pub use sequence::{PagedSequence, Pages};
pub use types::{Page, PageRequest, PageResponse, PagingStats};
