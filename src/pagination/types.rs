//! Pagination types and traits
//!
//! Defines the capability traits a paged list API exposes to the sequence,
//! and the page values the sequence keeps between fetches.

use crate::error::Result;

/// Access to the page-token field of a list request.
///
/// `None` and the empty string both mean "no token", i.e. the first page.
pub trait PageRequest {
    /// Current value of the request's page-token field
    fn page_token(&self) -> Option<&str>;

    /// Overwrite the request's page-token field
    fn set_page_token(&mut self, token: Option<&str>);
}

/// Access to the continuation token and items of a list response.
pub trait PageResponse: Sized {
    /// Element type of the resource collection
    type Item;

    /// Raw value of the response's next-page-token field.
    ///
    /// Fails with [`Error::Protocol`](crate::Error::Protocol) when the field
    /// holds something that cannot be a token, so a malformed response does
    /// not end the listing early.
    fn next_page_token(&self) -> Result<Option<String>>;

    /// Consume the response, yielding its resource collection.
    ///
    /// Fails with [`Error::Protocol`](crate::Error::Protocol) when the
    /// response does not carry the collection.
    fn into_items(self) -> Result<Vec<Self::Item>>;
}

/// One fetched page, reduced to the two fields pagination needs
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page. An empty token is stored as `None`.
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token: next_page_token.filter(|token| !token.is_empty()),
        }
    }

    /// Reduce a response to a page
    pub fn from_response<P>(response: P) -> Result<Self>
    where
        P: PageResponse<Item = T>,
    {
        let token = response.next_page_token()?;
        let items = response.into_items()?;
        Ok(Self::new(items, token))
    }

    /// Items of this page
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Token of the following page, if there is one
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// Returns `true` if another page follows this one
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if this page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Counters for a single pass over a paged list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingStats {
    /// Fetcher invocations that returned a page
    pub pages_fetched: u64,
    /// Items handed out by `next_item`
    pub items_yielded: u64,
}

impl PagingStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Count a yielded item
    pub fn add_item(&mut self) {
        self.items_yielded += 1;
    }
}

/// Position of a sequence in its page-advance state machine
#[derive(Debug, Clone)]
pub(crate) enum PageState<T> {
    /// Nothing fetched since construction or the last restart
    Unfetched,
    /// Serving items of `page`, next one at `cursor`
    InPage { page: Page<T>, cursor: usize },
    /// Last page consumed and it had no continuation token
    Exhausted { page: Page<T> },
    /// A fetch failed; nothing more is served until restart
    Failed,
}

impl<T> PageState<T> {
    pub(crate) fn page(&self) -> Option<&Page<T>> {
        match self {
            Self::InPage { page, .. } | Self::Exhausted { page } => Some(page),
            Self::Unfetched | Self::Failed => None,
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted { .. } | Self::Failed)
    }
}
