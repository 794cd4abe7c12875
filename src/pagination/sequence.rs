//! Paged sequence implementation
//!
//! Turns a page fetcher into a flat, lazy sequence of items. Pages are
//! fetched on demand, one at a time, as earlier pages run out.

use super::types::{Page, PageRequest, PageResponse, PageState, PagingStats};
use crate::error::{Error, Result};
use crate::types::BoxError;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use tracing::{debug, trace, warn};

// ============================================================================
// Paged Sequence
// ============================================================================

/// Lazy item-by-item view over a paginated list call.
///
/// The sequence owns the request and overwrites its page-token field before
/// each follow-up fetch. Nothing is fetched until the first item, token or
/// page is asked for.
///
/// # Example
///
/// ```rust,ignore
/// let mut items = PagedSequence::new(request, |req: &ListUsersRequest| client.list_users(req));
/// while let Some(user) = items.next_item()? {
///     println!("{}", user.name);
/// }
/// ```
pub struct PagedSequence<R, P, F>
where
    P: PageResponse,
{
    request: R,
    fetcher: F,
    initial_token: Option<String>,
    state: PageState<P::Item>,
    stats: PagingStats,
    _response: PhantomData<fn() -> P>,
}

impl<R, P, F, E> PagedSequence<R, P, F>
where
    R: PageRequest,
    P: PageResponse,
    F: FnMut(&R) -> std::result::Result<P, E>,
    E: Into<BoxError>,
{
    /// Create a sequence over `request`, fetching pages with `fetcher`.
    ///
    /// Captures the request's current page token so `restart` can return to
    /// it later.
    pub fn new(request: R, fetcher: F) -> Self {
        let initial_token = request.page_token().map(str::to_owned);
        Self {
            request,
            fetcher,
            initial_token,
            state: PageState::Unfetched,
            stats: PagingStats::new(),
            _response: PhantomData,
        }
    }

    /// Returns `true` if another item is available, fetching pages as needed
    pub fn has_next(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_some())
    }

    /// Borrow the next item without advancing
    pub fn peek(&mut self) -> Result<Option<&P::Item>> {
        self.settle()?;
        Ok(match &self.state {
            PageState::InPage { page, cursor } => page.items().get(*cursor),
            _ => None,
        })
    }

    /// Return the next item and advance.
    ///
    /// `Ok(None)` means the list is exhausted; asking again keeps returning
    /// `Ok(None)` without calling the fetcher.
    pub fn next_item(&mut self) -> Result<Option<P::Item>>
    where
        P::Item: Clone,
    {
        self.settle()?;
        let item = match &mut self.state {
            PageState::InPage { page, cursor } => {
                let item = page.items().get(*cursor).cloned();
                *cursor += 1;
                item
            }
            _ => None,
        };
        if item.is_some() {
            self.stats.add_item();
        }
        Ok(item)
    }

    /// All items of the current page, regardless of the cursor
    pub fn current_page_items(&mut self) -> Result<&[P::Item]> {
        self.ensure_fetched()?;
        Ok(self.state.page().map(Page::items).unwrap_or_default())
    }

    /// Continuation token of the current page, `None` on the last page
    pub fn next_page_token(&mut self) -> Result<Option<&str>> {
        self.ensure_fetched()?;
        Ok(self.state.page().and_then(Page::next_page_token))
    }

    /// Iterate page by page, starting from the page `current_request` points at.
    ///
    /// Any page already fetched by this sequence is dropped and fetched again.
    pub fn into_pages(self) -> Pages<R, P, F> {
        Pages {
            request: self.request,
            fetcher: self.fetcher,
            done: false,
            stats: PagingStats::new(),
            _response: PhantomData,
        }
    }

    fn ensure_fetched(&mut self) -> Result<()> {
        if matches!(self.state, PageState::Unfetched) {
            let page = fetch_page(&mut self.fetcher, &self.request, &mut self.stats);
            self.enter(page)?;
        }
        Ok(())
    }

    /// Move past used-up pages until an item is current or the list ends
    fn settle(&mut self) -> Result<()> {
        self.ensure_fetched()?;
        loop {
            let (was_empty, next_token) = match &self.state {
                PageState::InPage { page, cursor } if *cursor >= page.len() => (
                    page.is_empty(),
                    page.next_page_token().map(str::to_owned),
                ),
                _ => return Ok(()),
            };

            let Some(token) = next_token else {
                if let PageState::InPage { page, .. } =
                    std::mem::replace(&mut self.state, PageState::Failed)
                {
                    self.state = PageState::Exhausted { page };
                }
                debug!(
                    pages = self.stats.pages_fetched,
                    items = self.stats.items_yielded,
                    "Paged list exhausted"
                );
                return Ok(());
            };

            if was_empty {
                trace!("Skipping empty page with continuation token");
            }
            self.request.set_page_token(Some(&token));
            let page = fetch_page(&mut self.fetcher, &self.request, &mut self.stats);
            self.enter(page)?;
        }
    }

    fn enter(&mut self, page: Result<Page<P::Item>>) -> Result<()> {
        match page {
            Ok(page) => {
                self.state = PageState::InPage { page, cursor: 0 };
                Ok(())
            }
            Err(e) => {
                self.state = PageState::Failed;
                Err(e)
            }
        }
    }
}

impl<R, P, F> PagedSequence<R, P, F>
where
    R: PageRequest,
    P: PageResponse,
{
    /// Go back to the page the sequence started from.
    ///
    /// Restores the construction-time page token, forgets the current page
    /// and resets the stats. Calling it before anything was consumed changes
    /// nothing.
    pub fn restart(&mut self) {
        if self.request.page_token() != self.initial_token.as_deref() {
            self.request.set_page_token(self.initial_token.as_deref());
        }
        self.state = PageState::Unfetched;
        self.stats = PagingStats::new();
    }

    /// Continue from a page token observed earlier, e.g. one persisted from
    /// `next_page_token`. An empty token means the first page.
    pub fn resume_from(&mut self, token: &str) {
        let token = Some(token).filter(|t| !t.is_empty());
        self.request.set_page_token(token);
        self.state = PageState::Unfetched;
    }

    /// The request as sent for the page currently being iterated
    pub fn current_request(&self) -> &R {
        &self.request
    }

    /// Page token the request carried at construction
    pub fn initial_token(&self) -> Option<&str> {
        self.initial_token.as_deref()
    }

    /// Returns `true` once the list ended or a fetch failed
    pub fn is_exhausted(&self) -> bool {
        self.state.is_terminal()
    }

    /// Pages fetched and items yielded since construction or restart
    pub fn stats(&self) -> &PagingStats {
        &self.stats
    }

    /// Consume the sequence and return its request
    pub fn into_request(self) -> R {
        self.request
    }
}

impl<R, P, F, E> Iterator for PagedSequence<R, P, F>
where
    R: PageRequest,
    P: PageResponse,
    P::Item: Clone,
    F: FnMut(&R) -> std::result::Result<P, E>,
    E: Into<BoxError>,
{
    type Item = Result<P::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}

impl<R, P, F, E> FusedIterator for PagedSequence<R, P, F>
where
    R: PageRequest,
    P: PageResponse,
    P::Item: Clone,
    F: FnMut(&R) -> std::result::Result<P, E>,
    E: Into<BoxError>,
{
}

impl<R, P, F> fmt::Debug for PagedSequence<R, P, F>
where
    R: fmt::Debug,
    P: PageResponse,
    P::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedSequence")
            .field("request", &self.request)
            .field("initial_token", &self.initial_token)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Page Iterator
// ============================================================================

/// Page-granular iterator over a paginated list call.
///
/// Yields every fetched page in order, empty ones included, and stops after
/// the first page without a continuation token or after a failed fetch.
pub struct Pages<R, P, F>
where
    P: PageResponse,
{
    request: R,
    fetcher: F,
    done: bool,
    stats: PagingStats,
    _response: PhantomData<fn() -> P>,
}

impl<R, P, F> Pages<R, P, F>
where
    P: PageResponse,
{
    /// Pages fetched so far
    pub fn stats(&self) -> &PagingStats {
        &self.stats
    }
}

impl<R, P, F, E> Iterator for Pages<R, P, F>
where
    R: PageRequest,
    P: PageResponse,
    F: FnMut(&R) -> std::result::Result<P, E>,
    E: Into<BoxError>,
{
    type Item = Result<Page<P::Item>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let page = fetch_page(&mut self.fetcher, &self.request, &mut self.stats);
        match &page {
            Ok(page) => match page.next_page_token() {
                Some(token) => self.request.set_page_token(Some(token)),
                None => self.done = true,
            },
            Err(_) => self.done = true,
        }
        Some(page)
    }
}

impl<R, P, F, E> FusedIterator for Pages<R, P, F>
where
    R: PageRequest,
    P: PageResponse,
    F: FnMut(&R) -> std::result::Result<P, E>,
    E: Into<BoxError>,
{
}

/// Invoke the fetcher once and reduce its response to a page
fn fetch_page<R, P, F, E>(
    fetcher: &mut F,
    request: &R,
    stats: &mut PagingStats,
) -> Result<Page<P::Item>>
where
    R: PageRequest,
    P: PageResponse,
    F: FnMut(&R) -> std::result::Result<P, E>,
    E: Into<BoxError>,
{
    debug!(
        page = stats.pages_fetched,
        has_token = request.page_token().is_some_and(|t| !t.is_empty()),
        "Fetching page"
    );

    let response = fetcher(request).map_err(|e| {
        let err = Error::fetch(e);
        warn!("Page fetch failed: {err}");
        err
    })?;
    let page = Page::from_response(response)?;
    stats.add_page();

    trace!(items = page.len(), has_more = page.has_more(), "Fetched page");
    Ok(page)
}
