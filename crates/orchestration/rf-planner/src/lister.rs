//! Cursor-paginated iteration over an ordered listing.

use std::cmp::Ordering;

use async_stream::try_stream;
use futures::Stream;
use rf_error::Result;
use rf_traits::SharedLister;
use rf_types::{KeySummary, ListRequest, Page};
use tracing::{debug, warn};

/// Tracks listing order and reports keys that do not strictly increase.
///
/// A violation means the key space changed while it was being read. Items are
/// never dropped or reordered; the violation is logged and counted.
#[derive(Debug, Default)]
pub(crate) struct OrderingGuard {
    previous: Option<KeySummary>,
    violations: u64,
}

impl OrderingGuard {
    /// Observe the next item. Returns `false` if it violates the order.
    pub(crate) fn observe(&mut self, item: &KeySummary) -> bool {
        let in_order = self
            .previous
            .as_ref()
            .is_none_or(|previous| item.position_cmp(previous) == Ordering::Greater);

        if !in_order {
            self.violations += 1;
            warn!(
                container = %item.container,
                previous = ?self.previous.as_ref().map(|p| &p.key),
                current = %item.key,
                "Listing returned a key that does not follow its predecessor; \
                 the key space may have changed since planning"
            );
        }

        self.previous = Some(item.clone());
        in_order
    }

    pub(crate) fn violations(&self) -> u64 {
        self.violations
    }
}

/// Cursor state owned by one lister.
#[derive(Debug, Default)]
struct CursorState {
    page: Option<Page>,
    position: usize,
    terminal: bool,
}

impl CursorState {
    fn load(&mut self, page: Page) {
        self.page = Some(page);
        self.position = 0;
    }

    fn advance(&mut self) -> Option<KeySummary> {
        let item = self.page.as_ref()?.items.get(self.position)?.clone();
        self.position += 1;
        Some(item)
    }
}

/// Linear, ascending stream of keys over a paged listing.
///
/// Pages are fetched lazily, one at a time. A failed fetch leaves the cursor
/// where it was, so calling [`next`](PaginatedLister::next) again re-issues
/// the same request. Once the final page is drained the lister is terminal and
/// keeps returning `Ok(None)`.
pub struct PaginatedLister {
    lister: SharedLister,
    request: ListRequest,
    state: CursorState,
    ordering: OrderingGuard,
    pages_fetched: u64,
    items_returned: u64,
}

impl PaginatedLister {
    /// Create a lister over `container/key_prefix` starting after `start_marker`.
    pub fn new(
        lister: SharedLister,
        container: impl Into<String>,
        key_prefix: impl Into<String>,
        start_marker: Option<String>,
        page_size: u32,
    ) -> Self {
        let request = ListRequest::new(container, key_prefix, page_size).with_marker(start_marker);
        Self::from_request(lister, request)
    }

    /// Create a lister that starts with the given request.
    pub fn from_request(lister: SharedLister, request: ListRequest) -> Self {
        Self {
            lister,
            request,
            state: CursorState::default(),
            ordering: OrderingGuard::default(),
            pages_fetched: 0,
            items_returned: 0,
        }
    }

    /// Return the next key, fetching pages as needed.
    ///
    /// Returns `Ok(None)` once the listing is exhausted, and also for a call
    /// whose page fetch came back empty but truncated; at most one page is
    /// fetched past an exhausted page per call.
    pub async fn next(&mut self) -> Result<Option<KeySummary>> {
        if self.state.terminal {
            return Ok(None);
        }

        if self.state.page.is_none() {
            debug!(
                container = %self.request.container,
                prefix = %self.request.prefix,
                marker = ?self.request.marker,
                "Listing objects"
            );
            let page = self.lister.list(&self.request).await?;
            self.install(page);
        }

        if let Some(item) = self.state.advance() {
            return Ok(Some(self.emit(item)));
        }

        let next_page = match self.state.page.as_ref() {
            Some(page) if !page.is_final() => {
                debug!(
                    marker = ?page.next_marker(),
                    "Current page reached its end, fetching next page"
                );
                self.lister.list_next(page).await?
            }
            _ => {
                self.state.terminal = true;
                return Ok(None);
            }
        };
        self.install(next_page);

        match self.state.advance() {
            Some(item) => Ok(Some(self.emit(item))),
            None => {
                debug!("Fetched page is empty, no more objects to read");
                Ok(None)
            }
        }
    }

    fn install(&mut self, page: Page) {
        self.pages_fetched += 1;
        self.state.load(page);
    }

    fn emit(&mut self, item: KeySummary) -> KeySummary {
        self.ordering.observe(&item);
        self.items_returned += 1;
        item
    }

    /// Whether the final page has been drained.
    pub fn is_exhausted(&self) -> bool {
        self.state.terminal
    }

    /// Number of pages fetched successfully.
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// Number of keys returned so far.
    pub fn items_returned(&self) -> u64 {
        self.items_returned
    }

    /// Number of keys that did not sort after their predecessor.
    pub fn ordering_violations(&self) -> u64 {
        self.ordering.violations()
    }

    /// Consume the lister as a stream of keys.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<KeySummary>> {
        try_stream! {
            while let Some(item) = self.next().await? {
                yield item;
            }
        }
    }
}
