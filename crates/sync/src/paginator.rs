//! Incremental page-fetch controller.
//!
//! [`Paginator`] walks a [`PageSource`] one page at a time. At most one fetch
//! runs per paginator: a call made while another is in flight returns
//! [`LoadOutcome::InFlight`] without touching the source. The cursor only
//! moves after a successful fetch, so a failed page is retried by simply
//! calling [`Paginator::load_next_page`] again.
//!
//! The in-flight flag and the loading signal are held by a lease that is
//! released on every exit path, including errors and a dropped future. A
//! successful [`PageLoad`] keeps the lease until the caller drops it, so the
//! caller can commit the page before the next load may start.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use citadel_core::types::PageNumber;
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// One fetched page plus the total page count reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage<T> {
    pub total_pages: PageNumber,
    pub items: Vec<T>,
}

/// Where pages come from.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;
    type Error: Display + Send;

    async fn fetch_page(&self, page: PageNumber) -> Result<FetchedPage<Self::Item>, Self::Error>;
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Pagination position. `total_pages` is `None` until the first response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub current_page: PageNumber,
    pub total_pages: Option<PageNumber>,
}

impl Cursor {
    pub const fn initial() -> Self {
        Self {
            current_page: 1,
            total_pages: None,
        }
    }

    /// Every known page has been fetched.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.total_pages, Some(total) if self.current_page > total)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::initial()
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one [`Paginator::load_next_page`] call.
#[derive(Debug)]
pub enum LoadOutcome<'a, T, E> {
    /// The page was fetched and the cursor advanced.
    Loaded(PageLoad<'a, T>),
    /// Another load was running; nothing was requested.
    InFlight,
    /// The last page was already fetched; nothing was requested.
    Exhausted,
    /// The fetch failed; the cursor still points at `page`.
    Failed { page: PageNumber, error: E },
}

/// A successfully fetched page.
///
/// Holds the paginator's in-flight lease: no other load can start until this
/// value is dropped.
#[derive(Debug)]
pub struct PageLoad<'a, T> {
    page: PageNumber,
    total_pages: PageNumber,
    is_last_page: bool,
    items: Vec<T>,
    _lease: InFlightLease<'a>,
}

impl<T> PageLoad<'_, T> {
    pub fn page(&self) -> PageNumber {
        self.page
    }

    pub fn total_pages(&self) -> PageNumber {
        self.total_pages
    }

    pub fn is_last_page(&self) -> bool {
        self.is_last_page
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Move the items out while keeping the lease held.
    pub fn take_items(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    /// Consume the load, releasing the lease.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Scoped ownership of the in-flight flag.
///
/// Acquiring raises the loading signal; dropping clears the flag and lowers
/// the signal.
#[derive(Debug)]
struct InFlightLease<'a> {
    flag: &'a AtomicBool,
    loading: &'a watch::Sender<bool>,
}

impl<'a> InFlightLease<'a> {
    /// Take the flag if it is free.
    fn try_acquire(flag: &'a AtomicBool, loading: &'a watch::Sender<bool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag, loading })
    }

    fn signal_loading(&self) {
        self.loading.send_replace(true);
    }
}

impl Drop for InFlightLease<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        if *self.loading.borrow() {
            self.loading.send_replace(false);
        }
    }
}

// ---------------------------------------------------------------------------
// Paginator
// ---------------------------------------------------------------------------

/// Cursor state machine over a [`PageSource`].
pub struct Paginator<S> {
    source: S,
    cursor: Mutex<Cursor>,
    in_flight: AtomicBool,
    loading: watch::Sender<bool>,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        let (loading, _) = watch::channel(false);
        Self {
            source,
            cursor: Mutex::new(Cursor::initial()),
            in_flight: AtomicBool::new(false),
            loading,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Snapshot of the current cursor.
    pub fn cursor(&self) -> Cursor {
        *self.lock_cursor()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Observe loading transitions. `true` while a fetch is running.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Fetch the page under the cursor.
    pub async fn load_next_page(&self) -> LoadOutcome<'_, S::Item, S::Error> {
        let Some(lease) = InFlightLease::try_acquire(&self.in_flight, &self.loading) else {
            tracing::trace!("Page load already in flight");
            return LoadOutcome::InFlight;
        };

        let page = {
            let cursor = self.lock_cursor();
            if cursor.is_exhausted() {
                tracing::trace!(current_page = cursor.current_page, "No pages left");
                return LoadOutcome::Exhausted;
            }
            cursor.current_page
        };

        lease.signal_loading();

        match self.source.fetch_page(page).await {
            Ok(fetched) => {
                let total_pages = fetched.total_pages;
                let is_last_page = {
                    let mut cursor = self.lock_cursor();
                    cursor.total_pages = Some(total_pages);
                    let is_last_page = cursor.current_page >= total_pages;
                    cursor.current_page = cursor
                        .current_page
                        .saturating_add(1)
                        .min(total_pages.saturating_add(1));
                    is_last_page
                };

                tracing::debug!(
                    page,
                    total_pages,
                    count = fetched.items.len(),
                    is_last_page,
                    "Page loaded",
                );

                LoadOutcome::Loaded(PageLoad {
                    page,
                    total_pages,
                    is_last_page,
                    items: fetched.items,
                    _lease: lease,
                })
            }
            Err(error) => {
                tracing::warn!(page, error = %error, "Page load failed");
                LoadOutcome::Failed { page, error }
            }
        }
    }

    /// Rewind to page 1 with an unknown page count.
    ///
    /// Does not wait for or cancel an in-flight load; callers should let it
    /// finish first.
    pub fn reset(&self) {
        *self.lock_cursor() = Cursor::initial();
        tracing::debug!("Paginator reset");
    }

    fn lock_cursor(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
