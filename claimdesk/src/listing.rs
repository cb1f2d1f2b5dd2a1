//! Claim list view-model.
//!
//! [`ClaimList`] holds everything the claim list renders from: the selected
//! page, the rows on screen, loading/error state and the pagination estimate.
//! Loading is split in two halves so any driver can sit in between:
//! [`ClaimList::begin_load`] decides whether a fetch is needed and
//! [`ClaimList::finish_load`] applies its result.

use tracing::{debug, info, warn};

use crate::cache::PageCache;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::Result;
use crate::types::{Claim, ClaimPage, ClaimsRequest};

/// Page-level message shown in place of the list when a load fails.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to fetch claims.";

/// What [`ClaimList::begin_load`] decided.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStep {
    /// Another load is in flight; nothing changed.
    Busy,
    /// The page was served from cache.
    Cached,
    /// The page must be fetched with this request.
    Fetch(ClaimsRequest),
}

/// Pagination estimate sized from cursor presence.
///
/// One extra item past the current page is enough to enable "next".
pub fn estimate_total(page: u32, page_size: usize, has_more: bool) -> u64 {
    let shown = u64::from(page) * page_size as u64;
    if has_more {
        shown + 1
    } else {
        shown
    }
}

#[derive(Debug, Clone)]
pub struct ClaimList {
    page_size: usize,
    current_page: u32,
    cache: PageCache,
    claims: Vec<Claim>,
    loading: bool,
    error: Option<String>,
    total_items: u64,
    next_enable: bool,
}

impl Default for ClaimList {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ClaimList {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            current_page: 1,
            cache: PageCache::new(),
            claims: Vec::new(),
            loading: false,
            error: None,
            total_items: 0,
            next_enable: false,
        }
    }

    // --- Accessors ---

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Rows currently on screen.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn find(&self, claim_id: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.id == claim_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn next_enable(&self) -> bool {
        self.next_enable
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Pages the pagination control offers, from the total estimate.
    pub fn page_count(&self) -> u32 {
        let size = self.page_size.max(1) as u64;
        let pages = self.total_items.div_ceil(size);
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// Whether a page change to `page` would be accepted right now.
    pub fn can_select(&self, page: u32) -> bool {
        !self.loading && page >= 1 && page <= self.page_count()
    }

    // --- Transitions ---

    /// Record a new selected page. Returns `false` if it was already selected.
    pub fn select_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Start loading `page`.
    ///
    /// A cached page is applied immediately. Otherwise the list enters the
    /// loading state and returns the request to send, built from the current
    /// cursor.
    pub fn begin_load(&mut self, page: u32) -> LoadStep {
        if self.loading {
            debug!(page, "load already in flight");
            return LoadStep::Busy;
        }
        self.error = None;

        if let Some(rows) = self.cache.page(page) {
            debug!(page, rows = rows.len(), "serving page from cache");
            self.claims = rows.to_vec();
            return LoadStep::Cached;
        }

        self.loading = true;
        LoadStep::Fetch(ClaimsRequest::new(
            self.page_size,
            self.cache.cursor().cloned(),
        ))
    }

    /// Apply the outcome of a fetch started by [`ClaimList::begin_load`].
    ///
    /// On failure nothing but the error and loading flag changes, and the
    /// error is handed back to the caller.
    pub fn finish_load(&mut self, page: u32, result: Result<ClaimPage>) -> Result<()> {
        self.loading = false;
        match result {
            Ok(fetched) => {
                let has_more = fetched.has_more();
                info!(page, rows = fetched.rows.len(), has_more, "claims loaded");
                self.claims = fetched.rows.clone();
                self.cache.insert(page, fetched.rows);
                self.cache.set_cursor(fetched.cursor);
                self.next_enable = has_more;
                self.total_items = estimate_total(page, self.page_size, has_more);
                Ok(())
            }
            Err(e) => {
                warn!(page, error = %e, "failed to fetch claims");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Forget every cached page and the cursor and go back to page 1.
    ///
    /// Rows on screen stay until the next load replaces them. A fetch still
    /// in flight is forgotten too; its result must be dropped, not passed to
    /// [`ClaimList::finish_load`].
    pub fn invalidate(&mut self) {
        debug!(pages = self.cache.len(), loading = self.loading, "invalidating claim cache");
        self.cache.clear();
        self.loading = false;
        self.current_page = 1;
        self.next_enable = false;
        self.total_items = 0;
        self.error = None;
    }
}
