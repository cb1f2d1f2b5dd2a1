use std::collections::BTreeMap;

use crate::types::{Claim, Cursor};

/// Claims already fetched, keyed by 1-based page number, plus the cursor for
/// the next unfetched page.
///
/// Entries are write-once: a page is never refetched until [`PageCache::clear`].
/// The cursor is not tied to a page, so revisiting page N after paging past it
/// serves whatever was stored for N.
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: BTreeMap<u32, Vec<Claim>>,
    cursor: Option<Cursor>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self, page: u32) -> Option<&[Claim]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Store rows for `page` unless it is already cached.
    ///
    /// Returns `false` when an earlier entry was kept.
    pub fn insert(&mut self, page: u32, rows: Vec<Claim>) -> bool {
        match self.pages.entry(page) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(rows);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn set_cursor(&mut self, cursor: Option<Cursor>) {
        self.cursor = cursor;
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Drop every page and the cursor.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.cursor = None;
    }
}
