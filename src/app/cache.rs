//! Local replica of the user's shelf.
//!
//! [`ShelfCache`] holds shelf entries in the order the remote store returned
//! them and is reconciled by full reloads. Two races are guarded here:
//!
//! - **Load supersession**: every load gets a [`LoadTicket`]; only the response
//!   to the most recently issued load is applied, so a slow response for an
//!   old filter cannot overwrite a newer one.
//! - **Delete resurrection**: an optimistically removed id is tombstoned.
//!   Responses to loads issued before the delete was confirmed are filtered
//!   against the tombstones, so a snapshot taken before the delete cannot
//!   bring the entry back.

use crate::domain::{EntryId, ShelfEntry, StatusFilter};
use std::collections::{HashMap, HashSet};

/// Identifies one issued shelf load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

/// Delete bookkeeping for one removed id.
///
/// Retries of the same delete share one tombstone. Once any delete of the id
/// is confirmed the tombstone stays confirmed, even if a later retry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Tombstone {
    /// Delete requests still outstanding; while non-zero every load response
    /// is filtered.
    outstanding: u32,
    /// Newest issued load when a delete was confirmed. Loads issued later
    /// reflect the deletion and retire the tombstone.
    confirmed_at: Option<LoadTicket>,
}

impl Tombstone {
    fn filters(self, ticket: LoadTicket) -> bool {
        self.outstanding > 0 || self.confirmed_at.is_some_and(|at| ticket <= at)
    }
}

/// Ordered, id-unique replica of the remote shelf.
#[derive(Debug, Clone, Default)]
pub struct ShelfCache {
    entries: Vec<ShelfEntry>,
    issued: u64,
    loading: Option<(LoadTicket, StatusFilter)>,
    loaded_filter: Option<StatusFilter>,
    tombstones: HashMap<EntryId, Tombstone>,
}

impl ShelfCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new load for `filter`, superseding any load still pending.
    pub fn begin_load(&mut self, filter: StatusFilter) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        if let Some((previous, _)) = self.loading {
            tracing::debug!(superseded = previous.0, ticket = ticket.0, "load superseded");
        }
        self.loading = Some((ticket, filter));
        ticket
    }

    /// Applies a load response, replacing the whole collection.
    ///
    /// Returns `false` without touching the cache when `ticket` is not the
    /// most recently issued load.
    pub fn apply_load(&mut self, ticket: LoadTicket, entries: Vec<ShelfEntry>) -> bool {
        let Some((current, filter)) = self.loading else {
            tracing::debug!(ticket = ticket.0, "discarding load response with no pending load");
            return false;
        };
        if current != ticket {
            tracing::debug!(ticket = ticket.0, current = current.0, "discarding stale load response");
            return false;
        }

        self.tombstones.retain(|_, stone| stone.filters(ticket));

        let mut seen = HashSet::with_capacity(entries.len());
        let received = entries.len();
        self.entries = entries
            .into_iter()
            .filter(|entry| !self.tombstones.contains_key(&entry.id))
            .filter(|entry| seen.insert(entry.id))
            .collect();

        self.loading = None;
        self.loaded_filter = Some(filter);

        tracing::debug!(
            ticket = ticket.0,
            received,
            kept = self.entries.len(),
            filter = ?filter,
            "shelf load applied"
        );
        true
    }

    /// Marks the pending load as finished without new data (the load failed).
    /// Stale tickets are ignored.
    pub fn abandon_load(&mut self, ticket: LoadTicket) {
        if matches!(self.loading, Some((current, _)) if current == ticket) {
            self.loading = None;
        }
    }

    /// Removes the entry with `id`. Absent ids are a no-op, so retries are safe.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Optimistically removes `id` and tombstones it until the delete settles.
    pub fn remove_pending(&mut self, id: EntryId) -> bool {
        self.tombstones.entry(id).or_default().outstanding += 1;
        self.remove(id)
    }

    /// The remote store confirmed a delete of `id`.
    pub fn confirm_removal(&mut self, id: EntryId) {
        let at = LoadTicket(self.issued);
        if let Some(stone) = self.tombstones.get_mut(&id) {
            stone.outstanding = stone.outstanding.saturating_sub(1);
            stone.confirmed_at = Some(at);
        }
    }

    /// A delete of `id` failed. The local removal is not rolled back. Once no
    /// delete of `id` is outstanding or confirmed, the tombstone is dropped so
    /// the next reload shows the store's truth.
    pub fn abandon_removal(&mut self, id: EntryId) {
        let Some(stone) = self.tombstones.get_mut(&id) else {
            return;
        };
        stone.outstanding = stone.outstanding.saturating_sub(1);
        if stone.outstanding == 0 && stone.confirmed_at.is_none() {
            self.tombstones.remove(&id);
        }
    }

    /// Forgets every entry and any pending load. Tickets keep counting, so a
    /// response to a load issued before the reset is discarded.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.loading = None;
        self.loaded_filter = None;
    }

    /// Inserts or replaces `entry` in place without a reload.
    ///
    /// New entries go to the front, matching the store's newest-first order.
    pub fn upsert_from_remote(&mut self, entry: ShelfEntry) {
        if self.tombstones.contains_key(&entry.id) {
            return;
        }
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.entries.insert(0, entry);
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[ShelfEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&ShelfEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// `true` while a load is pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Filter of the last applied load, `None` before the first load lands.
    #[must_use]
    pub const fn loaded_filter(&self) -> Option<StatusFilter> {
        self.loaded_filter
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
