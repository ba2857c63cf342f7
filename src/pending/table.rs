//! Pending request table
//!
//! HashMap keyed by request identifier. Not synchronized on its own; the
//! owning multiplexer keeps it behind its state lock.

use std::collections::HashMap;

use super::PendingRequest;
use crate::mux::RequestId;

/// Outstanding requests by identifier
#[derive(Debug, Default)]
pub struct PendingTable {
    entries: HashMap<RequestId, PendingRequest>,
}

impl PendingTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry
    ///
    /// The identifier generator guarantees uniqueness; it is only checked in
    /// debug builds.
    pub fn insert(&mut self, request: PendingRequest) {
        let id = request.id();
        let previous = self.entries.insert(id, request);
        debug_assert!(previous.is_none(), "duplicate pending request id {}", id);
    }

    /// Remove and return the entry for `id`, if any
    pub fn take_by_id(&mut self, id: RequestId) -> Option<PendingRequest> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers currently outstanding, in ascending order
    pub fn ids(&self) -> Vec<RequestId> {
        let mut ids: Vec<RequestId> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Remove every entry
    pub fn drain(&mut self) -> Vec<PendingRequest> {
        self.entries.drain().map(|(_, request)| request).collect()
    }
}
