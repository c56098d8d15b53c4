//! Bookmarked destinations from the explore feed

use crate::domain::booking::SavedDestination;
use crate::domain::types::{Destination, DestinationId};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Set of saved destinations keyed by destination id
#[derive(Debug, Default)]
pub struct SavedDestinations {
    entries: FxHashMap<DestinationId, SavedDestination>,
}

impl SavedDestinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save if absent, remove if present. Returns whether it is now saved.
    pub fn toggle(&mut self, destination: &Destination, saved_at: u64) -> bool {
        if self.entries.remove(&destination.id).is_some() {
            debug!(destination_id = %destination.id, name = %destination.name, "destination_unsaved");
            return false;
        }

        debug!(destination_id = %destination.id, name = %destination.name, "destination_saved");
        self.entries
            .insert(destination.id, SavedDestination { destination: destination.clone(), saved_at });
        true
    }

    pub fn is_saved(&self, id: DestinationId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Saved entries, oldest first
    pub fn list(&self) -> Vec<&SavedDestination> {
        let mut saved: Vec<&SavedDestination> = self.entries.values().collect();
        saved.sort_by_key(|s| (s.saved_at, s.destination.id));
        saved
    }
}
