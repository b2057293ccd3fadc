use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Storage key the presentation layer uses for the recency list.
pub const STORAGE_KEY: &str = "alloggio_recent_destinations";

pub const RECENT_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Destination {
    /// Identity is the coordinate pair, not the name.
    fn same_place(&self, other: &Destination) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

/// Most-recently-used list of destination searches, capped at
/// [`RECENT_CAPACITY`]. Recording a destination that is already present
/// moves it to the front; beyond capacity the oldest entry is evicted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentDestinations {
    entries: VecDeque<Destination>,
}

impl RecentDestinations {
    pub fn new() -> RecentDestinations {
        RecentDestinations {
            entries: VecDeque::with_capacity(RECENT_CAPACITY),
        }
    }

    pub fn record(&mut self, destination: Destination) {
        self.entries.retain(|d| !d.same_place(&destination));
        self.entries.push_front(destination);
        self.entries.truncate(RECENT_CAPACITY);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
