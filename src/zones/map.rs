//! Spatial zones and adjacency.
//!
//! Zones are coarse battlefield areas, not a grid. The map only answers
//! two questions the resolver cares about: does a zone exist, and are two
//! zones adjacent. Adjacency is symmetric.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ChallengeError;

/// Identifier for a battlefield zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl ZoneId {
    /// Create a new zone ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// The battlefield layout for one challenge.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZoneMap {
    names: FxHashMap<ZoneId, String>,
    adjacency: FxHashMap<ZoneId, Vec<ZoneId>>,
}

impl ZoneMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone.
    pub fn add_zone(&mut self, zone: ZoneId, name: impl Into<String>) {
        self.names.insert(zone, name.into());
        self.adjacency.entry(zone).or_default();
    }

    /// Connect two zones. Adjacency is symmetric; duplicates are ignored.
    ///
    /// Panics if either zone is unregistered.
    pub fn connect(&mut self, a: ZoneId, b: ZoneId) {
        assert!(self.contains(a), "{a} not registered");
        assert!(self.contains(b), "{b} not registered");

        let forward = self.adjacency.entry(a).or_default();
        if !forward.contains(&b) {
            forward.push(b);
        }
        let back = self.adjacency.entry(b).or_default();
        if !back.contains(&a) {
            back.push(a);
        }
    }

    /// Check whether a zone is registered.
    #[must_use]
    pub fn contains(&self, zone: ZoneId) -> bool {
        self.names.contains_key(&zone)
    }

    /// Zone display name, if registered.
    #[must_use]
    pub fn name(&self, zone: ZoneId) -> Option<&str> {
        self.names.get(&zone).map(String::as_str)
    }

    /// Check adjacency. A zone is not adjacent to itself.
    #[must_use]
    pub fn are_adjacent(&self, a: ZoneId, b: ZoneId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Validate a relocation from one zone to another.
    ///
    /// Both zones must be registered and adjacent.
    pub fn validate_move(&self, from: ZoneId, to: ZoneId) -> Result<(), ChallengeError> {
        if !self.contains(from) || !self.contains(to) {
            return Err(ChallengeError::ZoneNotFound);
        }
        if !self.are_adjacent(from, to) {
            return Err(ChallengeError::ZonesNotAdjacent);
        }
        Ok(())
    }

    /// Neighbors of a zone, in connection order.
    #[must_use]
    pub fn neighbors(&self, zone: ZoneId) -> &[ZoneId] {
        self.adjacency.get(&zone).map_or(&[], Vec::as_slice)
    }

    /// All registered zone IDs, sorted.
    #[must_use]
    pub fn zone_ids(&self) -> Vec<ZoneId> {
        let mut ids: Vec<ZoneId> = self.names.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Number of registered zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// A two-zone map connected by a single edge. Test convenience.
    #[must_use]
    pub fn pair() -> Self {
        let mut map = Self::new();
        map.add_zone(ZoneId::new(0), "near");
        map.add_zone(ZoneId::new(1), "far");
        map.connect(ZoneId::new(0), ZoneId::new(1));
        map
    }
}
