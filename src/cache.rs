//! Latest-reading cache keyed by sensor label.
//!
//! The map is split into shards, each behind its own `RwLock`, so writers for
//! different labels rarely contend and eviction never locks the whole cache.

use crate::reading::SensorReading;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::{BuildHasher, RandomState};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Number of independently locked shards.
const SHARD_COUNT: usize = 16;

type Shard = RwLock<HashMap<String, SensorReading>>;

/// Thread-safe store of the most recent reading per label.
///
/// Create one per application and share it by reference or `Arc`.
///
/// # Example
/// ```
/// use ble_advertiser_listener::{ReadingCache, SensorReading};
///
/// let cache = ReadingCache::new();
/// cache.put(SensorReading::new("Temperature", 21.5, "°C", 1).unwrap());
/// assert_eq!(cache.get("Temperature").unwrap().value(), 21.5);
/// assert!(cache.get("Humidity").is_none());
/// ```
#[derive(Debug)]
pub struct ReadingCache {
    shards: Box<[Shard]>,
    hasher: RandomState,
}

impl Default for ReadingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingCache {
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Shard::default()).collect(),
            hasher: RandomState::new(),
        }
    }

    fn shard(&self, label: &str) -> &Shard {
        let index = self.hasher.hash_one(label) as usize % self.shards.len();
        &self.shards[index]
    }

    /// Insert or replace the entry for the reading's label.
    ///
    /// Concurrent puts for the same label are ordered by lock acquisition,
    /// not by capture time.
    pub fn put(&self, reading: SensorReading) {
        self.shard(reading.label())
            .write()
            .insert(reading.label().to_owned(), reading);
    }

    /// Latest reading for `label`, if any.
    pub fn get(&self, label: &str) -> Option<SensorReading> {
        self.shard(label).read().get(label).cloned()
    }

    /// Remove every entry captured more than `max_age` before now.
    ///
    /// Returns the number of removed entries.
    pub fn evict(&self, max_age: Duration) -> usize {
        self.evict_at(max_age, SystemTime::now())
    }

    /// Remove every entry captured more than `max_age` before `now`.
    ///
    /// Entries captured after `now` are kept.
    pub fn evict_at(&self, max_age: Duration, now: SystemTime) -> usize {
        let mut evicted = 0;
        for shard in self.shards.iter() {
            let mut entries = shard.write();
            let before = entries.len();
            entries.retain(|_, reading| match now.duration_since(reading.captured_at()) {
                Ok(age) => age <= max_age,
                Err(_) => true,
            });
            evicted += before - entries.len();
        }

        if evicted > 0 {
            debug!(evicted, ?max_age, "evicted stale readings");
        }
        evicted
    }

    /// All cached readings in no particular order.
    pub fn snapshot(&self) -> Vec<SensorReading> {
        self.shards
            .iter()
            .flat_map(|shard| shard.read().values().cloned().collect::<Vec<_>>())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }
}
