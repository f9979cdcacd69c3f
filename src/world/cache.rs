//! LRU cache for block queries
//!
//! Wraps a [`BlockSource`] and remembers recently returned identifiers so a
//! survey pass does not ask the world server for the same block twice.
//! Caching is off until enabled and must be switched off again before the
//! world is modified, otherwise stale blocks would be served.

use std::collections::{BTreeMap, HashMap};

use super::blocks::BlockSource;
use crate::core::types::{IVec3, Result};

/// Caching wrapper around a block source
pub struct CachedBlocks<S> {
    inner: S,
    enabled: bool,
    /// Cached identifier and the tick it was last used
    entries: HashMap<IVec3, (String, u64)>,
    /// Use order: oldest tick first
    access_order: BTreeMap<u64, IVec3>,
    tick: u64,
    /// Maximum number of blocks to keep
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl<S: BlockSource> CachedBlocks<S> {
    /// Wrap a source with the given capacity; caching starts disabled
    ///
    /// # Arguments
    /// * `inner` - Source to forward misses to
    /// * `max_entries` - Maximum number of cached blocks
    pub fn new(inner: S, max_entries: usize) -> Self {
        Self {
            inner,
            enabled: false,
            entries: HashMap::new(),
            access_order: BTreeMap::new(),
            tick: 0,
            max_entries: max_entries.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Turn caching on or off. Turning it off drops every cached block.
    pub fn set_caching(&mut self, enabled: bool) {
        if !enabled {
            self.clear();
        }
        self.enabled = enabled;
    }

    pub fn is_caching(&self) -> bool {
        self.enabled
    }

    /// Drop all cached blocks
    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
    }

    /// Number of cached blocks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Evict the least recently used block
    fn evict_oldest(&mut self) {
        if let Some((_, pos)) = self.access_order.pop_first() {
            self.entries.remove(&pos);
        }
    }
}

impl<S: BlockSource> BlockSource for CachedBlocks<S> {
    fn block_at(&mut self, pos: IVec3) -> Result<String> {
        if !self.enabled {
            return self.inner.block_at(pos);
        }

        let tick = self.next_tick();
        if let Some((block, last)) = self.entries.get_mut(&pos) {
            self.access_order.remove(last);
            *last = tick;
            self.access_order.insert(tick, pos);
            self.hits += 1;
            return Ok(block.clone());
        }

        self.misses += 1;
        let block = self.inner.block_at(pos)?;
        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }
        self.entries.insert(pos, (block.clone(), tick));
        self.access_order.insert(tick, pos);
        Ok(block)
    }
}
