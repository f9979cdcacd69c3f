//! Artificial structure detection and the avoidance set

use std::collections::{HashMap, HashSet};

use super::context::AnalysisContext;
use super::flood::{flood_category, Connectivity};
use super::grid::Designation;
use crate::core::types::{IVec3, Result};
use crate::world::{BlockCategories, BlockCategory, BlockSource};

/// Reason recorded for blocks belonging to a detected structure
pub const STRUCTURE_REASON: &str = "Artificial structure detected";

/// Coordinates later construction must leave alone, with the reason.
///
/// Entries are write-once: the first reason recorded for a block is kept.
#[derive(Clone, Debug, Default)]
pub struct AvoidanceSet {
    entries: HashMap<IVec3, String>,
}

impl AvoidanceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a block; returns false if it was already marked
    pub fn mark(&mut self, pos: IVec3, reason: &str) -> bool {
        if self.entries.contains_key(&pos) {
            return false;
        }
        self.entries.insert(pos, reason.to_string());
        true
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        self.entries.contains_key(&pos)
    }

    pub fn reason(&self, pos: IVec3) -> Option<&str> {
        self.entries.get(&pos).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IVec3, &str)> {
        self.entries.iter().map(|(p, r)| (*p, r.as_str()))
    }
}

/// Flood an artificial sample point of chunk `(cx, cz)` into the avoidance set.
///
/// Tags the chunk `structure` and marks every connected artificial block
/// inside the chunk volume, diagonal contact included. Returns the number of
/// newly marked blocks.
pub fn detect_structure<B: BlockSource + ?Sized>(
    ctx: &mut AnalysisContext,
    blocks: &mut B,
    categories: &BlockCategories,
    cx: i32,
    cz: i32,
    seed: IVec3,
    observed: &mut HashSet<IVec3>,
) -> Result<usize> {
    if let Some(record) = ctx.grid.get_mut(cx, cz) {
        record.designations.insert(Designation::Structure);
    }

    let bounds = ctx.area.chunk_volume(cx, cz);
    let flood = flood_category(
        blocks,
        categories,
        BlockCategory::Artificial,
        seed,
        &bounds,
        observed,
        Connectivity::Full,
    )?;

    let mut marked = 0;
    for &pos in &flood.region {
        if ctx.avoid.mark(pos, STRUCTURE_REASON) {
            marked += 1;
        }
    }
    log::debug!(
        "Structure in chunk ({}, {}) from {:?}: {} blocks, {} newly avoided",
        cx, cz, seed, flood.len(), marked
    );
    Ok(marked)
}
