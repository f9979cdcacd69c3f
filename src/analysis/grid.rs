//! Region grid: one record per chunk of the build area

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::IVec2;

/// Semantic tag attached to a chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Designation {
    Snowy,
    Forest,
    Water,
    WaterAdjacent,
    Harsh,
    Flat,
    Structure,
}

impl Designation {
    pub const ALL: [Designation; 7] = [
        Designation::Snowy,
        Designation::Forest,
        Designation::Water,
        Designation::WaterAdjacent,
        Designation::Harsh,
        Designation::Flat,
        Designation::Structure,
    ];

    /// Tag name as used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Snowy => "snowy",
            Designation::Forest => "forest",
            Designation::Water => "water",
            Designation::WaterAdjacent => "water-adjacent",
            Designation::Harsh => "harsh",
            Designation::Flat => "flat",
            Designation::Structure => "structure",
        }
    }
}

impl fmt::Display for Designation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered set of designations without duplicates
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Designations(Vec<Designation>);

impl Designations {
    /// Add a tag; returns false if it was already present
    pub fn insert(&mut self, tag: Designation) -> bool {
        if self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Remove a tag; returns false if it was absent
    pub fn remove(&mut self, tag: Designation) -> bool {
        match self.0.iter().position(|&t| t == tag) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, tag: Designation) -> bool {
        self.0.contains(&tag)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Designation> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Designation] {
        &self.0
    }
}

/// Analysis state of a single chunk
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub designations: Designations,
    /// Dominant biome at the chunk's reference column, empty if unknown
    pub primary_biome: String,
    /// All biomes seen near the reference column
    pub biomes: BTreeSet<String>,
}

/// 2D grid of chunk records covering the build area.
///
/// Every chunk coordinate in `[0, span.x) x [0, span.y)` has exactly one
/// record; records are mutated in place and never replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionGrid {
    span: IVec2,
    /// x-major: `cx * span.y + cz`
    records: Vec<ChunkRecord>,
}

impl RegionGrid {
    /// Create a grid of empty records
    pub fn new(span: IVec2) -> Self {
        let span = span.max(IVec2::ZERO);
        let len = (span.x * span.y) as usize;
        Self { span, records: vec![ChunkRecord::default(); len] }
    }

    /// Chunks along X (`x`) and Z (`y`)
    pub fn span(&self) -> IVec2 {
        self.span
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if a chunk coordinate is inside the grid
    pub fn contains(&self, cx: i32, cz: i32) -> bool {
        cx >= 0 && cz >= 0 && cx < self.span.x && cz < self.span.y
    }

    fn index(&self, cx: i32, cz: i32) -> Option<usize> {
        self.contains(cx, cz).then(|| (cx * self.span.y + cz) as usize)
    }

    pub fn get(&self, cx: i32, cz: i32) -> Option<&ChunkRecord> {
        self.index(cx, cz).map(|i| &self.records[i])
    }

    pub fn get_mut(&mut self, cx: i32, cz: i32) -> Option<&mut ChunkRecord> {
        self.index(cx, cz).map(move |i| &mut self.records[i])
    }

    /// Chunk coordinates in scan order: x-major, then z
    pub fn coords(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let span = self.span;
        (0..span.x).flat_map(move |cx| (0..span.y).map(move |cz| (cx, cz)))
    }

    /// Records with their coordinates, in scan order
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &ChunkRecord)> {
        self.coords().zip(self.records.iter())
    }

    /// Chunks carrying a given designation, in scan order
    pub fn chunks_with(&self, tag: Designation) -> Vec<(i32, i32)> {
        self.iter()
            .filter(|(_, r)| r.designations.contains(tag))
            .map(|(c, _)| c)
            .collect()
    }
}
