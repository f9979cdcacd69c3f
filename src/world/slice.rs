//! World slice: a snapshot of heightmaps and biomes over a rectangle

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec2, Result};
use crate::core::Error;

/// Heightmap flavours kept by the world server
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeightmapKind {
    /// Top non-air blocks
    WorldSurface,
    /// Top blocks with a hitbox or fluid
    MotionBlocking,
    /// Like `MotionBlocking` but ignoring leaves
    MotionBlockingNoLeaves,
    /// Top solid blocks
    OceanFloor,
}

impl HeightmapKind {
    pub const ALL: [HeightmapKind; 4] = [
        HeightmapKind::WorldSurface,
        HeightmapKind::MotionBlocking,
        HeightmapKind::MotionBlockingNoLeaves,
        HeightmapKind::OceanFloor,
    ];
}

/// Horizontal rectangle covered by a slice: global origin plus size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRect {
    pub x: i32,
    pub z: i32,
    pub width: i32,
    pub depth: i32,
}

impl SliceRect {
    /// Check whether a global column lies inside the rectangle
    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.x && x < self.x + self.width && z >= self.z && z < self.z + self.depth
    }

    /// Number of columns
    pub fn area(&self) -> usize {
        (self.width.max(0) * self.depth.max(0)) as usize
    }
}

/// Per-column height values, indexed by slice-local `(x, z)`.
///
/// As on the server, a value is the height of the block *above* the top
/// matching block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightmap")]
pub struct Heightmap {
    width: i32,
    depth: i32,
    heights: Vec<i32>,
}

/// Heightmap as read from a file, before the length check
#[derive(Deserialize)]
struct RawHeightmap {
    width: i32,
    depth: i32,
    heights: Vec<i32>,
}

impl TryFrom<RawHeightmap> for Heightmap {
    type Error = Error;

    fn try_from(raw: RawHeightmap) -> Result<Self> {
        Self::from_vec(raw.width, raw.depth, raw.heights)
    }
}

impl Heightmap {
    /// Create a heightmap filled with a single value
    pub fn filled(width: i32, depth: i32, value: i32) -> Self {
        let len = (width.max(0) * depth.max(0)) as usize;
        Self { width, depth, heights: vec![value; len] }
    }

    /// Create from raw values laid out x-major (`x * depth + z`)
    pub fn from_vec(width: i32, depth: i32, heights: Vec<i32>) -> Result<Self> {
        if heights.len() != (width.max(0) * depth.max(0)) as usize {
            return Err(Error::Snapshot(format!(
                "heightmap of {}x{} needs {} values, got {}",
                width, depth, width * depth, heights.len()
            )));
        }
        Ok(Self { width, depth, heights })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x >= self.width || z >= self.depth {
            return None;
        }
        Some((x * self.depth + z) as usize)
    }

    /// Height at a slice-local column
    pub fn get(&self, x: i32, z: i32) -> Option<i32> {
        self.index(x, z).map(|i| self.heights[i])
    }

    /// Overwrite the height at a slice-local column; out-of-range is ignored
    pub fn set(&mut self, x: i32, z: i32, value: i32) {
        if let Some(i) = self.index(x, z) {
            self.heights[i] = value;
        }
    }
}

/// Snapshot of a world rectangle: heightmaps and the biome of every column.
///
/// A slice does not see changes made to the world after it was taken.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawWorldSlice")]
pub struct WorldSlice {
    rect: SliceRect,
    heightmaps: HashMap<HeightmapKind, Heightmap>,
    /// Biome id per column, x-major like [`Heightmap`]
    biomes: Vec<String>,
    /// Radius in blocks searched by the `*_near` biome queries
    biome_radius: i32,
}

fn default_biome_radius() -> i32 {
    4
}

/// Slice as read from a file; converted through [`WorldSlice::new`]
#[derive(Deserialize)]
struct RawWorldSlice {
    rect: SliceRect,
    #[serde(default)]
    heightmaps: HashMap<HeightmapKind, Heightmap>,
    biomes: Vec<String>,
    #[serde(default = "default_biome_radius")]
    biome_radius: i32,
}

impl TryFrom<RawWorldSlice> for WorldSlice {
    type Error = Error;

    fn try_from(raw: RawWorldSlice) -> Result<Self> {
        Ok(Self::new(raw.rect, raw.heightmaps, raw.biomes)?.with_biome_radius(raw.biome_radius))
    }
}

impl WorldSlice {
    /// Assemble a slice, validating that every layer matches the rectangle
    pub fn new(
        rect: SliceRect,
        heightmaps: HashMap<HeightmapKind, Heightmap>,
        biomes: Vec<String>,
    ) -> Result<Self> {
        if biomes.len() != rect.area() {
            return Err(Error::Snapshot(format!(
                "biome layer has {} columns, rect has {}",
                biomes.len(),
                rect.area()
            )));
        }
        for (kind, map) in &heightmaps {
            if map.width() != rect.width || map.depth() != rect.depth {
                return Err(Error::Snapshot(format!(
                    "heightmap {:?} is {}x{}, rect is {}x{}",
                    kind, map.width(), map.depth(), rect.width, rect.depth
                )));
            }
        }
        Ok(Self { rect, heightmaps, biomes, biome_radius: default_biome_radius() })
    }

    /// Change the search radius of the `*_near` biome queries
    pub fn with_biome_radius(mut self, radius: i32) -> Self {
        self.biome_radius = radius.max(0);
        self
    }

    pub fn rect(&self) -> SliceRect {
        self.rect
    }

    /// Chunk grid covering the slice (partial chunks included)
    pub fn chunk_span(&self) -> IVec2 {
        let size = crate::core::types::CHUNK_SIZE;
        IVec2::new(
            (self.rect.width + size - 1) / size,
            (self.rect.depth + size - 1) / size,
        )
    }

    /// Heightmap of the requested kind
    pub fn heightmap(&self, kind: HeightmapKind) -> Result<&Heightmap> {
        self.heightmaps
            .get(&kind)
            .ok_or_else(|| Error::Snapshot(format!("slice has no {:?} heightmap", kind)))
    }

    /// Biome of a single global column, if inside the slice
    pub fn biome_at(&self, x: i32, z: i32) -> Option<&str> {
        if !self.rect.contains(x, z) {
            return None;
        }
        let i = ((x - self.rect.x) * self.rect.depth + (z - self.rect.z)) as usize;
        Some(self.biomes[i].as_str())
    }

    /// Count biome ids in the square around a global column, clipped to the slice
    fn biome_counts(&self, x: i32, z: i32) -> BTreeMap<&str, usize> {
        let r = self.biome_radius;
        let mut counts = BTreeMap::new();
        for bx in x - r..=x + r {
            for bz in z - r..=z + r {
                if let Some(biome) = self.biome_at(bx, bz) {
                    if !biome.is_empty() {
                        *counts.entry(biome).or_insert(0) += 1;
                    }
                }
            }
        }
        counts
    }

    /// Most common biome near a global position, empty if there is no data.
    ///
    /// Ties go to the lexicographically smallest id so the result is stable.
    pub fn primary_biome_near(&self, x: i32, _y: i32, z: i32) -> String {
        let mut best: Option<(&str, usize)> = None;
        for (biome, count) in self.biome_counts(x, z) {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((biome, count));
            }
        }
        best.map(|(b, _)| b.to_string()).unwrap_or_default()
    }

    /// Every biome near a global position
    pub fn biomes_near(&self, x: i32, _y: i32, z: i32) -> BTreeSet<String> {
        self.biome_counts(x, z).into_keys().map(String::from).collect()
    }
}
