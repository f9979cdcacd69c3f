//! Heightmap refiner: finds the walkable ground under tree cover

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Result};
use crate::core::Error;
use crate::world::{BlockCategories, BlockSource, HeightmapKind, SliceRect, WorldSlice};

/// Height of the top walkable block per column, indexed slice-local `(x, z)`.
///
/// `None` marks a column with nothing but air and foliage above the floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSurfaceMap")]
pub struct SurfaceMap {
    rect: SliceRect,
    heights: Vec<Option<i32>>,
}

#[derive(Deserialize)]
struct RawSurfaceMap {
    rect: SliceRect,
    heights: Vec<Option<i32>>,
}

impl TryFrom<RawSurfaceMap> for SurfaceMap {
    type Error = Error;

    fn try_from(raw: RawSurfaceMap) -> Result<Self> {
        if raw.heights.len() != raw.rect.area() {
            return Err(Error::Snapshot(format!(
                "surface map of {}x{} needs {} columns, got {}",
                raw.rect.width,
                raw.rect.depth,
                raw.rect.area(),
                raw.heights.len()
            )));
        }
        Ok(Self { rect: raw.rect, heights: raw.heights })
    }
}

impl SurfaceMap {
    pub fn rect(&self) -> SliceRect {
        self.rect
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x >= self.rect.width || z >= self.rect.depth {
            return None;
        }
        Some((x * self.rect.depth + z) as usize)
    }

    /// Surface height at a slice-local column
    pub fn get(&self, x: i32, z: i32) -> Option<i32> {
        self.index(x, z).and_then(|i| self.heights[i])
    }

    /// Number of columns without a surface
    pub fn void_columns(&self) -> usize {
        self.heights.iter().filter(|h| h.is_none()).count()
    }
}

/// Walk down from `start` past logs, leaves and air.
///
/// Returns the first other block's height, or `None` once below `min_y`.
pub fn refine_column<B: BlockSource + ?Sized>(
    blocks: &mut B,
    categories: &BlockCategories,
    x: i32,
    z: i32,
    start: i32,
    min_y: i32,
) -> Result<Option<i32>> {
    let mut y = start;
    while y >= min_y {
        let block = blocks.block_at(IVec3::new(x, y, z))?;
        if !categories.is_canopy_or_air(&block) {
            return Ok(Some(y));
        }
        y -= 1;
    }
    Ok(None)
}

/// Compute the treeless surface of every column in the slice.
///
/// Starts from the `MOTION_BLOCKING_NO_LEAVES` heightmap, which still counts
/// logs, and descends until a block other than log, leaves or air is found.
/// Descent stops at `min_y`, the world floor.
pub fn refine_heightmap<B: BlockSource + ?Sized>(
    slice: &WorldSlice,
    blocks: &mut B,
    categories: &BlockCategories,
    min_y: i32,
) -> Result<SurfaceMap> {
    let rect = slice.rect();
    let base = slice.heightmap(HeightmapKind::MotionBlockingNoLeaves)?;
    let mut heights = Vec::with_capacity(rect.area());

    for lx in 0..rect.width {
        for lz in 0..rect.depth {
            let start = base.get(lx, lz).unwrap_or(min_y);
            let surface = refine_column(blocks, categories, rect.x + lx, rect.z + lz, start, min_y)?;
            if surface.is_none() {
                log::warn!("No surface above y={} at column ({}, {})", min_y, rect.x + lx, rect.z + lz);
            }
            heights.push(surface);
        }
    }

    let map = SurfaceMap { rect, heights };
    log::info!(
        "Refined heightmap over {}x{} columns ({} without surface)",
        rect.width,
        rect.depth,
        map.void_columns()
    );
    Ok(map)
}
