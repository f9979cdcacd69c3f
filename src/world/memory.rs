//! In-memory world used for offline surveys and tests

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::blocks::{BlockCategories, BlockSource};
use super::build_area::BuildArea;
use super::slice::{Heightmap, HeightmapKind, SliceRect, WorldSlice};
use crate::core::types::{IVec2, IVec3, Result};
use crate::math::BlockBox;

/// Block returned for coordinates that were never set
pub const AIR: &str = "minecraft:air";

/// Cuboid of a single block type, applied in file order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub min: IVec3,
    pub max: IVec3,
    pub block: String,
}

/// Rectangle of columns sharing a biome; later regions override earlier ones
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeRegion {
    pub min: IVec2,
    pub max: IVec2,
    pub biome: String,
}

impl BiomeRegion {
    fn contains(&self, x: i32, z: i32) -> bool {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        x >= lo.x && x <= hi.x && z >= lo.y && z <= hi.y
    }
}

/// JSON description of a world: build area, biomes and block fills
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldDescription {
    pub build_area: BuildArea,
    #[serde(default)]
    pub default_biome: String,
    #[serde(default)]
    pub biomes: Vec<BiomeRegion>,
    #[serde(default)]
    pub fills: Vec<Fill>,
}

impl WorldDescription {
    /// Load a description from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save to a JSON file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Sparse block storage standing in for a live world server.
///
/// Counts block queries so callers can verify caching behaviour.
#[derive(Clone, Debug)]
pub struct MemoryWorld {
    area: BuildArea,
    blocks: HashMap<IVec3, String>,
    default_biome: String,
    biomes: Vec<BiomeRegion>,
    queries: u64,
}

impl MemoryWorld {
    /// Create an empty (all air) world with a uniform biome
    pub fn new(area: BuildArea, default_biome: impl Into<String>) -> Self {
        Self {
            area,
            blocks: HashMap::new(),
            default_biome: default_biome.into(),
            biomes: Vec::new(),
            queries: 0,
        }
    }

    /// Build a world from a description, applying fills in order
    pub fn from_description(desc: &WorldDescription) -> Self {
        let mut world = Self::new(desc.build_area, desc.default_biome.clone());
        for region in &desc.biomes {
            world.add_biome_region(region.clone());
        }
        for fill in &desc.fills {
            world.fill(BlockBox::new(fill.min, fill.max), &fill.block);
        }
        log::debug!(
            "Built memory world: {} fills, {} biome regions, {} stored blocks",
            desc.fills.len(),
            desc.biomes.len(),
            world.blocks.len()
        );
        world
    }

    /// Load a world description file and build the world
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::from_description(&WorldDescription::load(path)?))
    }

    pub fn area(&self) -> BuildArea {
        self.area
    }

    /// Number of `block_at` calls served so far
    pub fn query_count(&self) -> u64 {
        self.queries
    }

    /// Set a single block. Setting air removes the stored entry.
    pub fn set_block(&mut self, pos: IVec3, block: &str) {
        if block == AIR || block == "air" {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, block.to_string());
        }
    }

    /// Fill a box with one block type
    pub fn fill(&mut self, bounds: BlockBox, block: &str) {
        for pos in bounds.iter() {
            self.set_block(pos, block);
        }
    }

    /// Assign a biome to a rectangle of columns
    pub fn add_biome_region(&mut self, region: BiomeRegion) {
        self.biomes.push(region);
    }

    /// Biome of a global column
    pub fn biome_at(&self, x: i32, z: i32) -> &str {
        self.biomes
            .iter()
            .rev()
            .find(|r| r.contains(x, z))
            .map(|r| r.biome.as_str())
            .unwrap_or(&self.default_biome)
    }

    fn stored(&self, pos: IVec3) -> &str {
        self.blocks.get(&pos).map(String::as_str).unwrap_or(AIR)
    }

    /// Take a snapshot of heightmaps and biomes over the build area.
    ///
    /// Heightmaps follow server semantics: one above the top matching block,
    /// or the area floor for columns with no match.
    pub fn capture_slice(&self, categories: &BlockCategories) -> Result<WorldSlice> {
        let min = self.area.min();
        let max = self.area.max();
        let rect = SliceRect {
            x: min.x,
            z: min.z,
            width: self.area.width(),
            depth: self.area.depth(),
        };

        let mut maps: HashMap<HeightmapKind, Heightmap> = HeightmapKind::ALL
            .iter()
            .map(|&kind| (kind, Heightmap::filled(rect.width, rect.depth, min.y)))
            .collect();
        let mut biomes = Vec::with_capacity(rect.area());

        for lx in 0..rect.width {
            for lz in 0..rect.depth {
                let (x, z) = (min.x + lx, min.z + lz);
                biomes.push(self.biome_at(x, z).to_string());

                for kind in HeightmapKind::ALL {
                    let top = (min.y..=max.y).rev().find(|&y| {
                        let block = self.stored(IVec3::new(x, y, z));
                        matches_heightmap(kind, block, categories)
                    });
                    if let (Some(y), Some(map)) = (top, maps.get_mut(&kind)) {
                        map.set(lx, lz, y + 1);
                    }
                }
            }
        }

        WorldSlice::new(rect, maps, biomes)
    }
}

fn matches_heightmap(kind: HeightmapKind, block: &str, categories: &BlockCategories) -> bool {
    if categories.is_air(block) {
        return false;
    }
    match kind {
        HeightmapKind::WorldSurface | HeightmapKind::MotionBlocking => true,
        HeightmapKind::MotionBlockingNoLeaves => !categories.is_leaves(block),
        HeightmapKind::OceanFloor => !categories.is_fluid(block),
    }
}

impl BlockSource for MemoryWorld {
    fn block_at(&mut self, pos: IVec3) -> Result<String> {
        self.queries += 1;
        Ok(self.stored(pos).to_string())
    }
}
