//! Water-body merger: names fluid regions and stitches them across chunks
//!
//! Each chunk floods fluid from its sample points over a box one block wider
//! than the chunk, so bodies straddling a border touch blocks already claimed
//! by the neighbouring chunk. Claims are write-once; touching another body's
//! claim records a connection instead.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::context::AnalysisContext;
use super::flood::{flood_category, Connectivity};
use super::grid::{Designation, RegionGrid};
use crate::core::types::{IVec3, Result};
use crate::world::{block_name, BlockCategories, BlockCategory, BlockSource};

/// Region size below which an unnamed body is a pond rather than a lake
pub const DEFAULT_POND_THRESHOLD: usize = 256;

/// Kind of water body, derived from biome and size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterBodyKind {
    Ocean,
    River,
    Swamp,
    Pond,
    Lake,
}

impl WaterBodyKind {
    /// Pick a kind from the owning chunk's primary biome and the region size
    pub fn classify(primary_biome: &str, region_len: usize, pond_threshold: usize) -> Self {
        let biome = block_name(primary_biome);
        if biome.ends_with("ocean") {
            WaterBodyKind::Ocean
        } else if biome == "river" {
            WaterBodyKind::River
        } else if biome.starts_with("swamp") {
            WaterBodyKind::Swamp
        } else if region_len < pond_threshold {
            WaterBodyKind::Pond
        } else {
            WaterBodyKind::Lake
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterBodyKind::Ocean => "ocean",
            WaterBodyKind::River => "river",
            WaterBodyKind::Swamp => "swamp",
            WaterBodyKind::Pond => "pond",
            WaterBodyKind::Lake => "lake",
        }
    }

    /// Body identifier for a detection in chunk `(cx, cz)`
    pub fn body_id(&self, cx: i32, cz: i32) -> String {
        format!("{}-{}-{}", self.as_str(), cx, cz)
    }
}

/// Metadata of one named water body
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterBody {
    /// Other bodies this one touches
    pub connections: BTreeSet<String>,
    /// Biomes of the chunks whose blocks this body claimed
    pub biomes_touching: BTreeSet<String>,
    /// Primary biomes of the diagonally neighbouring chunks
    pub biome_adjacent: BTreeSet<String>,
    /// Number of blocks claimed
    pub cells: usize,
}

/// All water found during a survey
#[derive(Clone, Debug, Default)]
pub struct WaterNetwork {
    /// Owner of each claimed fluid block
    waterways: HashMap<IVec3, String>,
    bodies: BTreeMap<String, WaterBody>,
    waterfalls: Vec<IVec3>,
}

/// What a single detection changed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub claimed: usize,
    pub new_connections: usize,
}

impl WaterNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body owning a block, if claimed
    pub fn owner(&self, pos: IVec3) -> Option<&str> {
        self.waterways.get(&pos).map(String::as_str)
    }

    pub fn is_claimed(&self, pos: IVec3) -> bool {
        self.waterways.contains_key(&pos)
    }

    pub fn body(&self, id: &str) -> Option<&WaterBody> {
        self.bodies.get(id)
    }

    /// Bodies sorted by identifier
    pub fn bodies(&self) -> &BTreeMap<String, WaterBody> {
        &self.bodies
    }

    /// Number of claimed blocks
    pub fn claimed_len(&self) -> usize {
        self.waterways.len()
    }

    pub fn waterfalls(&self) -> &[IVec3] {
        &self.waterfalls
    }

    /// Record a detected region under `id`.
    ///
    /// Unclaimed blocks are claimed for `id` and add the chunk's biomes to
    /// `biomes_touching`; blocks owned by another body add that body to
    /// `connections`. Ownership never changes once set.
    pub fn merge(
        &mut self,
        id: &str,
        region: &[IVec3],
        chunk_biomes: &BTreeSet<String>,
        adjacent: BTreeSet<String>,
    ) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let body = self.bodies.entry(id.to_string()).or_default();
        body.biome_adjacent.extend(adjacent);

        for &pos in region {
            match self.waterways.get(&pos) {
                Some(owner) if owner != id => {
                    if body.connections.insert(owner.clone()) {
                        outcome.new_connections += 1;
                    }
                }
                Some(_) => {}
                None => {
                    self.waterways.insert(pos, id.to_string());
                    body.biomes_touching.extend(chunk_biomes.iter().cloned());
                    body.cells += 1;
                    outcome.claimed += 1;
                }
            }
        }
        outcome
    }
}

/// Primary biomes of the four diagonal neighbours of a chunk.
///
/// Neighbours outside the grid and chunks without biome data are skipped.
pub fn diagonal_neighbour_biomes(grid: &RegionGrid, cx: i32, cz: i32) -> BTreeSet<String> {
    [(1, 1), (-1, 1), (1, -1), (-1, -1)]
        .into_iter()
        .filter_map(|(dx, dz)| grid.get(cx + dx, cz + dz))
        .filter(|r| !r.primary_biome.is_empty())
        .map(|r| r.primary_biome.clone())
        .collect()
}

/// Flood a fluid sample point of chunk `(cx, cz)` and merge it into the network.
///
/// Returns the body identifier, or `None` if the seed yields no new region
/// (already explored from another sample point of this chunk).
pub fn detect_water_body<B: BlockSource + ?Sized>(
    ctx: &mut AnalysisContext,
    blocks: &mut B,
    categories: &BlockCategories,
    cx: i32,
    cz: i32,
    seed: IVec3,
    observed: &mut HashSet<IVec3>,
    pond_threshold: usize,
) -> Result<Option<String>> {
    let bounds = ctx.area.chunk_volume(cx, cz).widened_xz(1);
    let flood = flood_category(
        blocks,
        categories,
        BlockCategory::Fluid,
        seed,
        &bounds,
        observed,
        Connectivity::Faces,
    )?;
    if flood.is_empty() {
        return Ok(None);
    }

    let adjacent = diagonal_neighbour_biomes(&ctx.grid, cx, cz);
    let Some(record) = ctx.grid.get_mut(cx, cz) else {
        return Ok(None);
    };
    // Confirmed water replaces the biome-derived water-adjacent tag
    record.designations.remove(Designation::WaterAdjacent);
    record.designations.insert(Designation::Water);

    let kind = WaterBodyKind::classify(&record.primary_biome, flood.len(), pond_threshold);
    let id = kind.body_id(cx, cz);
    let outcome = ctx.water.merge(&id, &flood.region, &record.biomes, adjacent);
    log::debug!(
        "Water body {} from {:?}: {} blocks, {} claimed, {} new connections",
        id,
        seed,
        flood.len(),
        outcome.claimed,
        outcome.new_connections
    );
    Ok(Some(id))
}
