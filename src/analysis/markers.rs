//! Debug markers showing chunk designations in the world
//!
//! Only computes placements; writing them to the world is up to the caller.

use serde::Serialize;

use super::grid::{Designation, RegionGrid};
use crate::core::types::IVec3;
use crate::math::BlockBox;
use crate::world::BuildArea;

/// Marker block for chunks without any designation
pub const UNTAGGED_MARKER: &str = "minecraft:redstone_block";

/// Block used to visualise a designation
pub fn marker_block(tag: Designation) -> &'static str {
    match tag {
        Designation::Snowy => "minecraft:snow_block",
        Designation::Forest => "minecraft:oak_log",
        Designation::Water => "minecraft:lapis_block",
        Designation::WaterAdjacent => "minecraft:lapis_ore",
        Designation::Harsh => "minecraft:stone",
        Designation::Flat => "minecraft:grass_block",
        Designation::Structure => "minecraft:gold_block",
    }
}

/// A volume to fill with a random pick from `palette`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarkerPlacement {
    pub chunk: (i32, i32),
    pub volume: BlockBox,
    pub palette: Vec<&'static str>,
}

/// One 4x4 marker patch per chunk at height `y`, centred in the chunk
pub fn designation_markers(grid: &RegionGrid, area: &BuildArea, y: i32) -> Vec<MarkerPlacement> {
    grid.iter()
        .map(|((cx, cz), record)| {
            let origin = area.chunk_origin(cx, cz);
            let mut palette: Vec<_> = record.designations.iter().map(marker_block).collect();
            if palette.is_empty() {
                palette.push(UNTAGGED_MARKER);
            }
            MarkerPlacement {
                chunk: (cx, cz),
                volume: BlockBox::new(
                    IVec3::new(origin.x + 7, y, origin.y + 7),
                    IVec3::new(origin.x + 10, y, origin.y + 10),
                ),
                palette,
            }
        })
        .collect()
}
