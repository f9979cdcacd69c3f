//! Per-run analysis state

use super::grid::RegionGrid;
use super::structures::AvoidanceSet;
use super::water::WaterNetwork;
use crate::world::BuildArea;

/// Everything one survey pass derives from the world.
///
/// Built fresh for each run and tied to the build area it was computed for;
/// the contents are a cache over the world snapshot and are meaningless for
/// any other area.
#[derive(Clone, Debug)]
pub struct AnalysisContext {
    pub area: BuildArea,
    pub grid: RegionGrid,
    pub avoid: AvoidanceSet,
    pub water: WaterNetwork,
}

impl AnalysisContext {
    /// Empty context with one blank record per chunk of the area
    pub fn new(area: BuildArea) -> Self {
        Self {
            area,
            grid: RegionGrid::new(area.chunk_span()),
            avoid: AvoidanceSet::new(),
            water: WaterNetwork::new(),
        }
    }

    /// Whether the results still describe `area`
    pub fn is_valid_for(&self, area: &BuildArea) -> bool {
        self.area == *area
    }
}
