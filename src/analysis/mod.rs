//! Terrain analysis: chunk classification, surface refinement and
//! flood-fill detection of structures and water bodies

pub mod budget;
pub mod classifier;
pub mod config;
pub mod context;
pub mod flood;
pub mod grid;
pub mod heightmap;
pub mod markers;
pub mod report;
pub mod structures;
pub mod survey;
pub mod water;

pub use budget::TimeBudget;
pub use classifier::{classify, BiomeRule, BiomeRuleSet, RuleGroup};
pub use config::SurveyConfig;
pub use context::AnalysisContext;
pub use flood::{flood_category, flood_fill, Connectivity, FloodResult};
pub use grid::{ChunkRecord, Designation, Designations, RegionGrid};
pub use heightmap::{refine_column, refine_heightmap, SurfaceMap};
pub use markers::{designation_markers, marker_block, MarkerPlacement};
pub use report::{ChunkSummary, SurveyReport};
pub use structures::{detect_structure, AvoidanceSet, STRUCTURE_REASON};
pub use survey::{Survey, SurveyOutcome};
pub use water::{
    detect_water_body, diagonal_neighbour_biomes, MergeOutcome, WaterBody, WaterBodyKind,
    WaterNetwork, DEFAULT_POND_THRESHOLD,
};
