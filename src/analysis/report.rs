//! Serializable summary of a survey pass

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::budget::TimeBudget;
use super::context::AnalysisContext;
use super::grid::Designation;
use super::heightmap::SurfaceMap;
use super::water::WaterBody;
use crate::core::types::{IVec2, IVec3, Result};
use crate::world::BuildArea;

/// Result of analysing one chunk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub cx: i32,
    pub cz: i32,
    pub designations: Vec<Designation>,
    pub primary_biome: String,
    pub biomes: BTreeSet<String>,
}

/// Everything a survey found, ready to be written as JSON
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub build_area: BuildArea,
    pub chunk_span: IVec2,
    /// Chunks in scan order (x-major)
    pub chunks: Vec<ChunkSummary>,
    pub water_bodies: BTreeMap<String, WaterBody>,
    pub claimed_water_blocks: usize,
    pub avoided_blocks: usize,
    pub structure_chunks: Vec<(i32, i32)>,
    /// Columns with no surface above the floor
    pub void_columns: usize,
    pub waterfalls: Vec<IVec3>,
    pub elapsed_secs: f64,
    pub budget_remaining_secs: f64,
    /// Whether there is still time for generative phases
    pub continue_generation: bool,
}

impl SurveyReport {
    /// Summarise a finished analysis
    pub fn from_context(ctx: &AnalysisContext, surface: &SurfaceMap, budget: &TimeBudget) -> Self {
        let chunks = ctx
            .grid
            .iter()
            .map(|((cx, cz), record)| ChunkSummary {
                cx,
                cz,
                designations: record.designations.as_slice().to_vec(),
                primary_biome: record.primary_biome.clone(),
                biomes: record.biomes.clone(),
            })
            .collect();

        Self {
            build_area: ctx.area,
            chunk_span: ctx.grid.span(),
            chunks,
            water_bodies: ctx.water.bodies().clone(),
            claimed_water_blocks: ctx.water.claimed_len(),
            avoided_blocks: ctx.avoid.len(),
            structure_chunks: ctx.grid.chunks_with(Designation::Structure),
            void_columns: surface.void_columns(),
            waterfalls: ctx.water.waterfalls().to_vec(),
            elapsed_secs: budget.elapsed().as_secs_f64(),
            budget_remaining_secs: budget.remaining().as_secs_f64(),
            continue_generation: budget.should_continue(),
        }
    }

    /// Chunk summary by coordinate
    pub fn chunk(&self, cx: i32, cz: i32) -> Option<&ChunkSummary> {
        self.chunks.iter().find(|c| c.cx == cx && c.cz == cz)
    }

    /// Write the report as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a report written by [`SurveyReport::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
