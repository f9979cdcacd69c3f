//! One full analysis pass over a build area
//!
//! Classifies chunks by biome and refines the heightmap before probing a sparse
//! grid of sample points in every chunk for structures and water.

use std::collections::HashSet;
use std::time::Duration;

use super::budget::TimeBudget;
use super::classifier::classify;
use super::config::SurveyConfig;
use super::context::AnalysisContext;
use super::heightmap::{refine_heightmap, SurfaceMap};
use super::report::SurveyReport;
use super::structures::detect_structure;
use super::water::detect_water_body;
use crate::core::types::{CHUNK_SIZE, IVec3, Result};
use crate::core::Error;
use crate::world::{BlockSource, BuildArea, CachedBlocks, SliceRect, WorldSlice};

/// Everything produced by [`Survey::run`]
#[derive(Clone, Debug)]
pub struct SurveyOutcome {
    pub context: AnalysisContext,
    pub surface: SurfaceMap,
    pub report: SurveyReport,
}

/// Survey driver holding the configuration and the run's time budget
pub struct Survey {
    config: SurveyConfig,
    budget: TimeBudget,
}

impl Survey {
    /// Create a survey; the time budget starts now
    pub fn new(config: SurveyConfig) -> Self {
        let budget = TimeBudget::start(
            Duration::from_secs(config.allowed_time_secs),
            Duration::from_secs(config.finish_reserve_secs),
        );
        Self { config, budget }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    pub fn budget(&self) -> &TimeBudget {
        &self.budget
    }

    /// Whether there is time left for work after the survey
    pub fn should_continue(&self) -> bool {
        self.budget.should_continue()
    }

    /// Wrap a block source in a cache sized from the config
    pub fn cached<S: BlockSource>(&self, source: S) -> CachedBlocks<S> {
        CachedBlocks::new(source, self.config.cache_capacity)
    }

    /// Analyse `area` using the snapshot `slice` and live block queries.
    ///
    /// Caching is enabled for the pass and disabled again afterwards, also
    /// when the pass fails.
    pub fn run<S: BlockSource>(
        &self,
        slice: &WorldSlice,
        area: BuildArea,
        blocks: &mut CachedBlocks<S>,
    ) -> Result<SurveyOutcome> {
        self.config.validate()?;
        blocks.set_caching(true);
        let result = self.analyse(slice, area, blocks);
        let (hits, misses) = blocks.stats();
        blocks.set_caching(false);
        log::debug!("Block cache: {} hits, {} misses", hits, misses);

        let (context, surface) = result?;
        let report = SurveyReport::from_context(&context, &surface, &self.budget);
        log::info!(
            "Survey finished in {:.2}s: {} water bodies, {} structure chunks, {} blocks to avoid",
            report.elapsed_secs,
            report.water_bodies.len(),
            report.structure_chunks.len(),
            report.avoided_blocks
        );
        if !report.continue_generation {
            log::warn!("Time budget nearly spent ({:.0}s left)", report.budget_remaining_secs);
        }
        Ok(SurveyOutcome { context, surface, report })
    }

    fn analyse<B: BlockSource + ?Sized>(
        &self,
        slice: &WorldSlice,
        area: BuildArea,
        blocks: &mut B,
    ) -> Result<(AnalysisContext, SurfaceMap)> {
        let rect = slice.rect();
        let expected = SliceRect {
            x: area.min().x,
            z: area.min().z,
            width: area.width(),
            depth: area.depth(),
        };
        if rect != expected {
            return Err(Error::Snapshot(format!(
                "slice covers {:?} but build area needs {:?}",
                rect, expected
            )));
        }

        let mut ctx = AnalysisContext::new(area);
        let span = ctx.grid.span();
        log::info!(
            "Surveying {}x{} chunks from ({}, {})",
            span.x,
            span.y,
            area.min().x,
            area.min().z
        );

        classify(&mut ctx.grid, slice, &self.config.biome_rules, area.min().x, area.min().z);

        let min_y = self.config.min_y.unwrap_or(area.min().y);
        let categories = &self.config.categories;
        let surface = refine_heightmap(slice, blocks, categories, min_y)?;

        let res = self.config.sub_chunk_res;
        let spacing = self.config.sample_spacing();
        let coords: Vec<_> = ctx.grid.coords().collect();
        for (cx, cz) in coords {
            // Fresh observed sets per chunk and category
            let mut structure_observed = HashSet::new();
            let mut fluid_observed = HashSet::new();

            for jx in 0..res {
                for jz in 0..res {
                    let lx = cx * CHUNK_SIZE + jx * spacing;
                    let lz = cz * CHUNK_SIZE + jz * spacing;
                    // Surface map shares its origin with the build area
                    let Some(y) = surface.get(lx, lz) else {
                        continue;
                    };
                    let column = area.local_to_global(IVec3::new(lx, 0, lz));
                    let pos = IVec3::new(column.x, y, column.z);
                    if !area.contains(pos) {
                        log::trace!("Sample {:?} lies outside the build area", pos);
                        continue;
                    }
                    let block = blocks.block_at(pos)?;

                    if categories.is_artificial(&block) {
                        if !ctx.avoid.contains(pos) {
                            detect_structure(&mut ctx, blocks, categories, cx, cz, pos, &mut structure_observed)?;
                        }
                    } else if categories.is_fluid(&block) && !ctx.water.is_claimed(pos) {
                        detect_water_body(
                            &mut ctx,
                            blocks,
                            categories,
                            cx,
                            cz,
                            pos,
                            &mut fluid_observed,
                            self.config.pond_threshold,
                        )?;
                    }
                }
            }
        }
        log::info!(
            "Detection done: {} claimed water blocks, {} avoided blocks",
            ctx.water.claimed_len(),
            ctx.avoid.len()
        );
        Ok((ctx, surface))
    }
}
