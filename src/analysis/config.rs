//! Survey configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::BiomeRuleSet;
use super::water::DEFAULT_POND_THRESHOLD;
use crate::core::types::{CHUNK_SIZE, Result};
use crate::core::Error;
use crate::world::BlockCategories;

/// Configuration for a survey pass.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Sample points per chunk axis (4 = every 4 blocks)
    pub sub_chunk_res: i32,
    /// Fluid regions smaller than this are ponds, larger ones lakes
    pub pond_threshold: usize,
    /// Soft wall-clock budget for the whole run, in seconds
    pub allowed_time_secs: u64,
    /// Part of the budget kept for cleanup after generative phases
    pub finish_reserve_secs: u64,
    /// Maximum blocks held by the query cache during the pass
    pub cache_capacity: usize,
    /// Lowest height the refiner descends to; defaults to the build area floor
    pub min_y: Option<i32>,
    /// Block category tables
    pub categories: BlockCategories,
    /// Biome classification rules
    pub biome_rules: BiomeRuleSet,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            sub_chunk_res: 4,
            pond_threshold: DEFAULT_POND_THRESHOLD,
            allowed_time_secs: 600,
            finish_reserve_secs: 60,
            cache_capacity: 1 << 16,
            min_y: None,
            categories: BlockCategories::default(),
            biome_rules: BiomeRuleSet::default(),
        }
    }
}

impl SurveyConfig {
    /// Load a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the survey cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.sub_chunk_res < 1 || self.sub_chunk_res > CHUNK_SIZE {
            return Err(Error::Config(format!(
                "sub_chunk_res must be in 1..={}, got {}",
                CHUNK_SIZE, self.sub_chunk_res
            )));
        }
        if self.finish_reserve_secs > self.allowed_time_secs {
            return Err(Error::Config(format!(
                "finish_reserve_secs ({}) exceeds allowed_time_secs ({})",
                self.finish_reserve_secs, self.allowed_time_secs
            )));
        }
        if self.cache_capacity == 0 {
            return Err(Error::Config("cache_capacity must be positive".into()));
        }
        Ok(())
    }

    /// Distance in blocks between sample points along a chunk axis
    pub fn sample_spacing(&self) -> i32 {
        CHUNK_SIZE / self.sub_chunk_res
    }
}
