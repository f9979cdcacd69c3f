//! Biome classifier: tags chunks from their primary biome name
//!
//! Rules are data: an ordered list of groups, each an ordered list of
//! (keywords, tag) rules. Within a group the first matching rule wins, so a
//! group expresses mutually exclusive tags such as water / water-adjacent.

use serde::{Deserialize, Serialize};

use super::grid::{Designation, RegionGrid};
use crate::core::types::CHUNK_SIZE;
use crate::world::WorldSlice;

/// Tag applied when the biome name contains any of the keywords
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeRule {
    pub keywords: Vec<String>,
    pub tag: Designation,
}

impl BiomeRule {
    pub fn new(keywords: &[&str], tag: Designation) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            tag,
        }
    }

    /// Substring match against any keyword
    pub fn matches(&self, biome: &str) -> bool {
        self.keywords.iter().any(|k| biome.contains(k.as_str()))
    }
}

/// Rules evaluated in order; only the first match contributes a tag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleGroup(pub Vec<BiomeRule>);

impl RuleGroup {
    /// Tag of the first rule matching the biome
    pub fn first_match(&self, biome: &str) -> Option<Designation> {
        self.0.iter().find(|r| r.matches(biome)).map(|r| r.tag)
    }
}

/// Complete classification table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeRuleSet(pub Vec<RuleGroup>);

impl Default for BiomeRuleSet {
    fn default() -> Self {
        use Designation::*;
        Self(vec![
            RuleGroup(vec![BiomeRule::new(&["snowy"], Snowy)]),
            RuleGroup(vec![BiomeRule::new(&["forest", "taiga", "grove", "wooded"], Forest)]),
            RuleGroup(vec![
                BiomeRule::new(&["ocean", "swamp"], Water),
                BiomeRule::new(&["beach", "river", "shore"], WaterAdjacent),
            ]),
            RuleGroup(vec![
                BiomeRule::new(&["peaks", "hills", "mountains", "windswept", "eroded"], Harsh),
                BiomeRule::new(&["plains", "meadow", "fields", "sparse", "plateau", "desert"], Flat),
            ]),
        ])
    }
}

impl BiomeRuleSet {
    /// Tags for a biome name, in group order
    pub fn tags_for(&self, biome: &str) -> Vec<Designation> {
        self.0.iter().filter_map(|g| g.first_match(biome)).collect()
    }
}

/// Populate biome data and designations for every chunk of the grid.
///
/// Each record's designations are reset before tagging, so running this
/// twice on the same slice gives identical results. Detection passes that
/// add `structure` or `water` must run afterwards.
pub fn classify(
    grid: &mut RegionGrid,
    slice: &WorldSlice,
    rules: &BiomeRuleSet,
    origin_x: i32,
    origin_z: i32,
) {
    let coords: Vec<_> = grid.coords().collect();
    for (cx, cz) in coords {
        let x = origin_x + cx * CHUNK_SIZE;
        let z = origin_z + cz * CHUNK_SIZE;
        let primary = slice.primary_biome_near(x, 0, z);
        let biomes = slice.biomes_near(x, 0, z);

        let Some(record) = grid.get_mut(cx, cz) else { continue };
        record.designations.clear();
        for tag in rules.tags_for(&primary) {
            record.designations.insert(tag);
        }
        log::trace!("Chunk ({}, {}) {} -> {:?}", cx, cz, primary, record.designations.as_slice());
        record.primary_biome = primary;
        record.biomes = biomes;
    }
    log::info!("Classified {} chunks by biome", grid.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec2;
    use crate::world::{Heightmap, HeightmapKind, SliceRect};
    use std::collections::HashMap;

    fn slice_of(chunk_biomes: &[&str]) -> WorldSlice {
        // One chunk per biome along X
        let width = CHUNK_SIZE * chunk_biomes.len() as i32;
        let depth = CHUNK_SIZE;
        let rect = SliceRect { x: 0, z: 0, width, depth };
        let mut biomes = Vec::new();
        for x in 0..width {
            for _ in 0..depth {
                biomes.push(chunk_biomes[(x / CHUNK_SIZE) as usize].to_string());
            }
        }
        let mut maps = HashMap::new();
        maps.insert(HeightmapKind::MotionBlockingNoLeaves, Heightmap::filled(width, depth, 64));
        WorldSlice::new(rect, maps, biomes).unwrap().with_biome_radius(0)
    }

    fn tags(biome: &str) -> Vec<Designation> {
        BiomeRuleSet::default().tags_for(biome)
    }

    #[test]
    fn test_single_tags() {
        assert_eq!(tags("minecraft:snowy_slopes"), vec![Designation::Snowy]);
        assert_eq!(tags("minecraft:dark_forest"), vec![Designation::Forest]);
        assert_eq!(tags("minecraft:deep_ocean"), vec![Designation::Water]);
        assert_eq!(tags("minecraft:stony_shore"), vec![Designation::WaterAdjacent]);
        assert_eq!(tags("minecraft:jagged_peaks"), vec![Designation::Harsh]);
        assert_eq!(tags("minecraft:desert"), vec![Designation::Flat]);
        assert!(tags("minecraft:mushroom_fields").contains(&Designation::Flat));
        assert!(tags("minecraft:the_void").is_empty());
        assert!(tags("").is_empty());
    }

    #[test]
    fn test_combined_tags() {
        assert_eq!(
            tags("minecraft:snowy_taiga"),
            vec![Designation::Snowy, Designation::Forest]
        );
        assert_eq!(
            tags("minecraft:windswept_forest"),
            vec![Designation::Forest, Designation::Harsh]
        );
        assert_eq!(
            tags("minecraft:snowy_plains"),
            vec![Designation::Snowy, Designation::Flat]
        );
    }

    #[test]
    fn test_exclusive_groups_first_match_wins() {
        // "frozen_river" is water-adjacent, "swamp" beats "river"
        assert_eq!(tags("minecraft:frozen_river"), vec![Designation::WaterAdjacent]);
        let both = tags("swamp_river_hills_plains");
        assert!(both.contains(&Designation::Water));
        assert!(!both.contains(&Designation::WaterAdjacent));
        assert!(both.contains(&Designation::Harsh));
        assert!(!both.contains(&Designation::Flat));
    }

    #[test]
    fn test_classify_grid_is_mutually_exclusive() {
        let names = [
            "minecraft:ocean", "minecraft:beach", "minecraft:windswept_hills",
            "minecraft:plains", "minecraft:eroded_badlands", "minecraft:sparse_jungle",
        ];
        let slice = slice_of(&names);
        let mut grid = RegionGrid::new(IVec2::new(names.len() as i32, 1));
        classify(&mut grid, &slice, &BiomeRuleSet::default(), 0, 0);

        for (_, record) in grid.iter() {
            let d = &record.designations;
            assert!(!(d.contains(Designation::Water) && d.contains(Designation::WaterAdjacent)));
            assert!(!(d.contains(Designation::Harsh) && d.contains(Designation::Flat)));
        }
        assert_eq!(grid.get(0, 0).unwrap().primary_biome, "minecraft:ocean");
        assert!(grid.get(1, 0).unwrap().designations.contains(Designation::WaterAdjacent));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let slice = slice_of(&["minecraft:snowy_taiga", "minecraft:meadow"]);
        let mut grid = RegionGrid::new(IVec2::new(2, 1));
        let rules = BiomeRuleSet::default();
        classify(&mut grid, &slice, &rules, 0, 0);
        let first = grid.clone();
        classify(&mut grid, &slice, &rules, 0, 0);
        assert_eq!(grid, first);
    }

    #[test]
    fn test_classify_resets_previous_tags() {
        let slice = slice_of(&["minecraft:plains"]);
        let mut grid = RegionGrid::new(IVec2::new(1, 1));
        grid.get_mut(0, 0).unwrap().designations.insert(Designation::Structure);
        classify(&mut grid, &slice, &BiomeRuleSet::default(), 0, 0);
        assert_eq!(grid.get(0, 0).unwrap().designations.as_slice(), &[Designation::Flat]);
    }

    #[test]
    fn test_rule_set_from_json() {
        let json = r#"[[{"keywords": ["cherry"], "tag": "forest"}]]"#;
        let rules: BiomeRuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(rules.tags_for("minecraft:cherry_grove"), vec![Designation::Forest]);
        assert!(rules.tags_for("minecraft:ocean").is_empty());
    }
}
