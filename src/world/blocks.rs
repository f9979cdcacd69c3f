//! Block queries and block-category lookup tables

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Result};

/// Namespace assumed for block identifiers without an explicit one
pub const DEFAULT_NAMESPACE: &str = "minecraft:";

/// Live block lookup provided by the world server (or a local stand-in).
///
/// Takes `&mut self` so implementations can count or cache requests.
pub trait BlockSource {
    /// Block identifier at a global coordinate, e.g. `minecraft:stone`
    fn block_at(&mut self, pos: IVec3) -> Result<String>;
}

impl<T: BlockSource + ?Sized> BlockSource for &mut T {
    fn block_at(&mut self, pos: IVec3) -> Result<String> {
        (**self).block_at(pos)
    }
}

impl<T: BlockSource + ?Sized> BlockSource for Box<T> {
    fn block_at(&mut self, pos: IVec3) -> Result<String> {
        (**self).block_at(pos)
    }
}

/// Strip the default namespace and any block-state suffix from an identifier.
///
/// `minecraft:oak_stairs[facing=north]` becomes `oak_stairs`. Identifiers from
/// other namespaces keep their namespace.
pub fn block_name(id: &str) -> &str {
    let id = id.trim();
    let end = id.find(['[', '{']).unwrap_or(id.len());
    let id = &id[..end];
    id.strip_prefix(DEFAULT_NAMESPACE).unwrap_or(id)
}

/// Block category used as a flood-fill predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockCategory {
    /// Player or structure made blocks
    Artificial,
    /// Water, lava
    Fluid,
    /// Air variants
    Air,
}

/// Raw category lists as they appear in config files
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct CategoryTables {
    #[serde(default)]
    artificial: Vec<String>,
    #[serde(default)]
    fluid: Vec<String>,
    #[serde(default)]
    air: Vec<String>,
}

/// Membership tables classifying block identifiers.
///
/// Entries are stored without the default namespace so both `stone` and
/// `minecraft:stone` match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryTables")]
pub struct BlockCategories {
    artificial: BTreeSet<String>,
    fluid: BTreeSet<String>,
    air: BTreeSet<String>,
}

impl From<CategoryTables> for BlockCategories {
    fn from(tables: CategoryTables) -> Self {
        Self::new(tables.artificial, tables.fluid, tables.air)
    }
}

const WOODS: &[&str] = &[
    "oak", "spruce", "birch", "jungle", "acacia", "dark_oak", "mangrove", "cherry",
    "crimson", "warped",
];

const WOOD_PRODUCTS: &[&str] = &[
    "planks", "stairs", "slab", "fence", "fence_gate", "door", "trapdoor", "sign",
    "wall_sign", "pressure_plate", "button",
];

const COLORS: &[&str] = &[
    "white", "orange", "magenta", "light_blue", "yellow", "lime", "pink", "gray",
    "light_gray", "cyan", "purple", "blue", "brown", "green", "red", "black",
];

const COLORED_PRODUCTS: &[&str] = &[
    "wool", "carpet", "concrete", "stained_glass", "stained_glass_pane", "bed",
    "glazed_terracotta", "banner", "wall_banner",
];

const OTHER_ARTIFICIAL: &[&str] = &[
    "cobblestone", "cobblestone_stairs", "cobblestone_slab", "cobblestone_wall",
    "mossy_cobblestone", "mossy_cobblestone_wall", "stone_bricks",
    "stone_brick_stairs", "stone_brick_slab", "stone_brick_wall",
    "mossy_stone_bricks", "cracked_stone_bricks", "chiseled_stone_bricks",
    "bricks", "brick_stairs", "brick_slab", "brick_wall", "glass", "glass_pane",
    "torch", "wall_torch", "lantern", "soul_lantern", "crafting_table", "furnace",
    "blast_furnace", "smoker", "chest", "trapped_chest", "barrel", "bookshelf",
    "ladder", "rail", "powered_rail", "detector_rail", "iron_bars", "iron_door",
    "hay_block", "composter", "bell", "anvil", "lectern", "cartography_table",
    "fletching_table", "smithing_table", "stonecutter", "grindstone", "loom",
    "cauldron", "brewing_stand", "enchanting_table", "flower_pot", "scaffolding",
    "smooth_stone", "smooth_stone_slab", "polished_andesite", "polished_diorite",
    "polished_granite", "cut_sandstone", "chiseled_sandstone", "smooth_sandstone",
    "dirt_path", "farmland", "spawner", "bone_block", "prismarine_bricks",
    "dark_prismarine", "sea_lantern", "purpur_block", "end_stone_bricks",
    "nether_bricks", "nether_brick_fence", "quartz_block", "chiseled_quartz_block",
    "quartz_pillar",
];

impl Default for BlockCategories {
    fn default() -> Self {
        let mut artificial: Vec<String> = OTHER_ARTIFICIAL.iter().map(|s| s.to_string()).collect();
        for wood in WOODS {
            for product in WOOD_PRODUCTS {
                artificial.push(format!("{wood}_{product}"));
            }
        }
        for color in COLORS {
            for product in COLORED_PRODUCTS {
                artificial.push(format!("{color}_{product}"));
            }
        }

        Self::new(
            artificial,
            ["water", "lava", "bubble_column"].map(String::from),
            ["air", "cave_air", "void_air"].map(String::from),
        )
    }
}

impl BlockCategories {
    /// Build tables from identifier lists (namespaced or bare)
    pub fn new(
        artificial: impl IntoIterator<Item = String>,
        fluid: impl IntoIterator<Item = String>,
        air: impl IntoIterator<Item = String>,
    ) -> Self {
        let normalize = |ids: &mut dyn Iterator<Item = String>| -> BTreeSet<String> {
            ids.map(|id| block_name(&id).to_string()).collect()
        };
        Self {
            artificial: normalize(&mut artificial.into_iter()),
            fluid: normalize(&mut fluid.into_iter()),
            air: normalize(&mut air.into_iter()),
        }
    }

    /// Check whether a block belongs to a category
    pub fn contains(&self, category: BlockCategory, id: &str) -> bool {
        let name = block_name(id);
        match category {
            BlockCategory::Artificial => self.artificial.contains(name),
            BlockCategory::Fluid => self.fluid.contains(name),
            BlockCategory::Air => self.air.contains(name),
        }
    }

    pub fn is_artificial(&self, id: &str) -> bool {
        self.contains(BlockCategory::Artificial, id)
    }

    pub fn is_fluid(&self, id: &str) -> bool {
        self.contains(BlockCategory::Fluid, id)
    }

    /// Air variants. An empty identifier (no data) also counts as air.
    pub fn is_air(&self, id: &str) -> bool {
        let name = block_name(id);
        name.is_empty() || self.air.contains(name)
    }

    /// Tree trunks (`*_log`)
    pub fn is_log(&self, id: &str) -> bool {
        block_name(id).ends_with("_log")
    }

    /// Tree canopy (`*_leaves`)
    pub fn is_leaves(&self, id: &str) -> bool {
        block_name(id).ends_with("_leaves")
    }

    /// Anything the walkable surface should ignore: logs, leaves and air
    pub fn is_canopy_or_air(&self, id: &str) -> bool {
        self.is_log(id) || self.is_leaves(id) || self.is_air(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_name_strips_namespace_and_state() {
        assert_eq!(block_name("minecraft:stone"), "stone");
        assert_eq!(block_name("minecraft:oak_stairs[facing=north]"), "oak_stairs");
        assert_eq!(block_name("chest{Items:[]}"), "chest");
        assert_eq!(block_name("modded:thing"), "modded:thing");
        assert_eq!(block_name(""), "");
    }

    #[test]
    fn test_default_categories() {
        let cats = BlockCategories::default();
        assert!(cats.is_artificial("minecraft:oak_planks"));
        assert!(cats.is_artificial("minecraft:red_wool"));
        assert!(cats.is_artificial("cobblestone"));
        assert!(!cats.is_artificial("minecraft:stone"));
        assert!(cats.is_fluid("minecraft:water"));
        assert!(cats.is_fluid("minecraft:water[level=3]"));
        assert!(!cats.is_fluid("minecraft:ice"));
        assert!(cats.is_air("minecraft:cave_air"));
        assert!(cats.is_air(""));
    }

    #[test]
    fn test_foliage_checks() {
        let cats = BlockCategories::default();
        assert!(cats.is_log("minecraft:spruce_log"));
        assert!(!cats.is_log("minecraft:stripped_oak_wood"));
        assert!(cats.is_leaves("minecraft:birch_leaves[persistent=false]"));
        assert!(cats.is_canopy_or_air("minecraft:air"));
        assert!(!cats.is_canopy_or_air("minecraft:grass_block"));
    }

    #[test]
    fn test_deserialize_normalizes_entries() {
        let json = r#"{"artificial": ["minecraft:gold_block"], "fluid": ["water"]}"#;
        let cats: BlockCategories = serde_json::from_str(json).unwrap();
        assert!(cats.is_artificial("gold_block"));
        assert!(cats.is_fluid("minecraft:water"));
        assert!(!cats.is_air("minecraft:air"));
    }
}
