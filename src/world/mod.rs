//! Collaborators the survey reads from
//!
//! The live world server sits behind [`BlockSource`]; [`MemoryWorld`] is a
//! local stand-in that can also capture a [`WorldSlice`] of itself.

pub mod blocks;
pub mod build_area;
pub mod cache;
pub mod memory;
pub mod slice;

pub use blocks::{block_name, BlockCategories, BlockCategory, BlockSource};
pub use build_area::BuildArea;
pub use cache::CachedBlocks;
pub use memory::{BiomeRegion, Fill, MemoryWorld, WorldDescription};
pub use slice::{Heightmap, HeightmapKind, SliceRect, WorldSlice};
