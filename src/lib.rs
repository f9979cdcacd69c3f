//! Terrasurvey - chunkwise terrain classification and flood-fill region discovery
//!
//! Analyses a build area of a block world: tags chunks from their biomes,
//! refines the heightmap to the walkable surface and probes a sparse grid of
//! sample points per chunk to find artificial structures and water bodies.

pub mod core;
pub mod math;
pub mod world;
pub mod analysis;
