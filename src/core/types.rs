//! Core type aliases and re-exports

pub use glam::{IVec2, IVec3};

/// Standard Result type for the survey engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Horizontal size of a chunk in blocks
pub const CHUNK_SIZE: i32 = 16;
