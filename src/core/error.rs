//! Error types for terrain surveys

use thiserror::Error;

/// Main error type for the survey engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Block query failed at {x} {y} {z}: {message}")]
    Query {
        x: i32,
        y: i32,
        z: i32,
        message: String,
    },
}

impl Error {
    /// Build a query error for a block coordinate.
    pub fn query(pos: glam::IVec3, message: impl Into<String>) -> Self {
        Self::Query {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            message: message.into(),
        }
    }
}
