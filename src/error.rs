//! Error type shared across the simulator

use thiserror::Error;

/// Errors reported synchronously at the offending call. Nothing in the
/// core is retried; a rejected triangle simply never enters the pipeline.
#[derive(Debug, Error)]
pub enum SimError {
    /// Vertex table has no empty slot; the triangle cannot be placed.
    #[error("vertex table full")]
    TableFull,

    /// Vertex at or behind the camera plane. Rejected before projection so
    /// NaN/Inf never propagates into the pipeline.
    #[error("vertex at or behind the camera plane (z = {0})")]
    BehindCamera(f32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),

    #[error("model file truncated while reading {0}")]
    ModelTruncated(&'static str),

    #[error("texture load error: {0}")]
    Texture(String),
}
