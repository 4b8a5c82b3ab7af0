// error.rs - Construction-time failures
//
// Everything that runs per frame is infallible. Only building a scene
// (bad mass, bad color strings, empty light set, ...) can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("resolution must be at least 1, got {0}")]
    InvalidResolution(u32),

    #[error("canvas dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("scene needs at least one light source")]
    NoLights,

    #[error("malformed color string {0:?}")]
    InvalidColor(String),

    #[error("config value {field} out of range: {value}")]
    InvalidConfigValue { field: &'static str, value: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SceneError>;
