//! Error - Configuration rejections raised when a session is built

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("race needs at least one racer")]
    NoRacers,

    #[error("race needs exactly one human racer, found {found}")]
    HumanRacerCount { found: usize },

    #[error("racer {racer}: max speed must be positive, got {value}")]
    MaxSpeed { racer: String, value: f32 },

    #[error("racer {racer}: acceleration must be positive, got {value}")]
    Acceleration { racer: String, value: f32 },

    #[error("racer {racer}: turn rate must not be negative, got {value}")]
    TurnRate { racer: String, value: f32 },

    #[error("racer {racer}: start position ({x}, {y}) is outside the track")]
    SpawnOutsideTrack { racer: String, x: f32, y: f32 },

    #[error("{name} must be in (0, 1], got {value}")]
    Factor { name: &'static str, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("braking factor must be at least 1, got {value}")]
    DecelFactor { value: f32 },

    #[error("track is too small: {reason}")]
    TrackGeometry { reason: String },

    #[error("pickup radius {radius} must be smaller than the road width {road_width}")]
    PickupRadius { radius: f32, road_width: f32 },

    #[error("pickup layout needs at least one lane")]
    PickupLanes,

    #[error("autopilot approach speed {approach} must be below the finish speed {finish}")]
    ApproachSpeed { approach: f32, finish: f32 },

    #[error("invalid race config: {0}")]
    Parse(#[from] serde_json::Error),
}
