//! Game Server Module
//!
//! Runs the race simulation in Rust. The JS frontend draws whatever the
//! snapshots say and feeds back key events and frame timestamps.

pub mod autopilot;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod input;
pub mod race;
pub mod racer;
pub mod simulation;
pub mod track;

pub use config::{AutopilotTuning, Handling, RaceConfig};
pub use error::ConfigError;
pub use geometry::Point;
pub use input::{HeldKeys, Key};
pub use race::{RaceResult, RaceSession, RaceSnapshot, RaceStatus};
pub use racer::{Pilot, RacerConfig, RacerParams, RacerState};
pub use simulation::{GameServer, GameState, HudSnapshot, ServerStats};
pub use track::{ArenaTrack, CorridorTrack, FinishZone, Pickup, PickupLayout, RaceMode, TrackShape};
