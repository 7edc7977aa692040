//! Racer - Per-competitor kinematic state
//!
//! Each racer carries its tuning, position, heading and speed. Exactly one
//! controller drives it every tick, then the race step integrates it.

use serde::{Deserialize, Serialize};

use crate::game_server::geometry::Point;

/// Who drives a racer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pilot {
    Human,
    Autopilot,
}

/// Tunable per-racer handling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RacerParams {
    pub max_speed: f32,
    /// Speed gained per tick of throttle
    pub accel: f32,
    /// Heading change per tick (radians)
    pub turn: f32,
}

/// Starting layout entry for one racer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacerConfig {
    pub name: String,
    /// Visual tag for the renderer
    pub color: String,
    pub start: Point,
    pub heading: f32,
    pub params: RacerParams,
    pub pilot: Pilot,
}

/// Racer state flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RacerFlags {
    pub finished: bool,
    pub off_road: bool,
}

/// Complete state for a single racer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacerState {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub pilot: Pilot,
    pub params: RacerParams,
    pub position: Point,
    /// Heading in radians (arena mode only)
    pub heading: f32,
    pub speed: f32,
    pub pickups: u32,
    /// Elapsed session seconds at arrival
    pub finish_time: Option<f32>,
    /// Arrival order, 1 for the first racer home
    pub finish_rank: Option<u32>,
    pub flags: RacerFlags,
}

impl RacerState {
    /// Create a racer at its starting spot
    pub fn new(id: u32, config: &RacerConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            color: config.color.clone(),
            pilot: config.pilot,
            params: config.params,
            position: config.start,
            heading: config.heading,
            speed: 0.0,
            pickups: 0,
            finish_time: None,
            finish_rank: None,
            flags: RacerFlags::default(),
        }
    }

    /// Put the racer back on its starting spot with everything cleared
    pub fn reset(&mut self, config: &RacerConfig) {
        *self = Self::new(self.id, config);
    }

    pub fn is_finished(&self) -> bool {
        self.flags.finished
    }

    pub fn is_human(&self) -> bool {
        self.pilot == Pilot::Human
    }

    /// Lowest allowed speed; `reverse_factor` of 0 forbids reversing
    pub fn min_speed(&self, reverse_factor: f32) -> f32 {
        -self.params.max_speed * reverse_factor
    }

    /// Keep speed within `[min_speed, max_speed]`
    pub fn clamp_speed(&mut self, reverse_factor: f32) {
        self.speed = self
            .speed
            .max(self.min_speed(reverse_factor))
            .min(self.params.max_speed);
    }

    /// Stop the racer for good and record its arrival
    pub fn mark_finished(&mut self, time: f32, rank: u32) {
        self.flags.finished = true;
        self.speed = 0.0;
        self.finish_time = Some(time);
        self.finish_rank = Some(rank);
    }
}

/// Compact racer state for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacerSnapshot {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub speed: f32,
    pub pickups: u32,
    pub finished: bool,
    pub off_road: bool,
    pub finish_rank: Option<u32>,
}

impl From<&RacerState> for RacerSnapshot {
    fn from(state: &RacerState) -> Self {
        Self {
            id: state.id,
            name: state.name.clone(),
            color: state.color.clone(),
            x: state.position.x,
            y: state.position.y,
            heading: state.heading,
            speed: state.speed,
            pickups: state.pickups,
            finished: state.flags.finished,
            off_road: state.flags.off_road,
            finish_rank: state.finish_rank,
        }
    }
}
