//! Config - Race configuration, presets and validation
//!
//! One `RaceConfig` describes either variant. The track shape picks the
//! mode; pickups are an optional layer on top.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::game_server::error::ConfigError;
use crate::game_server::geometry::Point;
use crate::game_server::racer::{Pilot, RacerConfig, RacerParams};
use crate::game_server::track::{
    ArenaTrack, CorridorTrack, FinishZone, PickupLayout, RaceMode, TrackShape,
};

/// Human controller tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Handling {
    /// Braking rate as a multiple of `accel`
    pub decel_factor: f32,
    /// Multiplier applied when neither Up nor Down is held
    pub drag: f32,
    /// Multiplier applied every tick regardless of input
    pub rolling_drag: f32,
    /// Reverse cap as a fraction of max speed (0 forbids reversing)
    pub reverse_factor: f32,
    /// Sideways shift per tick in the corridor
    pub lateral_step: f32,
}

impl Handling {
    pub fn arena() -> Self {
        Self {
            decel_factor: 1.2,
            drag: 0.97,
            rolling_drag: 0.995,
            reverse_factor: 0.5,
            lateral_step: 0.0,
        }
    }

    pub fn corridor() -> Self {
        Self {
            decel_factor: 1.5,
            drag: 0.985,
            rolling_drag: 1.0,
            reverse_factor: 0.0,
            lateral_step: 4.0,
        }
    }
}

/// Autopilot tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutopilotTuning {
    /// Cruise speed as a fraction of max speed
    pub cruise_factor: f32,
    /// Throttle as a fraction of `accel`
    pub accel_factor: f32,
    /// Multiplier applied while faster than the target speed
    pub decay: f32,
    /// Distance to the finish zone centre where the autopilot slows down
    pub approach_radius: f32,
    pub approach_speed: f32,
    /// Sideways shift per tick in the corridor
    pub lateral_step: f32,
}

impl AutopilotTuning {
    pub fn arena() -> Self {
        Self {
            cruise_factor: 0.9,
            accel_factor: 0.9,
            decay: 0.98,
            approach_radius: 200.0,
            approach_speed: 0.6,
            lateral_step: 0.0,
        }
    }

    pub fn corridor() -> Self {
        Self {
            cruise_factor: 0.92,
            accel_factor: 0.9,
            decay: 0.98,
            approach_radius: 260.0,
            approach_speed: 0.5,
            lateral_step: 3.0,
        }
    }
}

/// Full description of a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceConfig {
    pub track: TrackShape,
    pub finish_zone: FinishZone,
    #[serde(default)]
    pub pickups: Option<PickupLayout>,
    pub racers: Vec<RacerConfig>,
    pub handling: Handling,
    pub autopilot: AutopilotTuning,
    /// Arrival only counts below this absolute speed
    pub finish_speed: f32,
    /// Body radius used for wall and shoulder margins
    pub racer_radius: f32,
    /// Pickup layout seed; a random one is drawn when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self::arena()
    }
}

fn racer(name: &str, color: &str, start: Point, heading: f32, params: RacerParams, pilot: Pilot) -> RacerConfig {
    RacerConfig {
        name: name.to_string(),
        color: color.to_string(),
        start,
        heading,
        params,
        pilot,
    }
}

/// The three dogs: Leo is driven from the keyboard
fn kennel(starts: [Point; 3], heading: f32) -> Vec<RacerConfig> {
    vec![
        racer(
            "Leo",
            "#e7d3b3",
            starts[0],
            heading,
            RacerParams { max_speed: 4.5, accel: 0.12, turn: 0.045 },
            Pilot::Human,
        ),
        racer(
            "Lilla",
            "#c8c6c3",
            starts[1],
            heading,
            RacerParams { max_speed: 4.2, accel: 0.1, turn: 0.04 },
            Pilot::Autopilot,
        ),
        racer(
            "Ramon Chocho",
            "#f2c07f",
            starts[2],
            heading,
            RacerParams { max_speed: 4.0, accel: 0.1, turn: 0.04 },
            Pilot::Autopilot,
        ),
    ]
}

impl RaceConfig {
    /// Walled arena, stop inside the finish circle
    pub fn arena() -> Self {
        let arena = ArenaTrack { x: 60.0, y: 60.0, width: 840.0, height: 520.0, inner_inset: 22.0 };
        let start_y = arena.y + arena.height - 140.0;
        let starts = [0.0, 1.0, 2.0].map(|i| Point::new(arena.x + 100.0 + i * 120.0, start_y));

        Self {
            track: TrackShape::Arena(arena),
            finish_zone: FinishZone {
                center: Point::new(arena.x + arena.width - 160.0, arena.y + 80.0),
                radius: 48.0,
            },
            pickups: None,
            racers: kennel(starts, -FRAC_PI_2),
            handling: Handling::arena(),
            autopilot: AutopilotTuning::arena(),
            finish_speed: 0.9,
            racer_radius: 25.0,
            seed: None,
        }
    }

    /// Scrolling corridor with bones to collect on the way down
    pub fn corridor() -> Self {
        let corridor = CorridorTrack {
            center_x: 480.0,
            road_width: 300.0,
            track_width: 480.0,
            start_y: 2400.0,
            end_y: -400.0,
        };
        let pickups = PickupLayout {
            count: 22,
            start_y: 2200.0,
            end_y: -200.0,
            lanes: 3,
            lane_spacing: 90.0,
            center_x: corridor.center_x,
            radius: 28.0,
        };
        let starts = [0, 1, 2].map(|lane| Point::new(pickups.lane_x(lane), corridor.start_y));

        Self {
            track: TrackShape::Corridor(corridor),
            finish_zone: FinishZone {
                center: Point::new(corridor.center_x, corridor.end_y + 100.0),
                radius: 120.0,
            },
            pickups: Some(pickups),
            racers: kennel(starts, -FRAC_PI_2),
            handling: Handling::corridor(),
            autopilot: AutopilotTuning::corridor(),
            finish_speed: 0.8,
            racer_radius: 22.0,
            seed: None,
        }
    }

    pub fn for_mode(mode: RaceMode) -> Self {
        match mode {
            RaceMode::Arena => Self::arena(),
            RaceMode::Corridor => Self::corridor(),
        }
    }

    /// Parse a JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RaceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn mode(&self) -> RaceMode {
        self.track.mode()
    }

    pub fn human_count(&self) -> usize {
        self.racers.iter().filter(|r| r.pilot == Pilot::Human).count()
    }

    /// Reject configurations that would misbehave at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.racers.is_empty() {
            return Err(ConfigError::NoRacers);
        }
        let humans = self.human_count();
        if humans != 1 {
            return Err(ConfigError::HumanRacerCount { found: humans });
        }

        positive("racer radius", self.racer_radius)?;
        positive("finish zone radius", self.finish_zone.radius)?;
        positive("finish speed", self.finish_speed)?;
        positive("approach radius", self.autopilot.approach_radius)?;
        positive("approach speed", self.autopilot.approach_speed)?;

        unit_factor("drag", self.handling.drag)?;
        unit_factor("rolling drag", self.handling.rolling_drag)?;
        unit_factor("autopilot decay", self.autopilot.decay)?;
        unit_factor("autopilot cruise factor", self.autopilot.cruise_factor)?;
        unit_factor("autopilot accel factor", self.autopilot.accel_factor)?;
        if !(0.0..=1.0).contains(&self.handling.reverse_factor) {
            return Err(ConfigError::Factor { name: "reverse factor", value: self.handling.reverse_factor });
        }
        if !(self.handling.decel_factor >= 1.0) {
            return Err(ConfigError::DecelFactor { value: self.handling.decel_factor });
        }
        if !(self.autopilot.approach_speed < self.finish_speed) {
            return Err(ConfigError::ApproachSpeed {
                approach: self.autopilot.approach_speed,
                finish: self.finish_speed,
            });
        }

        self.validate_track()?;

        if let Some(layout) = &self.pickups {
            if layout.lanes == 0 {
                return Err(ConfigError::PickupLanes);
            }
            positive("pickup radius", layout.radius)?;
            if let TrackShape::Corridor(corridor) = &self.track {
                if layout.radius >= corridor.road_width {
                    return Err(ConfigError::PickupRadius {
                        radius: layout.radius,
                        road_width: corridor.road_width,
                    });
                }
            }
        }

        for racer in &self.racers {
            let RacerParams { max_speed, accel, turn } = racer.params;
            if !(max_speed > 0.0) {
                return Err(ConfigError::MaxSpeed { racer: racer.name.clone(), value: max_speed });
            }
            if !(accel > 0.0) {
                return Err(ConfigError::Acceleration { racer: racer.name.clone(), value: accel });
            }
            if !(turn >= 0.0) {
                return Err(ConfigError::TurnRate { racer: racer.name.clone(), value: turn });
            }
            if !self.track.contains(racer.start) {
                return Err(ConfigError::SpawnOutsideTrack {
                    racer: racer.name.clone(),
                    x: racer.start.x,
                    y: racer.start.y,
                });
            }
        }

        Ok(())
    }

    fn validate_track(&self) -> Result<(), ConfigError> {
        match &self.track {
            TrackShape::Arena(arena) => {
                let body = self.racer_radius * 2.0;
                if !(arena.width > body && arena.height > body) {
                    return Err(ConfigError::TrackGeometry {
                        reason: format!(
                            "arena {}x{} cannot hold a racer of radius {}",
                            arena.width, arena.height, self.racer_radius
                        ),
                    });
                }
            }
            TrackShape::Corridor(corridor) => {
                positive("corridor road width", corridor.road_width)?;
                positive("handling lateral step", self.handling.lateral_step)?;
                positive("autopilot lateral step", self.autopilot.lateral_step)?;
                if corridor.road_width > corridor.track_width {
                    return Err(ConfigError::TrackGeometry {
                        reason: format!(
                            "road width {} exceeds track width {}",
                            corridor.road_width, corridor.track_width
                        ),
                    });
                }
                if !(corridor.track_width > self.racer_radius * 2.0) {
                    return Err(ConfigError::TrackGeometry {
                        reason: format!("corridor width {} is narrower than a racer", corridor.track_width),
                    });
                }
                if !(corridor.end_y < corridor.start_y) {
                    return Err(ConfigError::TrackGeometry {
                        reason: format!("corridor must run toward decreasing y ({} -> {})", corridor.start_y, corridor.end_y),
                    });
                }
            }
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn unit_factor(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Factor { name, value })
    }
}
