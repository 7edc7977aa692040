//! Race - Session state, the per-tick step and standings
//!
//! A `RaceSession` owns every mutable piece of one playthrough. One call
//! to `tick` runs the controllers, integrates, resolves pickups and
//! arrivals, then latches the finished state once everyone is home.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game_server::autopilot;
use crate::game_server::config::RaceConfig;
use crate::game_server::driver;
use crate::game_server::error::ConfigError;
use crate::game_server::geometry::{distance, Point};
use crate::game_server::input::{HeldKeys, Key};
use crate::game_server::racer::{Pilot, RacerSnapshot, RacerState};
use crate::game_server::track::{FinishZone, Pickup, RaceMode, TrackShape};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceStatus {
    /// Waiting for the first throttle input
    Idle,
    Running,
    /// Terminal until reset
    Finished,
}

/// One line of the standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub racer_id: u32,
    pub racer_name: String,
    pub finish_time: f32,
    pub position: u32,
    pub pickups: u32,
}

/// Complete race state
#[derive(Debug, Clone)]
pub struct RaceSession {
    config: RaceConfig,
    /// Current race status
    pub status: RaceStatus,
    /// All racers, in creation order
    pub racers: Vec<RacerState>,
    pub pickups: Vec<Pickup>,
    /// Elapsed race time (seconds)
    pub elapsed_time: f32,
    /// Racer ids in arrival order
    pub finish_order: Vec<u32>,
    layout_seed: u64,
}

impl RaceSession {
    /// Build a session in the Idle state
    pub fn new(config: RaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let layout_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let racers = config
            .racers
            .iter()
            .enumerate()
            .map(|(i, racer)| RacerState::new(i as u32, racer))
            .collect();

        let mut session = Self {
            config,
            status: RaceStatus::Idle,
            racers,
            pickups: Vec::new(),
            elapsed_time: 0.0,
            finish_order: Vec::new(),
            layout_seed,
        };
        session.layout_pickups();

        info!(
            "Race session ready: {:?} mode, {} racers, {} pickups",
            session.mode(),
            session.racers.len(),
            session.pickups.len()
        );
        Ok(session)
    }

    /// Validated configuration this session was built from
    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Arena or corridor, derived from the track shape
    pub fn mode(&self) -> RaceMode {
        self.config.mode()
    }

    /// The keyboard-driven racer
    pub fn player(&self) -> Option<&RacerState> {
        self.racers.iter().find(|r| r.is_human())
    }

    /// Number of racers that have arrived
    pub fn finished_count(&self) -> usize {
        self.racers.iter().filter(|r| r.is_finished()).count()
    }

    /// Restore the starting layout. Calling it twice equals calling it once.
    pub fn reset(&mut self) {
        for (racer, config) in self.racers.iter_mut().zip(&self.config.racers) {
            racer.reset(config);
        }
        self.status = RaceStatus::Idle;
        self.elapsed_time = 0.0;
        self.finish_order.clear();
        self.layout_pickups();
        info!("Race reset");
    }

    fn layout_pickups(&mut self) {
        self.pickups = match &self.config.pickups {
            Some(layout) => layout.generate(&mut StdRng::seed_from_u64(self.layout_seed)),
            None => Vec::new(),
        };
    }

    /// Advance the race by one frame of `delta` seconds
    pub fn tick(&mut self, delta: f32, keys: &HeldKeys) {
        if self.status == RaceStatus::Finished {
            return;
        }
        if self.status == RaceStatus::Running {
            self.elapsed_time += delta.max(0.0);
        }

        self.control(keys);

        let track = self.config.track;
        let radius = self.config.racer_radius;
        for racer in self.racers.iter_mut().filter(|r| !r.is_finished()) {
            integrate(racer, &track, radius);
        }

        if self.status == RaceStatus::Running {
            self.collect_pickups();
            self.detect_arrivals();

            if self.finished_count() == self.racers.len() {
                self.status = RaceStatus::Finished;
                info!("Race finished: {}", podium_line(&self.standings()));
            }
        }
    }

    /// Run exactly one controller per racer
    fn control(&mut self, keys: &HeldKeys) {
        let config = &self.config;
        let mut throttle = false;

        // Steering alone leaves an Idle grid untouched
        let mut player_keys = *keys;
        if self.status == RaceStatus::Idle && !keys.is_held(Key::Up) && !keys.is_held(Key::Down) {
            player_keys.release(Key::Left);
            player_keys.release(Key::Right);
        }

        for racer in self.racers.iter_mut() {
            match racer.pilot {
                Pilot::Human => {
                    throttle |= driver::drive(racer, &player_keys, &config.track, &config.handling, config.racer_radius);
                }
                Pilot::Autopilot => {
                    if self.status != RaceStatus::Running {
                        continue;
                    }
                    let goal = autopilot::target(racer, &config.track, &config.finish_zone, &self.pickups);
                    autopilot::drive(
                        racer,
                        goal,
                        &config.track,
                        &config.finish_zone,
                        &config.autopilot,
                        config.handling.reverse_factor,
                        config.racer_radius,
                    );
                }
            }
        }

        if throttle && self.status == RaceStatus::Idle {
            self.status = RaceStatus::Running;
            info!("Race started");
        }
    }

    /// First racer in creation order to reach a pickup takes it
    fn collect_pickups(&mut self) {
        let Some(layout) = self.config.pickups else {
            return;
        };

        for racer in self.racers.iter_mut().filter(|r| !r.is_finished()) {
            for pickup in self.pickups.iter_mut().filter(|p| !p.collected) {
                if distance(racer.position, pickup.position) <= layout.radius {
                    pickup.collected = true;
                    pickup.collected_by = Some(racer.id);
                    racer.pickups += 1;
                    debug!("{} collected pickup {} ({} total)", racer.name, pickup.id, racer.pickups);
                }
            }
        }
    }

    fn detect_arrivals(&mut self) {
        let zone = self.config.finish_zone;
        let threshold = self.config.finish_speed;

        for racer in self.racers.iter_mut().filter(|r| !r.is_finished()) {
            if zone.contains(racer.position) && racer.speed.abs() < threshold {
                self.finish_order.push(racer.id);
                let rank = self.finish_order.len() as u32;
                racer.mark_finished(self.elapsed_time, rank);
                info!("{} arrived #{} at {:.2}s", racer.name, rank, self.elapsed_time);
            }
        }
    }

    /// Finished racers in ranking order.
    ///
    /// Arena ranks by recorded time, ties keeping creation order. Corridor
    /// ranks by arrival order.
    pub fn standings(&self) -> Vec<RaceResult> {
        let finished: Vec<&RacerState> = match self.mode() {
            RaceMode::Arena => {
                let mut by_time: Vec<&RacerState> = self.racers.iter().filter(|r| r.is_finished()).collect();
                by_time.sort_by(|a, b| a.finish_time.unwrap_or(f32::MAX).total_cmp(&b.finish_time.unwrap_or(f32::MAX)));
                by_time
            }
            RaceMode::Corridor => self
                .finish_order
                .iter()
                .filter_map(|id| self.racers.iter().find(|r| r.id == *id))
                .collect(),
        };

        finished
            .into_iter()
            .enumerate()
            .map(|(i, racer)| RaceResult {
                racer_id: racer.id,
                racer_name: racer.name.clone(),
                finish_time: racer.finish_time.unwrap_or(0.0),
                position: i as u32 + 1,
                pickups: racer.pickups,
            })
            .collect()
    }

    /// Get compact snapshot for IPC transfer
    pub fn get_snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            mode: self.mode(),
            track: self.config.track,
            finish_zone: self.config.finish_zone,
            status: self.status,
            elapsed_time: self.elapsed_time,
            racers: self.racers.iter().map(RacerSnapshot::from).collect(),
            pickups: self.pickups.iter().map(PickupSnapshot::from).collect(),
            finisher_count: self.finish_order.len() as u32,
        }
    }

    /// Current leader: best-ranked finisher, else the racer closest to the finish
    pub fn get_leader(&self) -> Option<&RacerState> {
        if let Some(first) = self.standings().first() {
            return self.get_racer(first.racer_id);
        }
        let goal = self.config.finish_zone.center;
        self.racers
            .iter()
            .min_by(|a, b| distance(a.position, goal).total_cmp(&distance(b.position, goal)))
    }

    /// Get racer by ID
    pub fn get_racer(&self, id: u32) -> Option<&RacerState> {
        self.racers.iter().find(|r| r.id == id)
    }
}

/// Integration and boundary policy for one racer
fn integrate(racer: &mut RacerState, track: &TrackShape, radius: f32) {
    match track {
        TrackShape::Arena(arena) => {
            racer.position.x += racer.heading.cos() * racer.speed;
            racer.position.y += racer.heading.sin() * racer.speed;
            racer.position = arena.confine(racer.position, radius);
        }
        TrackShape::Corridor(corridor) => {
            racer.position.y = corridor.confine_y(racer.position.y - racer.speed);
            // Shoulders slow the racer down instead of stopping it
            racer.flags.off_road = corridor.is_off_road(racer.position.x);
            if racer.flags.off_road {
                racer.speed *= OFF_ROAD_PENALTY;
            }
        }
    }
}

/// Speed multiplier per tick spent on the shoulder
const OFF_ROAD_PENALTY: f32 = 0.92;

/// "Leo (12.3s), Lilla (14.0s), ..."
pub fn podium_line(results: &[RaceResult]) -> String {
    results
        .iter()
        .map(|r| format!("{} ({:.1}s)", r.racer_name, r.finish_time))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compact pickup state for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl From<&Pickup> for PickupSnapshot {
    fn from(pickup: &Pickup) -> Self {
        let Point { x, y } = pickup.position;
        Self { id: pickup.id, x, y, collected: pickup.collected }
    }
}

/// Compact race snapshot for network/IPC transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub mode: RaceMode,
    pub track: TrackShape,
    pub finish_zone: FinishZone,
    pub status: RaceStatus,
    pub elapsed_time: f32,
    pub racers: Vec<RacerSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
    pub finisher_count: u32,
}
