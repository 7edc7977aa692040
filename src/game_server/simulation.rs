//! Simulation - Host-facing game server
//!
//! Turns host frames (a timestamp plus whatever keys are held) into race
//! ticks and hands read-only snapshots back to the renderer and HUD.

use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::game_server::config::RaceConfig;
use crate::game_server::error::ConfigError;
use crate::game_server::input::{HeldKeys, Key};
use crate::game_server::race::{podium_line, RaceResult, RaceSession, RaceSnapshot, RaceStatus};

/// Coarse state for the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// No race configured
    Idle,
    /// Waiting on the starting line
    Ready,
    Racing,
    Results,
}

/// Server statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStats {
    pub frame_count: u64,
    pub avg_tick_time_ms: f32,
    pub racer_count: u32,
    pub game_state: GameState,
}

/// Scalars the HUD shows every frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Absolute speed of the human racer
    pub player_speed: f32,
    pub elapsed_time: f32,
    pub pickup_counts: Vec<(String, u32)>,
    pub status_message: String,
}

/// Main game server
pub struct GameServer {
    /// Active race (if any)
    race: Option<RaceSession>,
    keys: HeldKeys,
    /// Host timestamp of the previous frame (milliseconds)
    last_timestamp: Option<f64>,
    frame_count: u64,
    /// Recent tick durations for averaging
    tick_times: Vec<f32>,
}

impl GameServer {
    /// Create a new game server
    pub fn new() -> Self {
        Self {
            race: None,
            keys: HeldKeys::none(),
            last_timestamp: None,
            frame_count: 0,
            tick_times: Vec::with_capacity(60),
        }
    }

    /// Build a fresh session from `config`
    pub fn init_race(&mut self, config: RaceConfig) -> Result<(), ConfigError> {
        let race = RaceSession::new(config)?;
        self.race = Some(race);
        self.keys = HeldKeys::none();
        self.last_timestamp = None;
        self.frame_count = 0;
        self.tick_times.clear();
        Ok(())
    }

    /// Mark `key` as held until the matching `key_up`
    pub fn key_down(&mut self, key: Key) {
        self.keys.press(key);
    }

    /// Release a held key
    pub fn key_up(&mut self, key: Key) {
        self.keys.release(key);
    }

    /// Key events arrive as browser key names
    pub fn key_event(&mut self, name: &str, pressed: bool) {
        match name.parse::<Key>() {
            Ok(key) if pressed => self.key_down(key),
            Ok(key) => self.key_up(key),
            Err(e) => warn!("Ignoring key event: {}", e),
        }
    }

    /// Keys the next tick will sample
    pub fn held_keys(&self) -> HeldKeys {
        self.keys
    }

    /// Seconds since the previous frame; the first frame counts as zero
    fn frame_delta(&mut self, timestamp_ms: f64) -> f32 {
        let delta = match self.last_timestamp {
            None => 0.0,
            Some(last) if timestamp_ms < last => {
                warn!("Host timestamp went backwards ({} < {})", timestamp_ms, last);
                0.0
            }
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
        };
        self.last_timestamp = Some(timestamp_ms);
        delta
    }

    /// Run one frame at host time `timestamp_ms`
    pub fn tick(&mut self, timestamp_ms: f64) -> Option<RaceSnapshot> {
        let delta = self.frame_delta(timestamp_ms);
        let tick_start = Instant::now();

        let keys = self.keys;
        if let Some(race) = &mut self.race {
            // A reset frame only restores the grid
            if keys.is_held(Key::Reset) {
                race.reset();
            } else {
                race.tick(delta, &keys);
            }
        }
        self.frame_count += 1;

        let tick_time = tick_start.elapsed().as_secs_f32() * 1000.0;
        self.tick_times.push(tick_time);
        if self.tick_times.len() > 60 {
            self.tick_times.remove(0);
        }

        self.get_snapshot()
    }

    /// Get current race snapshot
    pub fn get_snapshot(&self) -> Option<RaceSnapshot> {
        self.race.as_ref().map(|r| r.get_snapshot())
    }

    /// Get race results
    pub fn get_results(&self) -> Option<Vec<RaceResult>> {
        self.race.as_ref().map(|r| r.standings())
    }

    /// Get HUD scalars for the current race
    pub fn get_hud(&self) -> Option<HudSnapshot> {
        let race = self.race.as_ref()?;
        Some(HudSnapshot {
            player_speed: race.player().map(|p| p.speed.abs()).unwrap_or(0.0),
            elapsed_time: race.elapsed_time,
            pickup_counts: race.racers.iter().map(|r| (r.name.clone(), r.pickups)).collect(),
            status_message: status_message(race),
        })
    }

    /// Get server statistics
    pub fn get_stats(&self) -> ServerStats {
        let avg_tick_time = if self.tick_times.is_empty() {
            0.0
        } else {
            self.tick_times.iter().sum::<f32>() / self.tick_times.len() as f32
        };

        ServerStats {
            frame_count: self.frame_count,
            avg_tick_time_ms: avg_tick_time,
            racer_count: self.race.as_ref().map(|r| r.racers.len() as u32).unwrap_or(0),
            game_state: self.get_state(),
        }
    }

    /// Get current game state
    pub fn get_state(&self) -> GameState {
        match self.race.as_ref().map(|r| r.status) {
            None => GameState::Idle,
            Some(RaceStatus::Idle) => GameState::Ready,
            Some(RaceStatus::Running) => GameState::Racing,
            Some(RaceStatus::Finished) => GameState::Results,
        }
    }

    /// Active race session, if one has been built
    pub fn race(&self) -> Option<&RaceSession> {
        self.race.as_ref()
    }

    /// Put the current race back on the starting line
    pub fn reset(&mut self) {
        if let Some(race) = &mut self.race {
            race.reset();
        }
        self.keys = HeldKeys::none();
    }
}

impl Default for GameServer {
    fn default() -> Self {
        Self::new()
    }
}

/// HUD status line for the current session
pub fn status_message(race: &RaceSession) -> String {
    match race.status {
        RaceStatus::Idle => "Ready. Press UP to start.".to_string(),
        RaceStatus::Running => "Drive and stop inside the finish zone!".to_string(),
        RaceStatus::Finished => format!(
            "Finished! Podium: {}. Press R to try again.",
            podium_line(&race.standings())
        ),
    }
}
