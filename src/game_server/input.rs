//! Input - Held-key state sampled at tick boundaries

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Keys the core reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Reset,
}

/// Browser `KeyboardEvent.key` names (plus our own snake_case names)
impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowUp" | "up" => Ok(Key::Up),
            "ArrowDown" | "down" => Ok(Key::Down),
            "ArrowLeft" | "left" => Ok(Key::Left),
            "ArrowRight" | "right" => Ok(Key::Right),
            "r" | "R" | "reset" => Ok(Key::Reset),
            other => Err(format!("unknown key: {other}")),
        }
    }
}

/// Set of currently held keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub reset: bool,
}

impl HeldKeys {
    /// Nothing held
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder-style helper used by hosts and tests
    pub fn with(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    /// Mark `key` as held
    pub fn press(&mut self, key: Key) {
        *self.slot(key) = true;
    }

    /// Mark `key` as released
    pub fn release(&mut self, key: Key) {
        *self.slot(key) = false;
    }

    /// Whether `key` is currently held
    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Reset => self.reset,
        }
    }

    fn slot(&mut self, key: Key) -> &mut bool {
        match key {
            Key::Up => &mut self.up,
            Key::Down => &mut self.down,
            Key::Left => &mut self.left,
            Key::Right => &mut self.right,
            Key::Reset => &mut self.reset,
        }
    }
}
