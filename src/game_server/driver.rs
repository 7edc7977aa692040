//! Driver - Maps held keys onto the human racer
//!
//! Arena mode turns the heading; corridor mode slides the racer sideways.

use crate::game_server::config::Handling;
use crate::game_server::geometry::clamp;
use crate::game_server::input::{HeldKeys, Key};
use crate::game_server::racer::RacerState;
use crate::game_server::track::TrackShape;

/// Apply one tick of keyboard control.
///
/// Returns `true` when Up or Down was held, which is what starts the race.
pub fn drive(
    racer: &mut RacerState,
    keys: &HeldKeys,
    track: &TrackShape,
    handling: &Handling,
    racer_radius: f32,
) -> bool {
    if racer.is_finished() {
        return false;
    }

    let throttle = keys.is_held(Key::Up) || keys.is_held(Key::Down);
    if keys.is_held(Key::Up) {
        racer.speed = (racer.speed + racer.params.accel).min(racer.params.max_speed);
    } else if keys.is_held(Key::Down) {
        let braked = racer.speed - racer.params.accel * handling.decel_factor;
        racer.speed = braked.max(racer.min_speed(handling.reverse_factor));
    } else {
        racer.speed *= handling.drag;
    }

    match track {
        TrackShape::Arena(_) => {
            // Reversing steers the other way
            let steer = if racer.speed >= 0.0 { 1.0 } else { -1.0 };
            if keys.is_held(Key::Left) {
                racer.heading -= racer.params.turn * steer;
            }
            if keys.is_held(Key::Right) {
                racer.heading += racer.params.turn * steer;
            }
        }
        TrackShape::Corridor(corridor) => {
            if keys.is_held(Key::Left) {
                racer.position.x -= handling.lateral_step;
            }
            if keys.is_held(Key::Right) {
                racer.position.x += handling.lateral_step;
            }
            let (min_x, max_x) = corridor.lateral_bounds(racer_radius);
            racer.position.x = clamp(racer.position.x, min_x, max_x);
        }
    }

    racer.speed *= handling.rolling_drag;
    racer.clamp_speed(handling.reverse_factor);
    throttle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_server::config::RaceConfig;

    fn arena_player() -> (RacerState, RaceConfig) {
        let config = RaceConfig::arena();
        (RacerState::new(0, &config.racers[0]), config)
    }

    fn corridor_player() -> (RacerState, RaceConfig) {
        let config = RaceConfig::corridor();
        (RacerState::new(0, &config.racers[0]), config)
    }

    #[test]
    fn up_accelerates_and_reports_throttle() {
        let (mut racer, config) = arena_player();
        let keys = HeldKeys::none().with(Key::Up);
        assert!(drive(&mut racer, &keys, &config.track, &config.handling, config.racer_radius));
        assert!((racer.speed - 0.12 * 0.995).abs() < 1e-6);
    }

    #[test]
    fn steering_only_does_not_start() {
        let (mut racer, config) = arena_player();
        let keys = HeldKeys::none().with(Key::Left);
        assert!(!drive(&mut racer, &keys, &config.track, &config.handling, config.racer_radius));
        assert!(racer.heading < config.racers[0].heading);
    }

    #[test]
    fn reverse_is_capped_at_half_max_speed() {
        let (mut racer, config) = arena_player();
        let keys = HeldKeys::none().with(Key::Down);
        for _ in 0..200 {
            drive(&mut racer, &keys, &config.track, &config.handling, config.racer_radius);
        }
        assert!(racer.speed < 0.0);
        assert!(racer.speed >= -2.25);
    }

    #[test]
    fn reversing_inverts_steering() {
        let (mut racer, config) = arena_player();
        racer.speed = -1.0;
        let before = racer.heading;
        let keys = HeldKeys::none().with(Key::Left);
        drive(&mut racer, &keys, &config.track, &config.handling, config.racer_radius);
        assert!(racer.heading > before);
    }

    #[test]
    fn corridor_forbids_reverse_and_clamps_sideways() {
        let (mut racer, config) = corridor_player();
        let keys = HeldKeys::none().with(Key::Down).with(Key::Left);
        for _ in 0..500 {
            drive(&mut racer, &keys, &config.track, &config.handling, config.racer_radius);
        }
        assert_eq!(racer.speed, 0.0);
        match config.track {
            TrackShape::Corridor(corridor) => {
                let (min_x, _) = corridor.lateral_bounds(config.racer_radius);
                assert_eq!(racer.position.x, min_x);
            }
            TrackShape::Arena(_) => unreachable!(),
        }
    }

    #[test]
    fn finished_racer_ignores_keys() {
        let (mut racer, config) = arena_player();
        racer.mark_finished(1.0, 1);
        let before = racer.clone();
        let keys = HeldKeys::none().with(Key::Up).with(Key::Right);
        assert!(!drive(&mut racer, &keys, &config.track, &config.handling, config.racer_radius));
        assert_eq!(racer, before);
    }
}
