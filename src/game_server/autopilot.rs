//! Autopilot - Steering heuristic for the non-human racers
//!
//! The autopilot never looks at the keyboard. In the arena it homes on the
//! finish zone; in the corridor it chases the next pickup still ahead and
//! falls back to the finish line once none are left.

use crate::game_server::config::AutopilotTuning;
use crate::game_server::geometry::{angle_difference, clamp, distance, Point};
use crate::game_server::racer::RacerState;
use crate::game_server::track::{FinishZone, Pickup, TrackShape};

/// Point the racer is currently steering for
pub fn target(racer: &RacerState, track: &TrackShape, finish: &FinishZone, pickups: &[Pickup]) -> Point {
    match track {
        TrackShape::Arena(_) => finish.center,
        TrackShape::Corridor(_) => pickups
            .iter()
            .find(|p| !p.collected && p.position.y <= racer.position.y)
            .map(|p| p.position)
            .unwrap_or(finish.center),
    }
}

/// Apply one tick of autonomous control toward `goal`
pub fn drive(
    racer: &mut RacerState,
    goal: Point,
    track: &TrackShape,
    finish: &FinishZone,
    tuning: &AutopilotTuning,
    reverse_factor: f32,
    racer_radius: f32,
) {
    if racer.is_finished() {
        return;
    }

    match track {
        TrackShape::Arena(_) => {
            let diff = angle_difference(racer.position.bearing_to(goal), racer.heading);
            racer.heading += clamp(diff, -racer.params.turn, racer.params.turn);
        }
        TrackShape::Corridor(corridor) => {
            let step = clamp(goal.x - racer.position.x, -tuning.lateral_step, tuning.lateral_step);
            let (min_x, max_x) = corridor.lateral_bounds(racer_radius);
            racer.position.x = clamp(racer.position.x + step, min_x, max_x);
        }
    }

    let target_speed = if distance(racer.position, finish.center) < tuning.approach_radius {
        tuning.approach_speed
    } else {
        racer.params.max_speed * tuning.cruise_factor
    };

    if racer.speed < target_speed {
        racer.speed += racer.params.accel * tuning.accel_factor;
    } else {
        racer.speed *= tuning.decay;
    }
    racer.clamp_speed(reverse_factor);
}
