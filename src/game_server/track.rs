//! Track - Static race geometry, the finish zone and pickup layouts
//!
//! A track is either a walled rectangular arena or a vertical corridor
//! driven toward decreasing y. Tracks never change once a session is built.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game_server::geometry::{clamp, distance, Point};

/// Which of the two race variants a track describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceMode {
    Arena,
    Corridor,
}

/// Rectangular arena with free 2D movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaTrack {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Inset of the dashed inner line (drawn only)
    pub inner_inset: f32,
}

impl ArenaTrack {
    /// Clamp a racer body of `radius` so it stays fully inside the walls
    pub fn confine(&self, position: Point, radius: f32) -> Point {
        Point {
            x: clamp(position.x, self.x + radius, self.x + self.width - radius),
            y: clamp(position.y, self.y + radius, self.y + self.height - radius),
        }
    }

    pub fn contains(&self, position: Point) -> bool {
        position.x >= self.x
            && position.x <= self.x + self.width
            && position.y >= self.y
            && position.y <= self.y + self.height
    }
}

/// Vertical corridor traversed from `start_y` toward `end_y` (`end_y < start_y`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorTrack {
    pub center_x: f32,
    /// Paved width; leaving it costs speed every tick
    pub road_width: f32,
    /// Full lateral extent including the shoulders
    pub track_width: f32,
    pub start_y: f32,
    pub end_y: f32,
}

impl CorridorTrack {
    /// Lateral range a racer body of `radius` may occupy
    pub fn lateral_bounds(&self, radius: f32) -> (f32, f32) {
        let half = self.track_width / 2.0 - radius;
        (self.center_x - half, self.center_x + half)
    }

    /// Past either edge of the paved road
    pub fn is_off_road(&self, x: f32) -> bool {
        (x - self.center_x).abs() > self.road_width / 2.0
    }

    /// Keep `y` between the finish end and the start line
    pub fn confine_y(&self, y: f32) -> f32 {
        clamp(y, self.end_y, self.start_y)
    }

    pub fn contains(&self, position: Point) -> bool {
        (position.x - self.center_x).abs() <= self.track_width / 2.0
            && position.y >= self.end_y
            && position.y <= self.start_y
    }
}

/// Track geometry selecting the race variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TrackShape {
    Arena(ArenaTrack),
    Corridor(CorridorTrack),
}

impl TrackShape {
    pub fn mode(&self) -> RaceMode {
        match self {
            TrackShape::Arena(_) => RaceMode::Arena,
            TrackShape::Corridor(_) => RaceMode::Corridor,
        }
    }

    pub fn contains(&self, position: Point) -> bool {
        match self {
            TrackShape::Arena(arena) => arena.contains(position),
            TrackShape::Corridor(corridor) => corridor.contains(position),
        }
    }
}

/// Circular arrival region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishZone {
    pub center: Point,
    pub radius: f32,
}

impl FinishZone {
    /// Inclusive of the boundary circle
    pub fn contains(&self, position: Point) -> bool {
        distance(position, self.center) <= self.radius
    }
}

/// A collectible item. Once collected it stays collected until the
/// layout is rebuilt by a reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub position: Point,
    pub collected: bool,
    /// Racer that took it
    pub collected_by: Option<u32>,
}

/// Procedural pickup layout: evenly spaced rows between `start_y` and
/// `end_y`, one pickup per row, each in a randomly chosen lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickupLayout {
    pub count: u32,
    pub start_y: f32,
    pub end_y: f32,
    pub lanes: u32,
    pub lane_spacing: f32,
    pub center_x: f32,
    /// Collection radius around a racer
    pub radius: f32,
}

impl PickupLayout {
    /// X coordinate of lane `lane` (0-based, left to right)
    pub fn lane_x(&self, lane: u32) -> f32 {
        let offset = lane as f32 - (self.lanes.saturating_sub(1)) as f32 / 2.0;
        self.center_x + offset * self.lane_spacing
    }

    /// Build the pickups in track order (first to be reached first)
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<Pickup> {
        let step = if self.count > 1 {
            (self.start_y - self.end_y) / (self.count - 1) as f32
        } else {
            0.0
        };

        (0..self.count)
            .map(|i| {
                let lane = rng.gen_range(0..self.lanes.max(1));
                Pickup {
                    id: i,
                    position: Point::new(self.lane_x(lane), self.start_y - i as f32 * step),
                    collected: false,
                    collected_by: None,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layout() -> PickupLayout {
        PickupLayout {
            count: 22,
            start_y: 2200.0,
            end_y: -200.0,
            lanes: 3,
            lane_spacing: 90.0,
            center_x: 480.0,
            radius: 28.0,
        }
    }

    #[test]
    fn layout_spans_requested_range_in_lanes() {
        let pickups = layout().generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(pickups.len(), 22);
        assert!((pickups[0].position.y - 2200.0).abs() < 1e-3);
        assert!((pickups[21].position.y + 200.0).abs() < 1e-3);

        let lanes = [390.0, 480.0, 570.0];
        for pair in pickups.windows(2) {
            assert!(pair[0].position.y > pair[1].position.y);
        }
        for pickup in &pickups {
            assert!(lanes.contains(&pickup.position.x), "x {}", pickup.position.x);
            assert!(!pickup.collected);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = layout().generate(&mut StdRng::seed_from_u64(99));
        let b = layout().generate(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn arena_confine_keeps_body_inside() {
        let arena = ArenaTrack { x: 60.0, y: 60.0, width: 840.0, height: 520.0, inner_inset: 22.0 };
        let p = arena.confine(Point::new(-50.0, 9000.0), 25.0);
        assert_eq!(p, Point::new(85.0, 555.0));
    }

    #[test]
    fn corridor_shoulder_is_off_road() {
        let corridor = CorridorTrack {
            center_x: 480.0,
            road_width: 300.0,
            track_width: 480.0,
            start_y: 2400.0,
            end_y: -400.0,
        };
        assert!(!corridor.is_off_road(480.0 + 150.0));
        assert!(corridor.is_off_road(480.0 + 151.0));
        assert_eq!(corridor.lateral_bounds(22.0), (262.0, 698.0));
    }

    #[test]
    fn finish_zone_boundary_is_inclusive() {
        let zone = FinishZone { center: Point::new(0.0, 0.0), radius: 48.0 };
        assert!(zone.contains(Point::new(48.0, 0.0)));
        assert!(!zone.contains(Point::new(48.1, 0.0)));
    }
}
