use dog_derby_lib::game_server::geometry::{angle_difference, distance, Point};
use dog_derby_lib::{
    GameServer, HeldKeys, Key, RaceConfig, RaceMode, RaceSession, RaceStatus, RacerState, TrackShape,
};

const DT: f32 = 1.0 / 60.0;

fn solo(mut config: RaceConfig, start: Point, heading: f32) -> RaceConfig {
    config.racers.truncate(1);
    config.racers[0].start = start;
    config.racers[0].heading = heading;
    config.seed = Some(5);
    config
}

/// Steer at `goal` and crawl below `crawl` speed
fn homing_keys(racer: &RacerState, goal: Point, crawl: f32) -> HeldKeys {
    let mut keys = HeldKeys::none();
    let diff = angle_difference(racer.position.bearing_to(goal), racer.heading);
    if diff < -0.02 {
        keys.press(Key::Left);
    } else if diff > 0.02 {
        keys.press(Key::Right);
    }
    if racer.speed < crawl {
        keys.press(Key::Up);
    }
    keys
}

#[test]
fn arena_arrival_records_elapsed_seconds() {
    let zone = RaceConfig::arena().finish_zone;
    let start = Point::new(zone.center.x, zone.center.y + 200.0);
    let config = solo(RaceConfig::arena(), start, -std::f32::consts::FRAC_PI_2);

    let mut server = GameServer::new();
    server.init_race(config).unwrap();

    let mut frames = 0u32;
    while frames < 2_000 {
        let speed = server.race().unwrap().racers[0].speed;
        if speed < 0.7 {
            server.key_down(Key::Up);
        } else {
            server.key_up(Key::Up);
        }
        server.tick(frames as f64 * 16.0);
        frames += 1;
        if server.race().unwrap().racers[0].is_finished() {
            break;
        }
    }

    let race = server.race().unwrap();
    let racer = &race.racers[0];
    assert!(racer.is_finished(), "never arrived");
    assert_eq!(race.status, RaceStatus::Finished);
    assert!(distance(racer.position, zone.center) <= zone.radius);
    assert_eq!(racer.speed, 0.0);

    // Frame 0 has no previous timestamp and also starts the race
    let expected = (frames - 1) as f32 * 0.016;
    let time = racer.finish_time.unwrap();
    assert!((time - expected).abs() < 1e-3, "time {time} expected {expected}");
    assert_eq!(time, race.elapsed_time);
}

#[test]
fn corridor_lane_collects_only_its_pickups() {
    let lane_x = RaceConfig::corridor().pickups.unwrap().lane_x(0);
    let config = solo(RaceConfig::corridor(), Point::new(lane_x, 2400.0), 0.0);
    let mut session = RaceSession::new(config).unwrap();

    assert_eq!(session.pickups.len(), 22);
    let in_lane = session.pickups.iter().filter(|p| p.position.x == lane_x).count() as u32;

    let up = HeldKeys::none().with(Key::Up);
    for _ in 0..3_000 {
        session.tick(DT, &up);
        if session.racers[0].position.y < -240.0 {
            break;
        }
    }

    assert!(session.racers[0].position.y < -240.0);
    assert_eq!(session.racers[0].position.x, lane_x);
    assert_eq!(session.racers[0].pickups, in_lane);
    for pickup in &session.pickups {
        assert_eq!(pickup.collected, pickup.position.x == lane_x, "pickup {}", pickup.id);
    }
}

#[test]
fn coasting_decays_without_going_negative() {
    let mut config = RaceConfig::arena();
    config.seed = Some(1);
    let mut session = RaceSession::new(config).unwrap();

    let up = HeldKeys::none().with(Key::Up);
    for _ in 0..30 {
        session.tick(DT, &up);
    }

    let mut previous = session.racers[0].speed;
    assert!(previous > 1.0);
    for _ in 0..100 {
        session.tick(DT, &HeldKeys::none());
        let speed = session.racers[0].speed;
        assert!(speed < previous);
        assert!(speed > 0.0);
        assert!((speed / previous - 0.97 * 0.995).abs() < 1e-4);
        previous = speed;
    }
}

#[test]
fn reset_is_idempotent() {
    let mut config = RaceConfig::corridor();
    config.seed = Some(11);
    let fresh = RaceSession::new(config.clone()).unwrap();
    let mut session = RaceSession::new(config).unwrap();

    let keys = HeldKeys::none().with(Key::Up);
    for _ in 0..400 {
        session.tick(DT, &keys);
    }
    assert_eq!(session.status, RaceStatus::Running);
    assert!(session.pickups.iter().any(|p| p.collected));

    session.reset();
    let once = (session.racers.clone(), session.pickups.clone(), session.elapsed_time, session.status);
    session.reset();
    let twice = (session.racers.clone(), session.pickups.clone(), session.elapsed_time, session.status);

    assert_eq!(once, twice);
    assert_eq!(once.0, fresh.racers);
    assert_eq!(once.1, fresh.pickups);
    assert_eq!(once.3, RaceStatus::Idle);
    assert!(session.finish_order.is_empty());
}

#[test]
fn full_arena_race_finishes_and_ranks_by_time() {
    let mut config = RaceConfig::arena();
    config.seed = Some(3);
    let goal = config.finish_zone.center;
    let mut session = RaceSession::new(config).unwrap();

    for _ in 0..20_000 {
        let keys = homing_keys(&session.racers[0], goal, 0.7);
        session.tick(DT, &keys);
        if session.status == RaceStatus::Finished {
            break;
        }
    }

    assert_eq!(session.status, RaceStatus::Finished);
    assert_eq!(session.finished_count(), 3);
    let standings = session.standings();
    assert_eq!(standings.len(), 3);
    assert!(standings.windows(2).all(|w| w[0].finish_time <= w[1].finish_time));
    assert_eq!(standings.iter().map(|r| r.position).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn full_corridor_race_ranks_by_arrival() {
    let mut config = RaceConfig::corridor();
    config.seed = Some(8);
    let center_x = match config.track {
        TrackShape::Corridor(corridor) => corridor.center_x,
        TrackShape::Arena(_) => unreachable!(),
    };
    let mut session = RaceSession::new(config).unwrap();
    assert_eq!(session.mode(), RaceMode::Corridor);

    for _ in 0..20_000 {
        let player = &session.racers[0];
        let mut keys = HeldKeys::none();
        if player.position.x < center_x - 2.0 {
            keys.press(Key::Right);
        } else if player.position.x > center_x + 2.0 {
            keys.press(Key::Left);
        }
        if player.position.y > -100.0 || player.speed < 0.6 {
            keys.press(Key::Up);
        }
        session.tick(DT, &keys);
        if session.status == RaceStatus::Finished {
            break;
        }
    }

    assert_eq!(session.status, RaceStatus::Finished);
    let standings = session.standings();
    let arrival: Vec<u32> = session.finish_order.clone();
    assert_eq!(standings.iter().map(|r| r.racer_id).collect::<Vec<_>>(), arrival);
    for result in &standings {
        let racer = session.get_racer(result.racer_id).unwrap();
        assert_eq!(racer.finish_rank, Some(result.position));
    }

    let collected = session.pickups.iter().filter(|p| p.collected).count() as u32;
    let awarded: u32 = session.racers.iter().map(|r| r.pickups).sum();
    assert_eq!(collected, awarded);
}
