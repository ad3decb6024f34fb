//! End-to-end flight tests: whole runs through the engine, from initial
//! state to touchdown classification.

use lunarpilot_core::prelude::*;
use lunarpilot_logic::constants::{CRASH_VELOCITY_LIMIT, FUEL_CAPACITY, GRAVITY};
use lunarpilot_logic::geometry::{Line, Point};
use lunarpilot_logic::terrain;
use serde_json::{json, Value};

/// Flat ground at y = 0 spanning x 0..=1000.
fn flat() -> Line {
    (0..=100)
        .map(|i| Point::new(i as f64 * 10.0, 0.0))
        .collect()
}

fn coast(_args: AutopilotArgs<'_>) -> Value {
    json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": {} })
}

#[test]
fn free_fall_from_altitude_is_a_crash() {
    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, 500.0)),
        coast as fn(AutopilotArgs<'_>) -> Value,
        SimConfig::default(),
        flat(),
    )
    .unwrap();

    assert_eq!(sim.run(), Outcome::Crashed);
    let last = *sim.history().last().unwrap();
    assert!(last.speed() > CRASH_VELOCITY_LIMIT);
    assert!(last.lin_vel.y < 0.0);
}

#[test]
fn short_drop_is_a_landing() {
    // Barely above the ground: touchdown speed stays well under the limit
    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, 14.6)),
        coast as fn(AutopilotArgs<'_>) -> Value,
        SimConfig::default(),
        flat(),
    )
    .unwrap();

    assert_eq!(sim.run(), Outcome::Landed);
    assert!(sim.history().last().unwrap().speed() < CRASH_VELOCITY_LIMIT);
}

#[test]
fn hover_burns_the_tank_dry_then_falls() {
    // Thrust balancing gravity at static mass holds altitude until the
    // fuel runs out, after which the engine cuts and the lander drops.
    let hover = |_args: AutopilotArgs<'_>| {
        json!({
            "rotThrust": 0.0,
            "aftThrust": GRAVITY * 20.0,
            "userStore": {},
        })
    };
    let config = SimConfig {
        enable_fuel: true,
        ..SimConfig::default()
    };
    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, 400.0)),
        hover,
        config,
        flat(),
    )
    .unwrap();

    let outcome = sim.run_for(100_000).expect("run should reach the ground");
    assert_eq!(outcome, Outcome::Crashed);

    let last = *sim.history().last().unwrap();
    assert_eq!(last.fuel_level, 0.0);
    assert_eq!(last.aft_thrust, 0.0);

    // It held altitude for a while before the tank emptied
    let burn_per_tick = GRAVITY * 20.0 * 0.05;
    let hover_ticks = (FUEL_CAPACITY / burn_per_tick) as usize;
    let held = sim.history()[hover_ticks / 2];
    assert!((held.pos.y - 400.0).abs() < 1.0);
}

#[test]
fn panicking_autopilot_still_reaches_the_ground() {
    let hostile = |_args: AutopilotArgs<'_>| -> Value { panic!("autopilot bug") };
    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, 300.0)),
        hostile,
        SimConfig::default(),
        flat(),
    )
    .unwrap();

    assert_eq!(sim.run(), Outcome::Crashed);
    assert!(matches!(sim.last_fault(), Some(Fault::Panicked(_))));
    // Rejected commands leave the thrusters off
    assert_eq!(sim.history().last().unwrap().aft_thrust, 0.0);
}

#[test]
fn logs_and_plots_are_rate_limited_through_a_run() {
    let chatty = |args: AutopilotArgs<'_>| {
        args.log.log("tick".to_string());
        let mut sample = UserStore::new();
        sample.insert("altitude".into(), json!(args.altitude));
        args.plot.plot(sample);
        json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": {} })
    };
    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, 300.0)),
        chatty,
        SimConfig::default(),
        flat(),
    )
    .unwrap();
    sim.run_for(25);

    // Default interval of 10 keeps calls 0, 10 and 20
    let indices: Vec<u64> = sim.logs().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 10, 20]);

    assert_eq!(sim.plots().len(), 3);
    for sample in sim.plots() {
        assert!(sample.contains_key("time"));
        assert!(sample.contains_key("altitude"));
    }
}

#[test]
fn generated_terrain_supports_a_full_run() {
    let mut rng = terrain::seeded_rng("integration");
    let ground = terrain::gen_ground(
        &mut rng,
        Point::new(0.0, 50.0),
        Point::new(1000.0, 50.0),
        1000,
        100.0,
        5.0,
    );
    let ceiling = ground.iter().fold(f64::MIN, |m, p| m.max(p.y));

    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, ceiling + 300.0)),
        coast as fn(AutopilotArgs<'_>) -> Value,
        SimConfig::default(),
        ground,
    )
    .unwrap();

    assert_eq!(sim.run(), Outcome::Crashed);
    assert!(sim.history().len() > 10);
}

#[test]
fn slower_control_rate_holds_commands_between_control_ticks() {
    // Thrust only on the first control tick; the command must persist for
    // every physics tick of that control window.
    let once = |args: AutopilotArgs<'_>| {
        if args.user_store.is_empty() {
            json!({ "rotThrust": 0.0, "aftThrust": 1.0, "userStore": { "fired": true } })
        } else {
            json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": args.user_store })
        }
    };
    let config = SimConfig {
        physics_hz: 60.0,
        control_hz: 10.0,
        ..SimConfig::default()
    };
    let mut sim = LanderSim::new(
        LanderState::at_rest(Point::new(500.0, 500.0)),
        once,
        config,
        flat(),
    )
    .unwrap();
    sim.run_for(6);

    // Ticks 1..=6 all carry the thrust from control tick 0
    for state in &sim.history()[1..] {
        assert_eq!(state.aft_thrust, 1.0);
    }
    assert!(sim.history().last().unwrap().lin_vel.y > 0.0);
}
