//! Lunar Pilot Headless Flight Harness
//!
//! Validates terrain synthesis, throttle snapping and whole flights
//! without rendering. Runs entirely in-process — no graphics, no timing,
//! no user input.
//!
//! Usage:
//!   cargo run -p lunarpilot-simtest
//!   cargo run -p lunarpilot-simtest -- --verbose

use lunarpilot_core::prelude::*;
use lunarpilot_logic::constants::{CRASH_VELOCITY_LIMIT, FUEL_CAPACITY, STATIC_MASS};
use lunarpilot_logic::difficulty::scenario_energy;
use lunarpilot_logic::geometry::{Line, Point};
use lunarpilot_logic::ground::{above_ground, find_ground_point};
use lunarpilot_logic::terrain::{gen_ground, seeded_rng};
use lunarpilot_logic::throttle::ThrottleBands;
use serde_json::{json, Value};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Lunar Pilot Flight Harness ===\n");

    let mut results = Vec::new();

    // 1. Terrain synthesis sweep
    results.extend(validate_terrain(verbose));

    // 2. Ground query behavior
    results.extend(validate_ground_queries(verbose));

    // 3. Throttle band snapping
    results.extend(validate_throttle_bands(verbose));

    // 4. Difficulty scoring
    results.extend(validate_difficulty(verbose));

    // 5. Uncontrolled flights
    results.extend(validate_ballistic_flights(verbose));

    // 6. Hostile autopilots
    results.extend(validate_hostile_autopilots(verbose));

    // 7. PID-controlled descent
    results.extend(validate_pid_descent(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Shared fixtures ─────────────────────────────────────────────────────

/// Flat ground at y = 0 spanning x 0..=1000.
fn flat_ground() -> Line {
    (0..=100)
        .map(|i| Point::new(i as f64 * 10.0, 0.0))
        .collect()
}

fn coast(_args: AutopilotArgs<'_>) -> Value {
    json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": {} })
}

fn new_sim<A: Autopilot>(
    pos: Point,
    autopilot: A,
    config: SimConfig,
    ground: Line,
) -> LanderSim<A> {
    match LanderSim::new(LanderState::at_rest(pos), autopilot, config, ground) {
        Ok(sim) => sim,
        Err(e) => {
            println!("  ✗ harness setup failed: {e}");
            std::process::exit(1);
        }
    }
}

// ── 1. Terrain ──────────────────────────────────────────────────────────

fn validate_terrain(verbose: bool) -> Vec<TestResult> {
    println!("--- Terrain Synthesis ---");
    let mut results = Vec::new();

    let start = Point::new(0.0, 50.0);
    let end = Point::new(2000.0, 50.0);

    let a = gen_ground(&mut seeded_rng("harness"), start, end, 800, 150.0, 8.0);
    let b = gen_ground(&mut seeded_rng("harness"), start, end, 800, 150.0, 8.0);
    results.push(TestResult {
        name: "terrain_deterministic".into(),
        passed: a == b,
        detail: "same seed reproduces the same ground".into(),
    });

    let c = gen_ground(&mut seeded_rng("other"), start, end, 800, 150.0, 8.0);
    results.push(TestResult {
        name: "terrain_seed_sensitive".into(),
        passed: a != c,
        detail: "different seeds diverge".into(),
    });

    results.push(TestResult {
        name: "terrain_point_count".into(),
        passed: a.len() == 800,
        detail: format!("{} points generated", a.len()),
    });

    let monotonic = a.windows(2).all(|w| w[1].x > w[0].x);
    results.push(TestResult {
        name: "terrain_x_monotonic".into(),
        passed: monotonic,
        detail: "x strictly increasing".into(),
    });

    let end_err = (a[a.len() - 1].x - end.x).abs();
    results.push(TestResult {
        name: "terrain_spans_range".into(),
        passed: end_err < 1e-6,
        detail: format!("last x within {end_err:.2e} of requested end"),
    });

    if verbose {
        let lo = a.iter().fold(f64::MAX, |m, p| m.min(p.y));
        let hi = a.iter().fold(f64::MIN, |m, p| m.max(p.y));
        println!("  height envelope: {lo:.1} .. {hi:.1}");
    }

    results
}

// ── 2. Ground queries ───────────────────────────────────────────────────

fn validate_ground_queries(_verbose: bool) -> Vec<TestResult> {
    println!("--- Ground Queries ---");
    let mut results = Vec::new();

    let ground = gen_ground(
        &mut seeded_rng("queries"),
        Point::new(0.0, 50.0),
        Point::new(1000.0, 50.0),
        500,
        100.0,
        5.0,
    );

    // Every query over the span lands on a real terrain point
    let mut in_range = true;
    for x in (0..1000).step_by(7) {
        let (gp, saturated) = find_ground_point(&ground, Point::new(x as f64, 0.0));
        if saturated || !ground.contains(&gp) {
            in_range = false;
            break;
        }
    }
    results.push(TestResult {
        name: "ground_query_in_range".into(),
        passed: in_range,
        detail: "in-span queries never saturate".into(),
    });

    let (left, left_sat) = find_ground_point(&ground, Point::new(-500.0, 0.0));
    let (right, right_sat) = find_ground_point(&ground, Point::new(9999.0, 0.0));
    results.push(TestResult {
        name: "ground_query_saturates".into(),
        passed: left_sat && right_sat && left == ground[0] && right == ground[ground.len() - 1],
        detail: "off-span queries clamp to the endpoints".into(),
    });

    let escapes = above_ground(&ground, Point::new(-500.0, 1e9));
    results.push(TestResult {
        name: "ground_no_escape_off_span".into(),
        passed: !escapes,
        detail: "saturated queries are never above ground".into(),
    });

    results
}

// ── 3. Throttle bands ───────────────────────────────────────────────────

fn validate_throttle_bands(verbose: bool) -> Vec<TestResult> {
    println!("--- Throttle Bands ---");
    let mut results = Vec::new();

    let bands = ThrottleBands::new(vec![(0.7, 1.0), (0.0, 0.3)]);

    // Sweep the whole command range: every snapped value must be legal,
    // and snapping twice must be a fixed point
    let mut all_legal = true;
    let mut idempotent = true;
    for i in -50..=150 {
        let v = i as f64 / 100.0;
        let snapped = bands.snap(v);
        let legal = bands
            .bands()
            .iter()
            .any(|&(lo, hi)| snapped.value >= lo && snapped.value <= hi);
        all_legal &= legal;
        let again = bands.snap(snapped.value);
        idempotent &= !again.clipped && again.value == snapped.value;
    }
    results.push(TestResult {
        name: "throttle_snap_legal".into(),
        passed: all_legal,
        detail: "every snapped value lies inside a band".into(),
    });
    results.push(TestResult {
        name: "throttle_snap_idempotent".into(),
        passed: idempotent,
        detail: "snapping a snapped value is a no-op".into(),
    });

    let mid = bands.snap(0.5);
    results.push(TestResult {
        name: "throttle_gap_tie_to_lower".into(),
        passed: mid.value == 0.3 && mid.clipped,
        detail: format!("0.5 between bands snapped to {}", mid.value),
    });

    if verbose {
        println!("  normalized bands: {:?}", bands.bands());
    }

    results
}

// ── 4. Difficulty ───────────────────────────────────────────────────────

fn validate_difficulty(_verbose: bool) -> Vec<TestResult> {
    println!("--- Difficulty Scoring ---");
    let mut results = Vec::new();

    let mass = STATIC_MASS + FUEL_CAPACITY;
    let calm = scenario_energy(mass, 200.0, 0.0, Point::default(), 0.0);
    let high = scenario_energy(mass, 800.0, 0.0, Point::default(), 0.0);
    let tumbling = scenario_energy(mass, 200.0, 90.0, Point::new(3.0, -2.0), 1.5);

    results.push(TestResult {
        name: "difficulty_altitude_ordering".into(),
        passed: high > calm,
        detail: format!("high {high:.2} > calm {calm:.2}"),
    });
    results.push(TestResult {
        name: "difficulty_motion_ordering".into(),
        passed: tumbling > calm,
        detail: format!("tumbling {tumbling:.2} > calm {calm:.2}"),
    });

    results
}

// ── 5. Ballistic flights ────────────────────────────────────────────────

fn validate_ballistic_flights(verbose: bool) -> Vec<TestResult> {
    println!("--- Ballistic Flights ---");
    let mut results = Vec::new();

    let mut sim = new_sim(
        Point::new(500.0, 500.0),
        coast as fn(AutopilotArgs<'_>) -> Value,
        SimConfig::default(),
        flat_ground(),
    );
    let outcome = sim.run();
    let last = sim.history()[sim.history().len() - 1];
    results.push(TestResult {
        name: "free_fall_crashes".into(),
        passed: outcome == Outcome::Crashed && last.speed() > CRASH_VELOCITY_LIMIT,
        detail: format!(
            "{outcome:?} at {:.2} px/tick after {} ticks",
            last.speed(),
            sim.history().len() - 1
        ),
    });

    let mut sim = new_sim(
        Point::new(500.0, 14.5),
        coast as fn(AutopilotArgs<'_>) -> Value,
        SimConfig::default(),
        flat_ground(),
    );
    let outcome = sim.run();
    results.push(TestResult {
        name: "short_drop_lands".into(),
        passed: outcome == Outcome::Landed,
        detail: format!("{outcome:?} from half a pixel up"),
    });

    // Hover at exactly gravity-cancelling thrust until the tank runs dry
    let hover = |_args: AutopilotArgs<'_>| {
        let aft = (STATIC_MASS + FUEL_CAPACITY) / 60.0;
        json!({ "rotThrust": 0.0, "aftThrust": aft, "userStore": {} })
    };
    let config = SimConfig {
        enable_fuel: true,
        ..SimConfig::default()
    };
    let mut sim = new_sim(Point::new(500.0, 300.0), hover, config, flat_ground());
    let outcome = sim.run_for(100_000);
    let mid_hover = sim.history()[200];
    let last = sim.history()[sim.history().len() - 1];
    results.push(TestResult {
        name: "hover_holds_until_dry".into(),
        passed: outcome == Some(Outcome::Crashed)
            && mid_hover.speed() < 1e-6
            && last.fuel_level == 0.0,
        detail: format!(
            "held within {:.4} px/tick, fell with {:.2} fuel left",
            mid_hover.speed(),
            last.fuel_level
        ),
    });

    if verbose {
        println!("  free-fall difficulty score: {:.2}", sim.difficulty());
    }

    results
}

// ── 6. Hostile autopilots ───────────────────────────────────────────────

fn validate_hostile_autopilots(_verbose: bool) -> Vec<TestResult> {
    println!("--- Hostile Autopilots ---");
    let mut results = Vec::new();

    let panicky = |_args: AutopilotArgs<'_>| -> Value { panic!("deliberate") };
    let mut sim = new_sim(
        Point::new(500.0, 200.0),
        panicky,
        SimConfig::default(),
        flat_ground(),
    );
    let outcome = sim.run();
    results.push(TestResult {
        name: "panicking_autopilot_contained".into(),
        passed: outcome == Outcome::Crashed
            && matches!(sim.last_fault(), Some(Fault::Panicked(_))),
        detail: "panic trapped, run reached the ground".into(),
    });

    let garbage = |_args: AutopilotArgs<'_>| json!([1, 2, 3]);
    let mut sim = new_sim(
        Point::new(500.0, 200.0),
        garbage,
        SimConfig::default(),
        flat_ground(),
    );
    sim.run();
    results.push(TestResult {
        name: "malformed_command_rejected".into(),
        passed: sim.last_fault().is_some()
            && sim.history()[sim.history().len() - 1].aft_thrust == 0.0,
        detail: "non-object return zeroed the thrusters".into(),
    });

    let greedy = |_args: AutopilotArgs<'_>| {
        json!({ "rotThrust": 0.0, "aftThrust": 9000.0, "userStore": {} })
    };
    let mut sim = new_sim(
        Point::new(500.0, 200.0),
        greedy,
        SimConfig::default(),
        flat_ground(),
    );
    sim.step();
    let applied = sim.history()[sim.history().len() - 1].aft_thrust;
    results.push(TestResult {
        name: "oversized_command_clipped".into(),
        passed: applied == 1.0,
        detail: format!("aft thrust 9000 clipped to {applied}"),
    });

    results
}

// ── 7. PID descent ──────────────────────────────────────────────────────

/// A vertical-rate autopilot: tracks a target descent rate that tightens
/// with altitude, estimating its own velocity by differencing altitude
/// across control ticks. Holds the hull level with a PD loop on angle.
struct PidLander {
    prev_altitude: Option<f64>,
    prev_angle: Option<f64>,
    descent_integral: f64,
}

impl PidLander {
    const TOUCHDOWN_RATE: f64 = 0.5;
    const RATE_SLOPE: f64 = 1.0 / 300.0;
    const MAX_RATE: f64 = 1.8;
    const P: f64 = 1.0;
    const I: f64 = 0.02;
    const ANGLE_P: f64 = 0.03;
    const ANGLE_D: f64 = 0.6;

    fn new() -> Self {
        Self {
            prev_altitude: None,
            prev_angle: None,
            descent_integral: 0.0,
        }
    }
}

impl Autopilot for PidLander {
    fn control(&mut self, args: AutopilotArgs<'_>) -> Value {
        // Descent rate in px per control tick, positive when falling
        let descent = match self.prev_altitude {
            Some(prev) => prev - args.altitude,
            None => 0.0,
        };
        self.prev_altitude = Some(args.altitude);

        let target = (Self::TOUCHDOWN_RATE + args.altitude * Self::RATE_SLOPE)
            .min(Self::MAX_RATE);
        let err = descent - target;

        let mut aft = Self::P * err + Self::I * self.descent_integral;
        // Integrate only while the command is not saturated
        if (0.0..=1.0).contains(&aft) {
            self.descent_integral += err;
        }
        aft = aft.clamp(0.0, 1.0);

        let angle_rate = match self.prev_angle {
            Some(prev) => args.angle - prev,
            None => 0.0,
        };
        self.prev_angle = Some(args.angle);
        let rot = (-Self::ANGLE_P * args.angle - Self::ANGLE_D * angle_rate).clamp(-1.0, 1.0);

        json!({ "rotThrust": rot, "aftThrust": aft, "userStore": {} })
    }
}

fn validate_pid_descent(verbose: bool) -> Vec<TestResult> {
    println!("--- PID Descent ---");
    let mut results = Vec::new();

    let mut sim = new_sim(
        Point::new(500.0, 400.0),
        PidLander::new(),
        SimConfig::default(),
        flat_ground(),
    );
    let outcome = match sim.run_for(200_000) {
        Some(o) => o,
        None => {
            results.push(TestResult {
                name: "pid_descent_terminates".into(),
                passed: false,
                detail: "still airborne after 200000 ticks".into(),
            });
            return results;
        }
    };

    let last = sim.history()[sim.history().len() - 1];
    results.push(TestResult {
        name: "pid_descent_lands".into(),
        passed: outcome == Outcome::Landed,
        detail: format!(
            "{outcome:?} at {:.2} px/tick, angle {:.2}°",
            last.speed(),
            last.angle
        ),
    });

    results.push(TestResult {
        name: "pid_touchdown_gentle".into(),
        passed: last.speed() < CRASH_VELOCITY_LIMIT && last.lin_vel.y < 0.0,
        detail: format!("touchdown speed {:.2} px/tick", last.speed()),
    });

    // The controlled run comes down much slower than free fall would
    let mut ballistic = new_sim(
        Point::new(500.0, 400.0),
        coast as fn(AutopilotArgs<'_>) -> Value,
        SimConfig::default(),
        flat_ground(),
    );
    ballistic.run();
    results.push(TestResult {
        name: "pid_slower_than_ballistic".into(),
        passed: sim.history().len() > ballistic.history().len() * 3 / 2,
        detail: format!(
            "{} controlled ticks vs {} ballistic",
            sim.history().len(),
            ballistic.history().len()
        ),
    });

    if verbose {
        println!(
            "  descent profile: {} ticks, difficulty {:.2}",
            sim.history().len(),
            sim.difficulty()
        );
    }

    results
}
