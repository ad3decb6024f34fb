//! The flight controller: a dual-rate physics/control loop.
//!
//! Physics runs every tick; the autopilot is consulted every
//! `physics_hz / control_hz`-th tick and its accepted command stays live
//! for the physics ticks in between. The loop ends on ground contact,
//! after which the final state is classified once as a landing or crash.

use crate::autopilot::{
    invoke, Autopilot, AutopilotArgs, ControlVerdict, Fault, LogSink, PlotSink, UserStore,
};
use crate::config::{randomize_state, ConfigError, Randomize, SimConfig};
use crate::physics;
use crate::state::LanderState;
use lunarpilot_logic::constants::{
    CRASH_ANGLE_LIMIT, CRASH_ROT_VEL_LIMIT, CRASH_VELOCITY_LIMIT, FUEL_CAPACITY,
};
use lunarpilot_logic::difficulty::scenario_energy;
use lunarpilot_logic::geometry::{wrap_angle, Line};
use lunarpilot_logic::ground::altitude;
use lunarpilot_logic::throttle::ThrottleBands;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Terminal classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Landed,
    Crashed,
}

/// Classify a touchdown state against the landing-safety limits.
pub fn classify(state: &LanderState) -> Outcome {
    if state.speed() > CRASH_VELOCITY_LIMIT
        || state.rot_vel.abs() > CRASH_ROT_VEL_LIMIT
        || state.angle.abs() > CRASH_ANGLE_LIMIT
    {
        Outcome::Crashed
    } else {
        Outcome::Landed
    }
}

/// One lander run: terrain, autopilot, state history and loop bookkeeping.
pub struct LanderSim<A> {
    autopilot: A,
    config: SimConfig,
    aft_bands: ThrottleBands,
    rot_bands: ThrottleBands,
    ground: Line,
    state_hist: Vec<LanderState>,
    user_store: UserStore,
    logs: LogSink,
    plots: PlotSink,
    last_fault: Option<Fault>,
    outcome: Option<Outcome>,
    physics_period: f64,
    control_period: f64,
    /// Physics ticks per control tick.
    control_every: u64,
    tick: u64,
}

impl<A: Autopilot> LanderSim<A> {
    /// Build a run. The initial angle is wrapped and the tank filled;
    /// invalid rate configurations refuse to start.
    pub fn new(
        mut initial: LanderState,
        autopilot: A,
        config: SimConfig,
        ground: Line,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        initial.fuel_level = FUEL_CAPACITY;
        initial.angle = wrap_angle(initial.angle);

        let physics_period = 1.0 / config.physics_hz;
        let control_period = 1.0 / config.control_hz;
        let control_every = ((config.physics_hz / config.control_hz).round() as u64).max(1);

        Ok(Self {
            aft_bands: ThrottleBands::new(config.aft_throttle.clone()),
            rot_bands: ThrottleBands::new(config.rot_throttle.clone()),
            logs: LogSink::new(config.log_interval),
            plots: PlotSink::new(config.log_interval),
            autopilot,
            config,
            ground,
            state_hist: vec![initial],
            user_store: UserStore::new(),
            last_fault: None,
            outcome: None,
            physics_period,
            control_period,
            control_every,
            tick: 0,
        })
    }

    /// Build a run with uniform jitter applied to the initial state.
    pub fn randomized(
        mut initial: LanderState,
        autopilot: A,
        config: SimConfig,
        ground: Line,
        factors: &Randomize,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        randomize_state(&mut initial, factors, rng);
        Self::new(initial, autopilot, config, ground)
    }

    /// Advance one physics tick, consulting the autopilot first on control
    /// ticks. Returns false once the run is terminal.
    pub fn step(&mut self) -> bool {
        if self.outcome.is_some() {
            return false;
        }

        let mut state = self.latest();

        // Run the autopilot every nth physics tick
        if self.tick % self.control_every == 0 {
            state = self.step_autopilot(state);
        }
        self.tick += 1;

        let (next, above) = physics::step(
            self.physics_period,
            self.config.enable_fuel,
            self.config.enable_fuel_mass,
            &self.ground,
            &state,
        );
        self.state_hist.push(next);

        if !above {
            self.outcome = Some(classify(&next));
        }
        above
    }

    /// Drive the loop to ground contact and classify.
    pub fn run(&mut self) -> Outcome {
        while self.step() {}
        // step() only returns false once an outcome is recorded
        self.outcome.unwrap_or(Outcome::Crashed)
    }

    /// Drive at most `max_steps` physics ticks; `None` while still flying.
    pub fn run_for(&mut self, max_steps: u64) -> Option<Outcome> {
        for _ in 0..max_steps {
            if !self.step() {
                break;
            }
        }
        self.outcome
    }

    fn step_autopilot(&mut self, mut state: LanderState) -> LanderState {
        let args = AutopilotArgs {
            x_position: state.pos.x,
            altitude: altitude(&self.ground, state.pos),
            angle: state.angle,
            user_store: std::mem::take(&mut self.user_store),
            log: &mut self.logs,
            plot: &mut self.plots,
        };

        let start = Instant::now();
        let verdict = invoke(&mut self.autopilot, args, &self.aft_bands, &self.rot_bands);
        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > self.control_period {
            // A slow autopilot never corrupts the simulation; it only
            // earns a warning and the run carries on.
            log::warn!(
                "control loop exceeded its period: {:.2} ms > {:.2} ms",
                elapsed * 1e3,
                self.control_period * 1e3
            );
        }

        match verdict {
            ControlVerdict::Accepted { command, clipped } => {
                state.rot_thrust = command.rot_thrust;
                state.aft_thrust = command.aft_thrust;
                self.user_store = command.user_store;
                if let Some(fault) = clipped.into_iter().next_back() {
                    self.last_fault = Some(fault);
                }
            }
            ControlVerdict::Rejected(fault) => {
                state.rot_thrust = 0.0;
                state.aft_thrust = 0.0;
                self.user_store = UserStore::new();
                self.last_fault = Some(fault);
            }
        }

        state
    }

    /// Latest committed snapshot.
    pub fn latest(&self) -> LanderState {
        self.state_hist[self.state_hist.len() - 1]
    }

    /// Full state history, one entry per physics tick plus the initial
    /// state at index 0.
    pub fn history(&self) -> &[LanderState] {
        &self.state_hist
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Most recent autopilot fault, kept for the host to surface.
    pub fn last_fault(&self) -> Option<&Fault> {
        self.last_fault.as_ref()
    }

    pub fn ground(&self) -> &Line {
        &self.ground
    }

    pub fn logs(&self) -> &[(u64, String)] {
        self.logs.entries()
    }

    pub fn plots(&self) -> &[UserStore] {
        self.plots.samples()
    }

    /// Energy score of the initial state, for scenario labeling.
    pub fn difficulty(&self) -> f64 {
        let initial = self.state_hist[0];
        let mass = physics::mass(self.config.enable_fuel_mass, initial.fuel_level);
        scenario_energy(
            mass,
            altitude(&self.ground, initial.pos),
            initial.angle,
            initial.lin_vel,
            initial.rot_vel,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunarpilot_logic::geometry::Point;
    use serde_json::{json, Value};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Flat ground at y = 0 spanning x 0..=1000.
    fn flat() -> Line {
        (0..=100)
            .map(|i| Point::new(i as f64 * 10.0, 0.0))
            .collect()
    }

    fn coast(_args: AutopilotArgs<'_>) -> Value {
        json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": {} })
    }

    fn sim_at(altitude: f64) -> LanderSim<fn(AutopilotArgs<'_>) -> Value> {
        LanderSim::new(
            LanderState::at_rest(Point::new(500.0, altitude)),
            coast as fn(AutopilotArgs<'_>) -> Value,
            SimConfig::default(),
            flat(),
        )
        .unwrap()
    }

    #[test]
    fn invalid_rates_refuse_to_start() {
        let config = SimConfig {
            physics_hz: 10.0,
            control_hz: 60.0,
            ..SimConfig::default()
        };
        let result = LanderSim::new(
            LanderState::at_rest(Point::new(500.0, 500.0)),
            coast as fn(AutopilotArgs<'_>) -> Value,
            config,
            flat(),
        );
        assert!(matches!(
            result,
            Err(ConfigError::ControlFasterThanPhysics { .. })
        ));
    }

    #[test]
    fn history_grows_one_state_per_tick() {
        let mut sim = sim_at(500.0);
        assert_eq!(sim.history().len(), 1);
        sim.run_for(10);
        assert_eq!(sim.history().len(), 11);
    }

    #[test]
    fn autopilot_runs_every_nth_physics_tick() {
        let calls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&calls);
        let autopilot = move |_args: AutopilotArgs<'_>| {
            counter.set(counter.get() + 1);
            json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": {} })
        };

        let config = SimConfig {
            physics_hz: 60.0,
            control_hz: 20.0,
            ..SimConfig::default()
        };
        let mut sim = LanderSim::new(
            LanderState::at_rest(Point::new(500.0, 500.0)),
            autopilot,
            config,
            flat(),
        )
        .unwrap();

        sim.run_for(12);
        // Control ticks at physics ticks 0, 3, 6, 9
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn store_round_trips_between_control_ticks() {
        let autopilot = |args: AutopilotArgs<'_>| {
            let count = args
                .user_store
                .get("count")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            json!({
                "rotThrust": 0.0,
                "aftThrust": 0.0,
                "userStore": { "count": count + 1 },
            })
        };
        let mut sim = LanderSim::new(
            LanderState::at_rest(Point::new(500.0, 500.0)),
            autopilot,
            SimConfig::default(),
            flat(),
        )
        .unwrap();
        sim.run_for(5);
        assert_eq!(sim.user_store.get("count"), Some(&json!(5)));
    }

    #[test]
    fn rejected_call_resets_the_store() {
        // Fails every second call; the store must restart from empty
        let autopilot = |args: AutopilotArgs<'_>| {
            let seen = args.user_store.get("seen").and_then(Value::as_u64);
            match seen {
                Some(n) => json!({ "aftThrust": format!("bad {n}"), "userStore": {} }),
                None => json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": { "seen": 1 } }),
            }
        };
        let mut sim = LanderSim::new(
            LanderState::at_rest(Point::new(500.0, 500.0)),
            autopilot,
            SimConfig::default(),
            flat(),
        )
        .unwrap();

        sim.run_for(4);
        // Call 1 stores, call 2 rejects and wipes, call 3 stores again...
        assert!(sim.user_store.get("seen").is_some());
        assert!(matches!(
            sim.last_fault(),
            Some(Fault::MissingField("rotThrust"))
        ));
    }

    #[test]
    fn clipped_command_is_used_and_recorded() {
        let autopilot = |_args: AutopilotArgs<'_>| {
            json!({ "rotThrust": 0.0, "aftThrust": 5.0, "userStore": {} })
        };
        let mut sim = LanderSim::new(
            LanderState::at_rest(Point::new(500.0, 500.0)),
            autopilot,
            SimConfig::default(),
            flat(),
        )
        .unwrap();
        sim.step();
        assert_eq!(sim.latest().aft_thrust, 1.0);
        assert!(matches!(
            sim.last_fault(),
            Some(Fault::Clipped {
                field: "aftThrust",
                ..
            })
        ));
    }

    #[test]
    fn classify_thresholds() {
        let mut state = LanderState::at_rest(Point::new(0.0, 0.0));
        assert_eq!(classify(&state), Outcome::Landed);

        state.lin_vel = Point::new(0.0, -1.5);
        assert_eq!(classify(&state), Outcome::Crashed);

        state.lin_vel = Point::default();
        state.rot_vel = 0.6;
        assert_eq!(classify(&state), Outcome::Crashed);

        state.rot_vel = 0.0;
        state.angle = -11.0;
        assert_eq!(classify(&state), Outcome::Crashed);

        // At the limits is still a landing (crash checks are strict)
        state.angle = 10.0;
        state.rot_vel = 0.5;
        state.lin_vel = Point::new(1.0, 0.0);
        assert_eq!(classify(&state), Outcome::Landed);
    }

    #[test]
    fn difficulty_increases_with_altitude() {
        assert!(sim_at(800.0).difficulty() > sim_at(400.0).difficulty());
    }
}
