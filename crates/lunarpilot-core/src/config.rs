//! Run configuration and initial-state randomization.
//!
//! All fields are plain data; loading or serializing them from a settings
//! screen, URL or file is the host's concern.

use crate::state::LanderState;
use lunarpilot_logic::geometry::{wrap_angle, Point, Polar};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Immutable per-run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Enforce running out of fuel (thrust dies at empty).
    pub enable_fuel: bool,
    /// Account for fuel mass in acceleration (requires `enable_fuel` to
    /// matter at touchdown, but is honored either way).
    pub enable_fuel_mass: bool,
    /// Legal aft throttle intervals, normalized before use.
    pub aft_throttle: Vec<(f64, f64)>,
    /// Legal rotational throttle intervals, normalized before use.
    pub rot_throttle: Vec<(f64, f64)>,
    /// Physics integration rate. Must be at least `control_hz`.
    pub physics_hz: f64,
    /// Autopilot consultation rate.
    pub control_hz: f64,
    /// Accept one user log/plot call out of every `log_interval`.
    pub log_interval: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            enable_fuel: false,
            enable_fuel_mass: false,
            aft_throttle: vec![(0.0, 1.0)],
            rot_throttle: vec![(-1.0, 1.0)],
            physics_hz: 60.0,
            control_hz: 60.0,
            log_interval: 10,
        }
    }
}

impl SimConfig {
    /// Reject configurations that cannot produce a well-defined run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.physics_hz > 0.0) || !(self.control_hz > 0.0) {
            return Err(ConfigError::NonPositiveRate {
                physics_hz: self.physics_hz,
                control_hz: self.control_hz,
            });
        }
        if self.physics_hz < self.control_hz {
            return Err(ConfigError::ControlFasterThanPhysics {
                physics_hz: self.physics_hz,
                control_hz: self.control_hz,
            });
        }
        Ok(())
    }
}

/// A configuration error prevents the run from starting at all; nothing
/// else in the engine aborts a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("physics rate ({physics_hz} Hz) must be at least the control rate ({control_hz} Hz)")]
    ControlFasterThanPhysics { physics_hz: f64, control_hz: f64 },
    #[error("simulation rates must be positive (physics {physics_hz} Hz, control {control_hz} Hz)")]
    NonPositiveRate { physics_hz: f64, control_hz: f64 },
}

/// Jitter factors applied to the initial state for scenario variety.
/// Each field is a half-width: the value moves uniformly within ±factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Randomize {
    pub pos_factor: Point,
    /// Velocity jitter in polar form (magnitude and bearing half-widths).
    pub lin_vel_factor: Polar,
    pub angle_factor: f64,
    pub rot_vel_factor: f64,
}

fn jitter(rng: &mut impl Rng, value: f64, factor: f64) -> f64 {
    value + (rng.gen::<f64>() - 0.5) * 2.0 * factor
}

/// Apply uniform jitter to an initial state. Velocity is randomized in
/// polar form so magnitude and bearing vary independently.
pub fn randomize_state(state: &mut LanderState, factors: &Randomize, rng: &mut impl Rng) {
    state.pos = Point::new(
        jitter(rng, state.pos.x, factors.pos_factor.x),
        jitter(rng, state.pos.y, factors.pos_factor.y),
    );

    let vel = Polar::from_cart(state.lin_vel);
    state.lin_vel = Polar::new(
        jitter(rng, vel.mag, factors.lin_vel_factor.mag),
        jitter(rng, vel.angle, factors.lin_vel_factor.angle),
    )
    .to_cart();

    state.angle = wrap_angle(jitter(rng, state.angle, factors.angle_factor));
    state.rot_vel = jitter(rng, state.rot_vel, factors.rot_vel_factor);
}
