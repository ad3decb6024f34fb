//! Lunar Pilot Core - Lander Flight Simulation Engine
//!
//! A 2D lunar-lander descent simulated at a fixed physics rate and steered
//! by user-supplied autopilot logic consulted at a (usually slower) control
//! rate. The engine sandboxes the autopilot, validates and clamps its
//! commands, integrates the lander's kinematics against procedurally
//! generated terrain, and classifies touchdown as a landing or a crash.
//!
//! # Architecture
//!
//! - **State**: immutable [`state::LanderState`] snapshots, one per physics
//!   tick, appended to a history owned by the engine
//! - **Physics**: explicit-Euler integration in [`physics`], calibrated at
//!   60 Hz and rate-scaled
//! - **Control**: the [`autopilot::Autopilot`] boundary — untrusted logic
//!   whose raw return value is structurally validated every control tick
//!
//! # Example
//!
//! ```rust,no_run
//! use lunarpilot_core::prelude::*;
//! use lunarpilot_logic::{geometry::Point, terrain};
//!
//! let mut rng = terrain::seeded_rng(&terrain::reseed());
//! let ground = terrain::gen_ground(
//!     &mut rng,
//!     Point::new(0.0, 50.0),
//!     Point::new(1000.0, 50.0),
//!     1000,
//!     100.0,
//!     5.0,
//! );
//!
//! let autopilot = |_args: AutopilotArgs<'_>| {
//!     serde_json::json!({ "rotThrust": 0.0, "aftThrust": 0.0, "userStore": {} })
//! };
//!
//! let initial = LanderState::at_rest(Point::new(500.0, 550.0));
//! let mut sim = LanderSim::new(initial, autopilot, SimConfig::default(), ground).unwrap();
//! let outcome = sim.run();
//! println!("{outcome:?} after {} ticks", sim.history().len());
//! ```

pub mod autopilot;
pub mod config;
pub mod engine;
pub mod physics;
pub mod state;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::autopilot::{Autopilot, AutopilotArgs, ControlVerdict, Fault, UserStore};
    pub use crate::config::{ConfigError, Randomize, SimConfig};
    pub use crate::engine::{LanderSim, Outcome};
    pub use crate::state::LanderState;
}
