//! Pure simulation logic for Lunar Pilot.
//!
//! This crate contains all lander-game logic that is independent of any
//! engine, autopilot or runtime. Functions take plain data and return
//! results, making them unit-testable and portable between the flight
//! engine, the headless simtest harness, and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`constants`] | Physics calibration constants and landing-safety limits |
//! | [`difficulty`] | Scenario energy score from the initial state |
//! | [`geometry`] | Points, polar vectors, angle wrapping, hull rotation |
//! | [`ground`] | O(1) ground lookup, above-ground test, altitude |
//! | [`terrain`] | Seeded two-phase procedural terrain synthesis |
//! | [`throttle`] | Throttle band normalization and snap-to-limits |

pub mod constants;
pub mod difficulty;
pub mod geometry;
pub mod ground;
pub mod terrain;
pub mod throttle;
