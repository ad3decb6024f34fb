//! Physics calibration constants and landing-safety limits.
//!
//! Parameters are tuned for playability, not realism. Angular units are
//! degrees, linear units are pixels. All rate constants are calibrated
//! against a 60 Hz physics tick and must be scaled for other rates.

/// Downward acceleration per physics tick at the base rate.
pub const GRAVITY: f64 = 1.0 / 60.0;

/// Dry mass of the spacecraft.
pub const STATIC_MASS: f64 = 10.0;

/// Fuel mass in a full tank. Doubles as the wet-mass contribution when
/// fuel-mass accounting is disabled.
pub const FUEL_CAPACITY: f64 = 10.0;

/// Fuel burned per unit of commanded rotational thrust per base tick.
pub const ROT_THRUST_EFFICIENCY: f64 = 0.02;

/// Fuel burned per unit of commanded aft thrust per base tick.
pub const AFT_THRUST_EFFICIENCY: f64 = 0.05;

/// The tick period every efficiency/gravity constant was tuned at (60 Hz).
pub const BASE_PHYSICS_PERIOD: f64 = 1.0 / 60.0;

/// Touchdown is a crash above this linear speed.
pub const CRASH_VELOCITY_LIMIT: f64 = 1.0;

/// Touchdown is a crash above this rotation rate (deg/tick).
pub const CRASH_ROT_VEL_LIMIT: f64 = 0.5;

/// Touchdown is a crash beyond this tilt from vertical (degrees).
pub const CRASH_ANGLE_LIMIT: f64 = 10.0;

/// Hull corners in the lander's local frame, used for ground contact.
/// The nose box is 20x22, the tail box 28x25; corners are half-extents.
pub const HULL_CORNERS: [(f64, f64); 4] = [
    (20.0 / 2.0, 22.0 / 2.0),
    (20.0 / 2.0, -22.0 / 2.0),
    (-28.0 / 2.0, 25.0 / 2.0),
    (-28.0 / 2.0, -25.0 / 2.0),
];
