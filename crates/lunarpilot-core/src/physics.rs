//! Explicit-Euler integration of the lander's kinematics.
//!
//! One call advances the state by exactly one physics tick. All rate
//! constants are calibrated at 60 Hz; other rates are handled by scaling
//! fuel burn once with `period / base_period` and the accelerations with
//! its square (velocity is per-tick, so acceleration carries both the
//! per-tick force scaling and the tick-length scaling).

use crate::state::LanderState;
use lunarpilot_logic::constants::{
    AFT_THRUST_EFFICIENCY, BASE_PHYSICS_PERIOD, FUEL_CAPACITY, GRAVITY, ROT_THRUST_EFFICIENCY,
    STATIC_MASS,
};
use lunarpilot_logic::geometry::{wrap_angle, Line, Point};
use lunarpilot_logic::ground::above_ground;

/// Current mass from the fuel level at the start of the tick.
pub fn mass(enable_fuel_mass: bool, fuel_level: f64) -> f64 {
    if enable_fuel_mass {
        STATIC_MASS + fuel_level
    } else {
        STATIC_MASS + FUEL_CAPACITY
    }
}

/// Advance `state` by one tick of `period` seconds. Returns the new state
/// and whether every hull corner is still above the terrain.
pub fn step(
    period: f64,
    enable_fuel: bool,
    enable_fuel_mass: bool,
    ground: &Line,
    state: &LanderState,
) -> (LanderState, bool) {
    let scale = period / BASE_PHYSICS_PERIOD;
    let mut next = *state;

    // Fuel burn tracks separately from mass since dynamic mass may be off
    next.fuel_level -= scale
        * (next.rot_thrust.abs() * ROT_THRUST_EFFICIENCY
            + next.aft_thrust * AFT_THRUST_EFFICIENCY);
    if next.fuel_level <= 0.0 {
        next.fuel_level = 0.0;
    }

    // Standing clamp: no thrust on an empty tank
    if enable_fuel && next.fuel_level == 0.0 {
        next.aft_thrust = 0.0;
        next.rot_thrust = 0.0;
    }

    // Mass is read from the committed snapshot, i.e. pre-burn fuel
    let mass = mass(enable_fuel_mass, state.fuel_level);

    // Thrust components in the world frame from the current angle
    let rad = next.angle.to_radians();
    let x_accel = next.aft_thrust * rad.sin() / mass;
    let y_accel = next.aft_thrust * rad.cos() / mass;

    let kinematic_scale = scale * scale;
    let lin_accel = Point::new(
        kinematic_scale * x_accel,
        kinematic_scale * (y_accel - GRAVITY),
    );
    // Mass stands in for rotational inertia
    let rot_accel = kinematic_scale * (next.rot_thrust / mass);

    next.lin_vel = next.lin_vel + lin_accel;
    next.rot_vel += rot_accel;
    next.pos = next.pos + next.lin_vel;
    next.angle = wrap_angle(next.angle + next.rot_vel);

    let above = next
        .bounding_box()
        .iter()
        .all(|corner| above_ground(ground, *corner));

    (next, above)
}
