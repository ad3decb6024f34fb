//! Scenario difficulty from the lander's initial energy state.
//!
//! Sums height potential, tilt potential, linear and rotational kinetic
//! energy, normalized by fuel capacity. Used only to label scenarios;
//! nothing in the safety-critical path reads it.

use crate::constants::{FUEL_CAPACITY, GRAVITY};
use crate::geometry::Point;

/// Energy score of an initial state. Higher is harder.
pub fn scenario_energy(
    mass: f64,
    altitude: f64,
    angle: f64,
    lin_vel: Point,
    rot_vel: f64,
) -> f64 {
    let e_height = mass * GRAVITY * altitude;
    let e_angle = 0.01 * (mass * angle).abs();
    let e_linear = 0.5 * mass * lin_vel.magnitude().powi(2);
    let e_rot = 0.5 * mass * rot_vel.powi(2);

    (e_height + e_angle + e_linear + e_rot) / FUEL_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FUEL_CAPACITY, STATIC_MASS};

    const MASS: f64 = STATIC_MASS + FUEL_CAPACITY;

    #[test]
    fn higher_altitude_is_strictly_harder() {
        let mut last = f64::MIN;
        for alt in [100.0, 250.0, 500.0, 1000.0] {
            let e = scenario_energy(MASS, alt, 0.0, Point::default(), 0.0);
            assert!(e > last, "altitude {alt} scored {e} <= {last}");
            last = e;
        }
    }

    #[test]
    fn tilt_and_motion_add_energy() {
        let base = scenario_energy(MASS, 500.0, 0.0, Point::default(), 0.0);
        let tilted = scenario_energy(MASS, 500.0, 45.0, Point::default(), 0.0);
        let moving = scenario_energy(MASS, 500.0, 0.0, Point::new(3.0, -4.0), 0.0);
        let spinning = scenario_energy(MASS, 500.0, 0.0, Point::default(), 2.0);
        assert!(tilted > base);
        assert!(moving > base);
        assert!(spinning > base);
    }

    #[test]
    fn tilt_sign_does_not_matter() {
        let pos = scenario_energy(MASS, 500.0, 45.0, Point::default(), 0.0);
        let neg = scenario_energy(MASS, 500.0, -45.0, Point::default(), 0.0);
        assert_eq!(pos, neg);
    }
}
