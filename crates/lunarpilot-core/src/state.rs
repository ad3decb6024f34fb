//! Kinematic state of the lander.

use lunarpilot_logic::constants::HULL_CORNERS;
use lunarpilot_logic::geometry::{rotate_corners, Point};
use serde::{Deserialize, Serialize};

/// One snapshot of the lander, produced once per physics tick.
///
/// Angles are degrees wrapped to `(-180, 180]`, rotation rate is degrees
/// per physics tick, thrust commands are the clamped values last accepted
/// from the autopilot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LanderState {
    pub pos: Point,
    pub lin_vel: Point,
    pub angle: f64,
    pub rot_vel: f64,
    pub aft_thrust: f64,
    pub rot_thrust: f64,
    pub fuel_level: f64,
}

impl LanderState {
    /// A motionless upright lander at `pos` with no thrust commanded.
    /// Fuel is filled by the engine at run construction.
    pub fn at_rest(pos: Point) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    /// Linear speed magnitude.
    pub fn speed(&self) -> f64 {
        self.lin_vel.magnitude()
    }

    /// World-space hull corners, used for ground contact tests.
    pub fn bounding_box(&self) -> [Point; 4] {
        rotate_corners(HULL_CORNERS, self.angle).map(|c| c + self.pos)
    }
}
