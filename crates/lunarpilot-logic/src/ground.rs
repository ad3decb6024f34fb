//! Ground queries against a terrain line.
//!
//! Lookups are O(1): the terrain has evenly spaced x samples, so the index
//! under a point is estimated directly instead of searched. A query whose x
//! falls off the generated terrain saturates to the nearest endpoint and is
//! flagged; saturated queries are deliberately treated as "not above
//! ground" so flight outside the terrain bounds always terminates.

use crate::geometry::{Line, Point};

/// Find the terrain point closest to directly below `p`.
///
/// Returns the point and whether the index estimate had to be clamped to
/// the terrain's range (`saturated`).
pub fn find_ground_point(ground: &Line, p: Point) -> (Point, bool) {
    // Expected index from terrain samples per pixel of x extent
    let idx_per_px = ground.len() as f64 / (ground[ground.len() - 1].x - ground[0].x);
    let raw = (p.x * idx_per_px).round();

    let mut saturated = false;
    let idx = if raw < 0.0 {
        saturated = true;
        0
    } else if raw > (ground.len() - 1) as f64 {
        saturated = true;
        ground.len() - 1
    } else {
        raw as usize
    };

    (ground[idx], saturated)
}

/// Whether `p` is strictly above the terrain. Saturated queries are never
/// above ground.
pub fn above_ground(ground: &Line, p: Point) -> bool {
    let (gp, saturated) = find_ground_point(ground, p);
    p.y > gp.y && !saturated
}

/// Height of `p` over the terrain point below it.
pub fn altitude(ground: &Line, p: Point) -> f64 {
    let (gp, _) = find_ground_point(ground, p);
    p.y - gp.y
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat ground at y = 10 spanning x 0..=90 in 10-pixel steps.
    fn flat() -> Line {
        (0..10).map(|i| Point::new(i as f64 * 10.0, 10.0)).collect()
    }

    #[test]
    fn point_over_terrain_is_not_saturated() {
        let g = flat();
        let (gp, sat) = find_ground_point(&g, Point::new(45.0, 100.0));
        assert!(!sat);
        assert_eq!(gp.y, 10.0);
    }

    #[test]
    fn saturates_left_to_first_point() {
        let g = flat();
        let (gp, sat) = find_ground_point(&g, Point::new(-50.0, 100.0));
        assert!(sat);
        assert_eq!(gp, g[0]);
    }

    #[test]
    fn saturates_right_to_last_point() {
        let g = flat();
        let (gp, sat) = find_ground_point(&g, Point::new(500.0, 100.0));
        assert!(sat);
        assert_eq!(gp, g[9]);
    }

    #[test]
    fn above_ground_basic() {
        let g = flat();
        assert!(above_ground(&g, Point::new(45.0, 11.0)));
        assert!(!above_ground(&g, Point::new(45.0, 9.0)));
        assert!(!above_ground(&g, Point::new(45.0, 10.0)));
    }

    #[test]
    fn saturated_is_never_above_ground() {
        // High altitude does not matter once the query saturates
        let g = flat();
        assert!(!above_ground(&g, Point::new(-50.0, 1e6)));
        assert!(!above_ground(&g, Point::new(5000.0, 1e6)));
    }

    #[test]
    fn altitude_is_height_over_ground() {
        let g = flat();
        assert_eq!(altitude(&g, Point::new(45.0, 110.0)), 100.0);
        assert_eq!(altitude(&g, Point::new(45.0, 4.0)), -6.0);
    }
}
