//! Seeded procedural terrain synthesis.
//!
//! Two-phase algorithm:
//! 1. Coarse pass: a handful of anchor points evenly spaced in x, each at a
//!    random height scaled by `variability`, with the first and last anchors
//!    forced exactly onto the requested start/end points.
//! 2. Fine pass: a PI-controller-driven random walk across `points`
//!    equal-width segments. Each step adds noise plus a proportional and
//!    integral correction pulling the walk toward the current anchor, so the
//!    ground trends along the coarse profile while staying locally rough.

use crate::geometry::{Line, Point};
use rand::{Rng, SeedableRng};
use std::hash::{Hash, Hasher};

/// Anchors per fine segment in the coarse pass.
const GROSS_FACTOR: usize = 20;

/// Proportional gain of the fine-pass walk.
const P: f64 = 0.01;

/// Integral gain of the fine-pass walk.
const I: f64 = 0.0005;

/// Draw a fresh opaque terrain seed.
pub fn reseed() -> String {
    format!("{:016x}", rand::thread_rng().gen::<u64>())
}

/// Deterministic random source for a seed string. The same seed always
/// reproduces the same terrain.
pub fn seeded_rng(seed: &str) -> rand::rngs::StdRng {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    seed.hash(&mut hasher);
    rand::rngs::StdRng::seed_from_u64(hasher.finish())
}

/// Fine pass: walk `segments` equal-width steps from the first anchor,
/// steering toward the anchor profile with a PI correction.
fn gen_bumpy(rng: &mut impl Rng, segments: usize, target: &[Point], noise: f64) -> Line {
    let mut ground = Vec::with_capacity(segments);

    let len = target[target.len() - 1].x - target[0].x;
    let seg_len = len / segments as f64;

    let mut x = target[0].x;
    let mut y = target[0].y;
    let mut targ_idx = 0;
    let mut integral = 0.0;

    for _ in 0..segments {
        // X always moves right
        x += seg_len;

        // Advance the target anchor once we pass it, never past the last
        let mut t = target[targ_idx];
        if x >= t.x && targ_idx < target.len() - 1 {
            targ_idx += 1;
            t = target[targ_idx];
        }

        // The further we are from the anchor height, the stronger the
        // correction pulling the walk back toward it
        let err = t.y - y;
        integral += err;
        y += (rng.gen::<f64>() - 0.5) * noise + P * err + I * integral;

        ground.push(Point::new(x, y));
    }

    ground
}

/// Generate a ground line of exactly `points` points between `start` and
/// `end`. `variability` scales the coarse anchor heights, `noise` the
/// per-segment jitter of the fine pass.
pub fn gen_ground(
    rng: &mut impl Rng,
    start: Point,
    end: Point,
    points: usize,
    variability: f64,
    noise: f64,
) -> Line {
    let length = end.x - start.x;
    let gross_segment_length = length / points as f64 * GROSS_FACTOR as f64;

    // Large-scale bumpiness used as the target profile for the fine pass
    let mut rough: Vec<Point> = (0..2 + points / GROSS_FACTOR)
        .map(|i| {
            Point::new(
                i as f64 * gross_segment_length + start.x,
                50.0 + rng.gen::<f64>() * variability,
            )
        })
        .collect();

    // Force start/end targets to be accurate
    rough[0] = start;
    let last = rough.len() - 1;
    rough[last] = end;

    gen_bumpy(rng, points, &rough, noise)
}
