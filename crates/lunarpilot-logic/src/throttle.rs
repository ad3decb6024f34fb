//! Throttle band normalization and snap-to-limits.
//!
//! A throttle setting is only legal inside one of a set of closed
//! intervals. Out-of-band commands are snapped to the numerically nearest
//! band edge; any snap is a recoverable fault for the caller to report.

use serde::{Deserialize, Serialize};

/// Ordered, non-overlapping set of legal throttle intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrottleBands(Vec<(f64, f64)>);

/// Result of clamping one value through the bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub value: f64,
    /// True when the value was moved onto a band edge.
    pub clipped: bool,
}

/// The candidate edge numerically closer to `value`; ties pick the lower.
fn nearer_of(value: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if (value - lo).abs() <= (value - hi).abs() {
        lo
    } else {
        hi
    }
}

impl ThrottleBands {
    /// Normalize raw `[low, high]` pairs: each pair is sorted, then the
    /// pairs are ordered by lower bound.
    pub fn new(pairs: Vec<(f64, f64)>) -> Self {
        let mut bands: Vec<(f64, f64)> = pairs
            .into_iter()
            .map(|(a, b)| if a > b { (b, a) } else { (a, b) })
            .collect();
        bands.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self(bands)
    }

    pub fn bands(&self) -> &[(f64, f64)] {
        &self.0
    }

    /// Clamp `value` into the nearest legal band.
    ///
    /// Scans bands in ascending order: a value inside a band passes
    /// through unchanged; one above a band remembers that band's high
    /// bound; the first band whose low bound is above the value snaps to
    /// the nearer of that bound and the remembered high; a value above
    /// every band snaps to the last exceeded high.
    pub fn snap(&self, value: f64) -> Snap {
        let mut last_exceeded = 0.0;

        for &(low, high) in &self.0 {
            if value >= low && value <= high {
                return Snap {
                    value,
                    clipped: false,
                };
            }

            // Too big for this band, keep looking
            if value > high {
                last_exceeded = high;
                continue;
            }

            if value < low {
                return Snap {
                    value: nearer_of(value, last_exceeded, low),
                    clipped: true,
                };
            }
        }

        // Fell off the end without finding a band
        Snap {
            value: last_exceeded,
            clipped: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_bands() -> ThrottleBands {
        ThrottleBands::new(vec![(0.0, 0.3), (0.7, 1.0)])
    }

    #[test]
    fn in_band_value_passes_unchanged() {
        let bands = split_bands();
        for v in [0.0, 0.15, 0.3, 0.7, 0.85, 1.0] {
            let snap = bands.snap(v);
            assert_eq!(snap.value, v);
            assert!(!snap.clipped);
        }
    }

    #[test]
    fn gap_value_snaps_to_nearer_edge() {
        let bands = split_bands();
        let snap = bands.snap(0.4);
        assert_eq!(snap.value, 0.3);
        assert!(snap.clipped);

        let snap = bands.snap(0.6);
        assert_eq!(snap.value, 0.7);
        assert!(snap.clipped);
    }

    #[test]
    fn gap_midpoint_ties_to_lower_band() {
        let snap = split_bands().snap(0.5);
        assert_eq!(snap.value, 0.3);
        assert!(snap.clipped);
    }

    #[test]
    fn above_all_bands_snaps_to_last_high() {
        let snap = split_bands().snap(2.5);
        assert_eq!(snap.value, 1.0);
        assert!(snap.clipped);
    }

    #[test]
    fn below_all_bands_snaps_to_first_low() {
        let snap = ThrottleBands::new(vec![(-1.0, 1.0)]).snap(-2.0);
        assert_eq!(snap.value, -1.0);
        assert!(snap.clipped);
    }

    #[test]
    fn normalization_sorts_pairs_and_bands() {
        let bands = ThrottleBands::new(vec![(1.0, 0.7), (0.3, 0.0)]);
        assert_eq!(bands.bands(), &[(0.0, 0.3), (0.7, 1.0)]);
    }
}
