//! Synthetic points between two anchors.

use std::fmt;
use std::str::FromStr;

use core_types::Vector;

use crate::PathError;

/// Produces `n` ordered points starting at `start`.
pub trait Interpolator {
    fn interpolate(&self, start: &[f32], end: &[f32], n: usize) -> Result<Vec<Vector>, PathError>;
}

/// Evenly spaced points on the straight segment `start → end`.
///
/// `alpha_i = i / (n - 1)`, so the first point is exactly `start` and, for
/// `n >= 2`, the last is exactly `end`. `n == 1` yields only `start`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn interpolate(&self, start: &[f32], end: &[f32], n: usize) -> Result<Vec<Vector>, PathError> {
        if n < 1 {
            return Err(PathError::invalid_count(n, 1));
        }
        if start.len() != end.len() {
            return Err(PathError::LengthMismatch {
                expected: start.len(),
                actual: end.len(),
            });
        }
        if n == 1 {
            return Ok(vec![start.to_vec()]);
        }

        #[allow(clippy::cast_precision_loss)]
        let steps = (n - 1) as f64;
        let points = (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let alpha = i as f64 / steps;
                lerp(start, end, alpha)
            })
            .collect();
        Ok(points)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn lerp(start: &[f32], end: &[f32], alpha: f64) -> Vector {
    start
        .iter()
        .zip(end)
        .map(|(&s, &e)| ((1.0 - alpha) * f64::from(s) + alpha * f64::from(e)) as f32)
        .collect()
}

/// Registered interpolation strategies, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationMethod {
    Linear,
}

impl InterpolationMethod {
    pub const ALL: &'static [Self] = &[Self::Linear];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
        }
    }

    /// Look up a method by its registered name.
    pub fn from_name(name: &str) -> Result<Self, PathError> {
        Self::ALL
            .iter()
            .copied()
            .find(|method| method.name() == name)
            .ok_or_else(|| PathError::UnknownMethod {
                name: name.to_string(),
                available: Self::ALL
                    .iter()
                    .map(|method| method.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl Interpolator for InterpolationMethod {
    fn interpolate(&self, start: &[f32], end: &[f32], n: usize) -> Result<Vec<Vector>, PathError> {
        match self {
            Self::Linear => Linear.interpolate(start, end, n),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationMethod {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_hits_both_anchors_exactly() {
        let start = [0.25f32, -1.5, 3.0];
        let end = [7.0f32, 0.1, -2.0];
        let points = Linear.interpolate(&start, &end, 7).unwrap();
        assert_eq!(points.len(), 7);
        assert_eq!(points[0], start);
        assert_eq!(points[6], end);
    }

    #[test]
    fn linear_spacing_is_even() {
        let points = Linear.interpolate(&[0.0, 0.0], &[3.0, 6.0], 4).unwrap();
        assert_eq!(
            points,
            vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![2.0, 4.0], vec![3.0, 6.0]]
        );
    }

    #[test]
    fn single_point_is_start() {
        let points = Linear.interpolate(&[1.0, 2.0], &[9.0, 9.0], 1).unwrap();
        assert_eq!(points, vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn zero_points_is_invalid() {
        let err = Linear.interpolate(&[1.0], &[2.0], 0).unwrap_err();
        assert_eq!(err, PathError::InvalidCount { count: 0, minimum: 1 });
    }

    #[test]
    fn mismatched_anchor_lengths_rejected() {
        let err = Linear.interpolate(&[1.0, 2.0], &[2.0], 3).unwrap_err();
        assert_eq!(err, PathError::LengthMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn method_lookup_by_name() {
        assert_eq!(
            InterpolationMethod::from_name("linear").unwrap(),
            InterpolationMethod::Linear
        );
        assert_eq!(
            "linear".parse::<InterpolationMethod>().unwrap().to_string(),
            "linear"
        );

        let err = InterpolationMethod::from_name("spherical").unwrap_err();
        assert_eq!(
            err,
            PathError::UnknownMethod {
                name: "spherical".into(),
                available: "linear".into(),
            }
        );
    }

    #[test]
    fn method_dispatch_matches_variant() {
        let via_enum = InterpolationMethod::Linear
            .interpolate(&[0.0], &[1.0], 3)
            .unwrap();
        let direct = Linear.interpolate(&[0.0], &[1.0], 3).unwrap();
        assert_eq!(via_enum, direct);
    }
}
