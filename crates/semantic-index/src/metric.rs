//! Distance metrics used to rank candidates against a synthetic point.

/// A symmetric dissimilarity between two equal-length vectors. Smaller is closer.
pub trait DistanceMetric {
    fn name(&self) -> &'static str;

    fn distance(&self, a: &[f32], b: &[f32]) -> f64;
}

/// `1 - cos(a, b)`, in `[0, 2]`.
///
/// A zero-norm vector has similarity 0 with everything, so its distance is 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl DistanceMetric for Cosine {
    fn name(&self) -> &'static str {
        "cosine"
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        1.0 - cosine_similarity(a, b)
    }
}

/// Cosine similarity computed in `f64` and clamped to `[-1, 1]`.
///
/// Identical non-zero vectors give exactly 1.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    let mut identical = a.len() == b.len();
    for (&x, &y) in a.iter().zip(b) {
        identical &= x == y;
        let x64 = f64::from(x);
        let y64 = f64::from(y);
        dot += x64 * y64;
        norm_a += x64 * x64;
        norm_b += y64 * y64;
    }
    if identical && norm_a > 0.0 {
        return 1.0;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot / denom).clamp(-1.0, 1.0)
}

/// Squared L2 distance; used to separate candidates the primary metric cannot.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}
