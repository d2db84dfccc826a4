//! Greedy nearest-unused assignment of synthetic points to stored items.

use core_types::{ItemId, Vector};
use tracing::trace;

use crate::PathError;
use crate::metric::{Cosine, DistanceMetric, squared_euclidean};
use crate::space::VectorSpace;

/// Maps each point, in order, to the closest item not claimed by an earlier point.
///
/// There is no backtracking: an item claimed early stays claimed even if a
/// later point would have matched it better. Every point re-scans the whole
/// space.
///
/// Ranking is by metric distance. Equal distances fall back to squared
/// Euclidean distance, so an exact vector match beats a merely collinear one,
/// then to the caller's preferred ids, and finally to the space's iteration
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssigner<M = Cosine> {
    metric: M,
}

#[derive(Debug, Clone, Copy)]
struct Rank<'a> {
    index: usize,
    id: &'a ItemId,
    distance: f64,
    spread: f64,
    priority: usize,
}

impl Rank<'_> {
    // A full tie keeps the earlier index: the scan only replaces on a strict win.
    fn beats(&self, other: &Self) -> bool {
        self.distance
            .total_cmp(&other.distance)
            .then(self.spread.total_cmp(&other.spread))
            .then(self.priority.cmp(&other.priority))
            .is_lt()
    }
}

impl<M: DistanceMetric> GreedyAssigner<M> {
    pub const fn new(metric: M) -> Self {
        Self { metric }
    }

    pub const fn metric(&self) -> &M {
        &self.metric
    }

    /// Assign one distinct item id per point, preserving point order.
    pub fn assign(&self, points: &[Vector], space: &VectorSpace) -> Result<Vec<ItemId>, PathError> {
        self.assign_preferring(points, space, &[])
    }

    /// [`assign`](Self::assign), but a candidate listed in `preferred` wins
    /// over an unlisted one at the same distance and spread. Earlier entries
    /// win over later ones.
    ///
    /// Several ids can share one embedding; preferring the anchors keeps a
    /// duplicate from taking the point that sits exactly on an anchor.
    pub fn assign_preferring(
        &self,
        points: &[Vector],
        space: &VectorSpace,
        preferred: &[&ItemId],
    ) -> Result<Vec<ItemId>, PathError> {
        if points.len() > space.len() {
            return Err(PathError::ExhaustedCandidates {
                requested: points.len(),
                available: space.len(),
            });
        }

        let mut used = vec![false; space.len()];
        let mut assigned = Vec::with_capacity(points.len());

        for (step, point) in points.iter().enumerate() {
            if point.len() != space.dimension() {
                return Err(PathError::LengthMismatch {
                    expected: space.dimension(),
                    actual: point.len(),
                });
            }

            let best = self
                .nearest_unused(point, space, &used, preferred)
                .ok_or(PathError::ExhaustedCandidates {
                    requested: points.len(),
                    available: space.len(),
                })?;
            used[best.index] = true;

            trace!(
                step,
                id = %best.id,
                distance = best.distance,
                metric = self.metric.name(),
                "assigned synthetic point"
            );
            assigned.push(best.id.clone());
        }

        Ok(assigned)
    }

    fn nearest_unused<'s>(
        &self,
        point: &[f32],
        space: &'s VectorSpace,
        used: &[bool],
        preferred: &[&ItemId],
    ) -> Option<Rank<'s>> {
        let mut best: Option<Rank<'s>> = None;
        for (index, (id, candidate)) in space.iter().enumerate() {
            if used[index] {
                continue;
            }
            let distance = self.metric.distance(point, candidate);
            let rank = Rank {
                index,
                id,
                distance: if distance.is_nan() {
                    f64::INFINITY
                } else {
                    distance
                },
                spread: squared_euclidean(point, candidate),
                priority: preferred
                    .iter()
                    .position(|&wanted| wanted == id)
                    .unwrap_or(usize::MAX),
            };
            if best.as_ref().is_none_or(|current| rank.beats(current)) {
                best = Some(rank);
            }
        }
        best
    }
}
