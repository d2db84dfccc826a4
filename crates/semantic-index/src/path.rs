//! Orchestration: interpolate, assign, then pin the end anchor.

use core_types::ItemId;
use serde::Serialize;
use tracing::debug;

use crate::PathError;
use crate::assign::GreedyAssigner;
use crate::endpoint::enforce_end_anchor;
use crate::interpolate::{InterpolationMethod, Interpolator};
use crate::metric::{Cosine, DistanceMetric};
use crate::space::{AnchorPoint, VectorSpace};

/// Shortest path that can hold both anchors.
pub const MIN_PATH_LEN: usize = 2;

/// Ordered item ids from the start anchor to the end anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterpolatedPath(Vec<ItemId>);

impl InterpolatedPath {
    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&ItemId> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&ItemId> {
        self.0.last()
    }

    pub fn into_ids(self) -> Vec<ItemId> {
        self.0
    }
}

impl IntoIterator for InterpolatedPath {
    type Item = ItemId;
    type IntoIter = std::vec::IntoIter<ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Public entry point: a walk through `space` approximating the straight line
/// between two of its items.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathGenerator<M = Cosine> {
    assigner: GreedyAssigner<M>,
}

impl<M: DistanceMetric> PathGenerator<M> {
    pub const fn new(metric: M) -> Self {
        Self {
            assigner: GreedyAssigner::new(metric),
        }
    }

    /// Resolve anchors and the named method, then build an `n`-item path.
    pub fn generate(
        &self,
        space: &VectorSpace,
        start_id: &str,
        end_id: &str,
        n: usize,
        method: &str,
    ) -> Result<InterpolatedPath, PathError> {
        let start = space.anchor(start_id)?;
        let end = space.anchor(end_id)?;
        let method = InterpolationMethod::from_name(method)?;
        self.generate_with(space, start, end, n, &method)
    }

    /// Same as [`generate`](Self::generate) with already-resolved anchors and
    /// any interpolation strategy.
    pub fn generate_with<I: Interpolator>(
        &self,
        space: &VectorSpace,
        start: AnchorPoint<'_>,
        end: AnchorPoint<'_>,
        n: usize,
        interpolator: &I,
    ) -> Result<InterpolatedPath, PathError> {
        if n < MIN_PATH_LEN {
            return Err(PathError::invalid_count(n, MIN_PATH_LEN));
        }
        if n > space.len() {
            return Err(PathError::ExhaustedCandidates {
                requested: n,
                available: space.len(),
            });
        }

        let points = interpolator.interpolate(start.vector, end.vector, n)?;
        debug!(
            start = %start.id,
            end = %end.id,
            points = points.len(),
            candidates = space.len(),
            "interpolated synthetic points"
        );

        let assigned = self
            .assigner
            .assign_preferring(&points, space, &[start.id, end.id])?;
        let ids = enforce_end_anchor(assigned, end.id)?;
        Ok(InterpolatedPath(ids))
    }
}

/// [`PathGenerator::generate`] with cosine distance.
pub fn generate_path(
    space: &VectorSpace,
    start_id: &str,
    end_id: &str,
    n: usize,
    method: &str,
) -> Result<InterpolatedPath, PathError> {
    PathGenerator::new(Cosine).generate(space, start_id, end_id, n, method)
}
