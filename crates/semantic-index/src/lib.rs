//! Interpolated walks through an embedding collection.
//!
//! Given two anchor items, [`PathGenerator`] places evenly spaced synthetic
//! points on the line between their vectors, greedily maps each point to the
//! nearest item not already used, and makes sure the walk ends on the end
//! anchor. Everything here is pure and synchronous; the [`VectorSpace`] is a
//! read-only snapshot supplied by the caller.

pub mod assign;
pub mod endpoint;
mod error;
pub mod interpolate;
pub mod metric;
pub mod path;
pub mod space;

pub use assign::GreedyAssigner;
pub use endpoint::enforce_end_anchor;
pub use error::PathError;
pub use interpolate::{InterpolationMethod, Interpolator, Linear};
pub use metric::{Cosine, DistanceMetric};
pub use path::{InterpolatedPath, MIN_PATH_LEN, PathGenerator, generate_path};
pub use space::{AnchorPoint, VectorSpace};
