use core_types::ItemId;
use thiserror::Error;

/// Everything that can stop a path from being produced. All variants are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("unknown anchor id {0:?}: not present in the collection")]
    UnknownAnchor(ItemId),
    #[error("invalid count {count}: at least {minimum} points are required")]
    InvalidCount { count: i64, minimum: usize },
    #[error("unknown interpolation method {name:?} (available: {available})")]
    UnknownMethod { name: String, available: String },
    #[error("requested {requested} points but only {available} distinct items are available")]
    ExhaustedCandidates { requested: usize, available: usize },
    #[error("end anchor {0:?} does not occur in the assigned path")]
    EndAnchorUnreachable(ItemId),
    #[error("item {id:?} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        id: ItemId,
        expected: usize,
        actual: usize,
    },
    #[error("vector length {actual} does not match dimension {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("vector space is empty")]
    EmptySpace,
    #[error("duplicate item id {0:?}")]
    DuplicateItem(ItemId),
}

impl PathError {
    pub(crate) fn invalid_count(count: usize, minimum: usize) -> Self {
        Self::InvalidCount {
            count: i64::try_from(count).unwrap_or(i64::MAX),
            minimum,
        }
    }
}
