//! Pinning the end anchor to the last position of an assigned path.

use core_types::ItemId;
use tracing::debug;

use crate::PathError;

/// Make `end` the final element without changing the length.
///
/// If `end` was claimed by an earlier point, that occurrence is moved to the
/// back. A sequence already ending in `end` is returned untouched.
pub fn enforce_end_anchor(mut assigned: Vec<ItemId>, end: &ItemId) -> Result<Vec<ItemId>, PathError> {
    if assigned.last() == Some(end) {
        return Ok(assigned);
    }

    let position = assigned
        .iter()
        .position(|id| id == end)
        .ok_or_else(|| PathError::EndAnchorUnreachable(end.clone()))?;

    let moved = assigned.remove(position);
    debug!(id = %moved, from = position, "moved end anchor to the end of the path");
    assigned.push(moved);
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(ids: &[&str]) -> Vec<ItemId> {
        ids.iter().copied().map(ItemId::from).collect()
    }

    #[test]
    fn already_terminated_is_unchanged() {
        let input = path(&["1", "2", "3"]);
        let out = enforce_end_anchor(input.clone(), &ItemId::from("3")).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn earlier_occurrence_is_moved_last() {
        let out = enforce_end_anchor(path(&["1", "4", "2", "3"]), &ItemId::from("4")).unwrap();
        assert_eq!(out, path(&["1", "2", "3", "4"]));
    }

    #[test]
    fn idempotent() {
        let end = ItemId::from("4");
        let once = enforce_end_anchor(path(&["4", "1", "2"]), &end).unwrap();
        let twice = enforce_end_anchor(once.clone(), &end).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_end_is_unreachable() {
        let err = enforce_end_anchor(path(&["1", "2"]), &ItemId::from("9")).unwrap_err();
        assert_eq!(err, PathError::EndAnchorUnreachable(ItemId::from("9")));

        let err = enforce_end_anchor(Vec::new(), &ItemId::from("9")).unwrap_err();
        assert_eq!(err, PathError::EndAnchorUnreachable(ItemId::from("9")));
    }
}
