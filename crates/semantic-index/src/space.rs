//! Read-only id → vector mapping for one collection.

use core_types::{ItemId, Vector};
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::PathError;

/// All embeddings of one collection, in a fixed iteration order.
///
/// Insertion order is the iteration order and is what breaks distance ties,
/// so the same entries in the same order always yield the same paths.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    items: IndexMap<ItemId, Vector>,
    dimension: usize,
}

/// One of the two caller-chosen endpoints, borrowed from its space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint<'a> {
    pub id: &'a ItemId,
    pub vector: &'a [f32],
}

impl VectorSpace {
    /// Build a space, checking it is non-empty, ids are unique and every
    /// vector has the dimension of the first one.
    pub fn new<I, K>(entries: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (K, Vector)>,
        K: Into<ItemId>,
    {
        let mut items = IndexMap::new();
        let mut dimension = None;

        for (id, vector) in entries {
            let id = id.into();
            let expected = *dimension.get_or_insert(vector.len());
            if vector.len() != expected {
                return Err(PathError::DimensionMismatch {
                    id,
                    expected,
                    actual: vector.len(),
                });
            }
            match items.entry(id) {
                Entry::Occupied(slot) => return Err(PathError::DuplicateItem(slot.key().clone())),
                Entry::Vacant(slot) => {
                    slot.insert(vector);
                }
            }
        }

        let dimension = dimension.ok_or(PathError::EmptySpace)?;
        Ok(Self { items, dimension })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.items.get(id).map(Vec::as_slice)
    }

    /// Resolve an anchor id, failing with `UnknownAnchor` when absent.
    pub fn anchor(&self, id: &str) -> Result<AnchorPoint<'_>, PathError> {
        self.items
            .get_key_value(id)
            .map(|(id, vector)| AnchorPoint {
                id,
                vector: vector.as_slice(),
            })
            .ok_or_else(|| PathError::UnknownAnchor(ItemId::from(id)))
    }

    /// Entry at a position in iteration order.
    pub fn get_index(&self, index: usize) -> Option<(&ItemId, &[f32])> {
        self.items
            .get_index(index)
            .map(|(id, vector)| (id, vector.as_slice()))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&ItemId, &[f32])> + '_ {
        self.items.iter().map(|(id, vector)| (id, vector.as_slice()))
    }
}
