//! Embedding collections as stored by the `llm` tool.
//!
//! The database holds a `collections` table (`id`, `name`, `model`) and an
//! `embeddings` table whose `embedding` column is a packed little-endian
//! `f32` array. This crate only reads: a collection is loaded once into an
//! immutable [`VectorSpace`] and the interpolation core never touches SQLite.

use std::path::{Path, PathBuf};

use core_types::{ItemId, Vector};
use indexmap::IndexMap;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use semantic_index::{PathError, VectorSpace};
use thiserror::Error;
use tracing::{debug, info};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("embeddings database not found: {}", .0.display())]
    MissingDatabase(PathBuf),
    #[error("unknown collection {name:?} (known: {})", known_list(.known))]
    UnknownCollection { name: String, known: Vec<String> },
    #[error("item {id:?} has an invalid embedding blob of {len} bytes")]
    InvalidEmbedding { id: ItemId, len: usize },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Space(#[from] PathError),
}

fn known_list(known: &[String]) -> String {
    if known.is_empty() {
        "none".to_string()
    } else {
        known.join(", ")
    }
}

/// Anything that can hand out a collection as a [`VectorSpace`].
pub trait CollectionSource {
    /// Load `collection`, failing with [`StoreError::UnknownCollection`] if it does not exist.
    fn load(&self, collection: &str) -> Result<VectorSpace>;
}

/// Read-only view of an `llm` embeddings database.
pub struct EmbeddingStore {
    conn: Connection,
    path: PathBuf,
}

impl EmbeddingStore {
    /// Open an existing database read-only. A missing file is an error, not a new database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::MissingDatabase(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "opened embeddings database");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all collections, sorted.
    pub fn collections(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM collections ORDER BY name ASC")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    fn collection_id(&self, name: &str) -> Result<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM collections WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}

impl CollectionSource for EmbeddingStore {
    fn load(&self, collection: &str) -> Result<VectorSpace> {
        let Some(collection_id) = self.collection_id(collection)? else {
            return Err(StoreError::UnknownCollection {
                name: collection.to_string(),
                known: self.collections()?,
            });
        };

        // rowid order is the space's iteration order, which breaks distance ties.
        let mut stmt = self.conn.prepare(
            "SELECT id, embedding FROM embeddings
             WHERE collection_id = ?1
             ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![collection_id], |row| {
            let id = item_id_from_sql(row.get_ref(0)?);
            let blob: Vec<u8> = row.get(1)?;
            Ok((id, blob))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, blob) = row?;
            let Some(vector) = decode_embedding(&blob) else {
                return Err(StoreError::InvalidEmbedding { id, len: blob.len() });
            };
            entries.push((id, vector));
        }

        let space = VectorSpace::new(entries)?;
        info!(
            collection,
            items = space.len(),
            dimension = space.dimension(),
            "loaded collection"
        );
        Ok(space)
    }
}

// `llm` declares `id` as TEXT, but SQLite does not enforce column types.
fn item_id_from_sql(value: ValueRef<'_>) -> ItemId {
    match value {
        ValueRef::Null => ItemId::from(""),
        ValueRef::Integer(i) => ItemId::from(i.to_string()),
        ValueRef::Real(f) => ItemId::from(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            ItemId::from(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Decode a packed little-endian `f32` blob. `None` if the length is not a multiple of 4.
pub fn decode_embedding(blob: &[u8]) -> Option<Vector> {
    if blob.len() % 4 != 0 {
        return None;
    }
    Some(
        blob.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

/// Pack a vector the way `llm` stores it.
pub fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(std::mem::size_of_val(vector));
    for &value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Collections held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    collections: IndexMap<String, VectorSpace>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, space: VectorSpace) -> &mut Self {
        self.collections.insert(name.into(), space);
        self
    }
}

impl CollectionSource for InMemoryStore {
    fn load(&self, collection: &str) -> Result<VectorSpace> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::UnknownCollection {
                name: collection.to_string(),
                known: self.collections.keys().cloned().collect(),
            })
    }
}
