//! Command-line surface for llm-interpolate.
//!
//! `main.rs` only wires process concerns (dotenv, stdout/stderr, exit status);
//! argument handling, request resolution and error classification live here
//! so they can be tested without spawning the binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use core_types::config::{EMBEDDINGS_DB_ENV, InterpolateConfig};
use embedding_store::{CollectionSource, StoreError};
use semantic_index::{InterpolatedPath, MIN_PATH_LEN, PathError, generate_path};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

mod logging;

pub use logging::init_tracing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interpolate between embeddings in a collection.
///
/// Walks from START_ID to END_ID through the items of COLLECTION that lie
/// nearest to evenly spaced points on the line between their embeddings, and
/// prints the walk as a JSON array of ids:
///
///     llm-interpolate my_song_collection "RapSong.wav" "CountrySong.wav" -n 10
#[derive(Parser, Debug)]
#[command(name = "llm-interpolate", version, verbatim_doc_comment)]
pub struct Cli {
    /// Collection holding the embeddings.
    pub collection: String,
    /// Id of the item the walk starts at.
    pub start_id: String,
    /// Id of the item the walk ends at.
    pub end_id: String,
    /// Number of points between the start and end embedding [default: 10]
    #[arg(short = 'n', allow_negative_numbers = true)]
    pub n: Option<i64>,
    /// Method of interpolation between start and end embeddings [default: linear]
    #[arg(long)]
    pub method: Option<String>,
    /// SQLite database file containing embeddings
    #[arg(short = 'd', long, env = EMBEDDINGS_DB_ENV)]
    pub database: Option<PathBuf>,
    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A fully resolved request: flags merged over config defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub collection: String,
    pub start_id: String,
    pub end_id: String,
    pub count: i64,
    pub method: String,
}

impl Request {
    pub fn from_cli(cli: &Cli, defaults: &InterpolateConfig) -> Self {
        Self {
            collection: cli.collection.clone(),
            start_id: cli.start_id.clone(),
            end_id: cli.end_id.clone(),
            count: cli
                .n
                .unwrap_or_else(|| i64::try_from(defaults.count).unwrap_or(i64::MAX)),
            method: cli
                .method
                .clone()
                .unwrap_or_else(|| defaults.method.clone()),
        }
    }
}

/// Load the collection from `source` and build the path.
///
/// The collection is resolved before any argument is checked, so an unknown
/// collection is reported ahead of a bad count.
pub fn interpolate<S: CollectionSource>(source: &S, request: &Request) -> Result<InterpolatedPath> {
    let space = source
        .load(&request.collection)
        .with_context(|| format!("loading collection {:?}", request.collection))?;

    let count = usize::try_from(request.count).map_err(|_| PathError::InvalidCount {
        count: request.count,
        minimum: MIN_PATH_LEN,
    })?;

    let path = generate_path(
        &space,
        &request.start_id,
        &request.end_id,
        count,
        &request.method,
    )?;
    debug!(
        collection = %request.collection,
        method = %request.method,
        len = path.len(),
        "generated path"
    );
    Ok(path)
}

/// JSON array of ids, one per line, four-space indented.
pub fn render_json(path: &InterpolatedPath) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    path.serialize(&mut serializer)
        .context("serializing path")?;
    String::from_utf8(out).context("path JSON was not UTF-8")
}

pub mod exit {
    pub const FAILURE: u8 = 1;
    pub const UNKNOWN_COLLECTION: u8 = 3;
    pub const UNKNOWN_ANCHOR: u8 = 4;
    pub const INVALID_COUNT: u8 = 5;
    pub const UNKNOWN_METHOD: u8 = 6;
    pub const EXHAUSTED_CANDIDATES: u8 = 7;
    pub const END_ANCHOR_UNREACHABLE: u8 = 8;
    pub const INVALID_DATA: u8 = 9;
}

/// Process exit status for an error, by the first classified cause in its chain.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(store) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store);
        }
        if let Some(path) = cause.downcast_ref::<PathError>() {
            return path_exit_code(path);
        }
    }
    exit::FAILURE
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::UnknownCollection { .. } => exit::UNKNOWN_COLLECTION,
        StoreError::InvalidEmbedding { .. } => exit::INVALID_DATA,
        StoreError::Space(path) => path_exit_code(path),
        StoreError::MissingDatabase(_) | StoreError::Sqlite(_) => exit::FAILURE,
    }
}

const fn path_exit_code(err: &PathError) -> u8 {
    match err {
        PathError::UnknownAnchor(_) => exit::UNKNOWN_ANCHOR,
        PathError::InvalidCount { .. } => exit::INVALID_COUNT,
        PathError::UnknownMethod { .. } => exit::UNKNOWN_METHOD,
        PathError::ExhaustedCandidates { .. } => exit::EXHAUSTED_CANDIDATES,
        PathError::EndAnchorUnreachable(_) => exit::END_ANCHOR_UNREACHABLE,
        PathError::DimensionMismatch { .. }
        | PathError::LengthMismatch { .. }
        | PathError::EmptySpace
        | PathError::DuplicateItem(_) => exit::INVALID_DATA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedding_store::{EmbeddingStore, InMemoryStore, encode_embedding};
    use rusqlite::{Connection, params};
    use semantic_index::VectorSpace;
    use tempfile::{TempDir, tempdir};

    fn entries_db() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE collections (id INTEGER PRIMARY KEY, name TEXT UNIQUE, model TEXT);
             CREATE TABLE embeddings (
                 collection_id INTEGER, id TEXT, embedding BLOB,
                 PRIMARY KEY (collection_id, id)
             );
             INSERT INTO collections (id, name, model) VALUES (1, 'entries', 'simple-embeddings');",
        )
        .unwrap();
        for i in 1..=10u8 {
            let x = f32::from(i);
            let vector = [x, f32::from(i * i % 7), 1.0, (x * 0.7).sin()];
            conn.execute(
                "INSERT INTO embeddings (collection_id, id, embedding) VALUES (1, ?1, ?2)",
                params![i.to_string(), encode_embedding(&vector)],
            )
            .unwrap();
        }
        (dir, path)
    }

    fn request(count: i64, method: &str) -> Request {
        Request {
            collection: "entries".into(),
            start_id: "1".into(),
            end_id: "10".into(),
            count,
            method: method.into(),
        }
    }

    #[test]
    fn linear_walks_end_at_requested_id() {
        let (_dir, db) = entries_db();
        let store = EmbeddingStore::open(&db).unwrap();
        for n in [2, 5, 10] {
            let path = interpolate(&store, &request(n, "linear")).unwrap();
            let json: Vec<String> = serde_json::from_str(&render_json(&path).unwrap()).unwrap();
            assert_eq!(json.len(), usize::try_from(n).unwrap());
            assert_eq!(json.first().map(String::as_str), Some("1"));
            assert_eq!(json.last().map(String::as_str), Some("10"));
        }
    }

    #[test]
    fn rendered_json_is_one_id_per_line() {
        let space = VectorSpace::new([("a", vec![1.0, 0.0]), ("b", vec![0.0, 1.0])]).unwrap();
        let mut store = InMemoryStore::new();
        store.insert("c", space);
        let req = Request {
            collection: "c".into(),
            start_id: "a".into(),
            end_id: "b".into(),
            count: 2,
            method: "linear".into(),
        };
        let path = interpolate(&store, &req).unwrap();
        assert_eq!(render_json(&path).unwrap(), "[\n    \"a\",\n    \"b\"\n]");
    }

    #[test]
    fn error_kinds_map_to_distinct_exit_codes() {
        let (_dir, db) = entries_db();
        let store = EmbeddingStore::open(&db).unwrap();

        let code = |req: Request| exit_code(&interpolate(&store, &req).unwrap_err());

        let mut req = request(5, "linear");
        req.collection = "missing".into();
        assert_eq!(code(req), exit::UNKNOWN_COLLECTION);

        let mut req = request(-3, "linear");
        req.collection = "missing".into();
        assert_eq!(code(req), exit::UNKNOWN_COLLECTION);

        let mut req = request(5, "linear");
        req.start_id = "nope".into();
        assert_eq!(code(req), exit::UNKNOWN_ANCHOR);

        assert_eq!(code(request(1, "linear")), exit::INVALID_COUNT);
        assert_eq!(code(request(-3, "linear")), exit::INVALID_COUNT);
        assert_eq!(code(request(5, "spherical")), exit::UNKNOWN_METHOD);
        assert_eq!(code(request(11, "linear")), exit::EXHAUSTED_CANDIDATES);
    }

    #[test]
    fn unclassified_errors_use_generic_failure() {
        let dir = tempdir().unwrap();
        let err = EmbeddingStore::open(dir.path().join("absent.db"))
            .map(|_| ())
            .context("opening store")
            .unwrap_err();
        assert_eq!(exit_code(&err), exit::FAILURE);
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), exit::FAILURE);
    }

    #[test]
    fn invalid_data_exit_code_through_store() {
        let err = anyhow::Error::from(StoreError::Space(PathError::EmptySpace));
        assert_eq!(exit_code(&err), exit::INVALID_DATA);
    }

    #[test]
    fn cli_defaults_come_from_config() {
        let cli = Cli::try_parse_from(["llm-interpolate", "songs", "a.wav", "b.wav"]).unwrap();
        let defaults = InterpolateConfig {
            count: 7,
            method: "linear".into(),
        };
        let req = Request::from_cli(&cli, &defaults);
        assert_eq!(req.count, 7);
        assert_eq!(req.method, "linear");
        assert_eq!(req.collection, "songs");
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "llm-interpolate",
            "songs",
            "a.wav",
            "b.wav",
            "-n",
            "-2",
            "--method",
            "spherical",
            "-d",
            "/tmp/e.db",
        ])
        .unwrap();
        let req = Request::from_cli(&cli, &InterpolateConfig::default());
        assert_eq!(req.count, -2);
        assert_eq!(req.method, "spherical");
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/e.db")));
    }
}
