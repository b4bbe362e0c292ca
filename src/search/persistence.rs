//! Snapshot persistence backends for the vector store.
//!
//! The store needs nothing richer than get/set of one serialized blob under
//! a logical key. Three backends implement [`SnapshotStore`]:
//!
//! - [`FileSnapshotStore`]: `<dir>/<key>.json`, written via temp file + rename
//! - [`SqliteSnapshotStore`]: a single `snapshots` table
//! - [`MemorySnapshotStore`]: process-local map (tests, `memory` backend)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::error::{MatchError, Result};

/// Key/value blob storage used for full-snapshot persistence.
pub trait SnapshotStore: Send + Sync {
    /// Backend name for logs and stats.
    fn name(&self) -> &'static str;

    /// Read the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Build the backend named by `store.backend`.
pub fn open_snapshot_store(backend: &str, data_dir: &Path) -> Result<Box<dyn SnapshotStore>> {
    match backend.trim().to_lowercase().as_str() {
        "" | "file" => Ok(Box::new(FileSnapshotStore::new(data_dir))),
        "sqlite" => Ok(Box::new(SqliteSnapshotStore::open(
            data_dir.join("jobmatch.db"),
        )?)),
        "memory" => Ok(Box::new(MemorySnapshotStore::new())),
        other => Err(MatchError::Config(format!(
            "unknown store backend: {other}"
        ))),
    }
}

// =============================================================================
// File backend
// =============================================================================

/// One JSON file per key.
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(&path)?))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value)?;

        // Atomic rename
        match std::fs::rename(&temp_path, &path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                std::fs::remove_file(&path)?;
                std::fs::rename(&temp_path, &path)?;
            }
            Err(err) => {
                let _ = std::fs::remove_file(&temp_path);
                return Err(MatchError::Io(err));
            }
        }
        debug!(path = %path.display(), bytes = value.len(), "wrote snapshot");
        Ok(())
    }
}

// =============================================================================
// SQLite backend
// =============================================================================

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS snapshots (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    updated_at TEXT NOT NULL
);";

const SCHEMA_VERSION: u32 = 1;

/// Snapshots kept in a single SQLite table.
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }

    fn migrate(conn: &Connection) -> Result<()> {
        let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if current < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA).map_err(|err| {
                MatchError::Persistence(format!("snapshot schema migration failed: {err}"))
            })?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

// =============================================================================
// Memory backend
// =============================================================================

/// Process-local snapshots; lost on exit.
#[derive(Default)]
pub struct MemorySnapshotStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.blobs.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
