#![forbid(unsafe_code)]

//! Sqlite-backed chart store. The whole saved-chart collection lives under one
//! key in a kv table and is rewritten on every mutation; the open store keeps
//! a hydrated copy in memory and reads never touch the database.

use om_core::{ChartEdge, ChartNode, ChartSnapshot};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const DB_FILE: &str = "orgmap.db";
const CHARTS_KEY: &str = "org-charts";

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Json(serde_json::Error),
    InvalidInput(&'static str),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug)]
pub struct ChartStore {
    storage_dir: PathBuf,
    conn: Connection,
    charts: Vec<ChartSnapshot>,
}

impl ChartStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;
        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrate(&conn)?;
        let charts = hydrate(&conn)?;
        debug!(
            dir = %storage_dir.display(),
            charts = charts.len(),
            "chart store opened"
        );
        Ok(Self {
            storage_dir,
            conn,
            charts,
        })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Every saved chart, in the order saves first happened. Never sorted.
    pub fn charts(&self) -> &[ChartSnapshot] {
        &self.charts
    }

    /// Exact-name membership test. No trimming, no case folding.
    pub fn exists(&self, name: &str) -> bool {
        self.charts.iter().any(|chart| chart.name == name)
    }

    /// Saves `{nodes, edges}` under `name`. A fresh name is appended to the
    /// collection; a taken name is overwritten in place, keeping its
    /// `created_at_ms` and its position in the listing.
    pub fn save(
        &mut self,
        name: &str,
        nodes: Vec<ChartNode>,
        edges: Vec<ChartEdge>,
    ) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("chart name must not be blank"));
        }
        let now_ms = now_ms();
        match self.charts.iter().position(|chart| chart.name == name) {
            Some(index) => {
                let existing = &mut self.charts[index];
                existing.nodes = nodes;
                existing.edges = edges;
                existing.updated_at_ms = now_ms;
            }
            None => self.charts.push(ChartSnapshot {
                name: name.to_string(),
                nodes,
                edges,
                created_at_ms: now_ms,
                updated_at_ms: now_ms,
            }),
        }
        self.persist()?;
        debug!(name, "chart saved");
        Ok(())
    }

    /// First chart saved under `name`, if any.
    pub fn load(&self, name: &str) -> Option<&ChartSnapshot> {
        self.charts.iter().find(|chart| chart.name == name)
    }

    /// Deletes every chart named `name`. Returns whether anything was removed;
    /// an absent name is a no-op that does not rewrite storage.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let before = self.charts.len();
        self.charts.retain(|chart| chart.name != name);
        if self.charts.len() == before {
            return Ok(false);
        }
        self.persist()?;
        debug!(name, "chart deleted");
        Ok(true)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&self.charts)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv(key, value) VALUES (?1, ?2)",
            params![CHARTS_KEY, blob],
        )?;
        Ok(())
    }
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS kv (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Reads the stored collection. A blob that fails to decode is reported and
/// treated as empty; the stored bytes are left alone until the next save.
fn hydrate(conn: &Connection) -> Result<Vec<ChartSnapshot>, StoreError> {
    let blob: Option<String> = conn
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![CHARTS_KEY],
            |row| row.get(0),
        )
        .optional()?;
    let Some(blob) = blob else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&blob) {
        Ok(charts) => Ok(charts),
        Err(err) => {
            warn!(%err, "saved charts failed to decode, starting empty");
            Ok(Vec::new())
        }
    }
}

fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}
