//! SQLite-backed record store.
//!
//! Stores the collection as a single table named after [`COLLECTION`], with
//! one column per document field. Timestamps are RFC 3339 UTC with a fixed
//! fraction width so that text ordering matches time ordering.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use super::{RecordFeed, Subscription, VaultStore, COLLECTION};
use crate::error::{LockboxError, Result};
use crate::record::{NewRecord, RecordId, RecordKind, VaultRecord};

/// Record store persisted in a SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<Inner>,
}

struct Inner {
    conn: Mutex<Connection>,
    feed: RecordFeed,
}

impl SqliteStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a throwaway store that lives only as long as this value.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                id TEXT PRIMARY KEY,
                payload TEXT NOT NULL CHECK (length(payload) > 0),
                type TEXT NOT NULL CHECK (type IN ('text', 'file')),
                userTag TEXT,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS "{table}_timestamp"
                ON "{table}" (timestamp DESC);
            "#,
            table = COLLECTION
        ))?;

        let initial = Self::load(&conn)?;
        debug!(records = initial.len(), "sqlite store opened");
        Ok(Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                feed: RecordFeed::new(initial),
            }),
        })
    }

    /// Re-read the table and publish it, picking up writes made by other
    /// processes sharing the file.
    pub fn refresh(&self) -> Result<()> {
        let records = {
            let conn = self.inner.lock()?;
            Self::load(&conn)?
        };
        self.inner.feed.publish(records);
        Ok(())
    }

    fn load(conn: &Connection) -> Result<Vec<VaultRecord>> {
        let mut stmt = conn.prepare(&format!(
            r#"SELECT id, payload, type, userTag, timestamp FROM "{}"
               ORDER BY timestamp DESC, rowid DESC"#,
            COLLECTION
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, payload, kind, user_tag, timestamp) = row?;
            records.push(Self::record_from_row(id, payload, kind, user_tag, timestamp)?);
        }
        Ok(records)
    }

    fn record_from_row(
        id: String,
        payload: String,
        kind: String,
        user_tag: Option<String>,
        timestamp: String,
    ) -> Result<VaultRecord> {
        let kind: RecordKind = kind.parse()?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| LockboxError::Storage(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);
        Ok(VaultRecord {
            id: RecordId::new(id),
            payload,
            kind,
            user_tag,
            timestamp: Some(timestamp),
        })
    }

    fn insert(&self, record: &NewRecord) -> Result<RecordId> {
        if record.payload.is_empty() {
            return Err(LockboxError::Storage("payload is required".to_string()));
        }

        let id = RecordId::new(Uuid::now_v7().to_string());
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let records = {
            let conn = self.inner.lock()?;
            conn.execute(
                &format!(
                    r#"INSERT INTO "{}" (id, payload, type, userTag, timestamp)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    COLLECTION
                ),
                (
                    id.as_str(),
                    record.payload.as_str(),
                    record.kind.as_str(),
                    record.user_tag.as_deref(),
                    timestamp.as_str(),
                ),
            )?;
            Self::load(&conn)?
        };
        debug!(id = %id, kind = %record.kind, "record appended");
        self.inner.feed.publish(records);
        Ok(id)
    }
}

impl Inner {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LockboxError::Storage("SQLite connection poisoned".to_string()))
    }
}

#[async_trait]
impl VaultStore for SqliteStore {
    async fn append(&self, record: &NewRecord) -> Result<RecordId> {
        let store = self.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || store.insert(&record))
            .await
            .map_err(|e| LockboxError::Storage(format!("Append task failed: {}", e)))?
    }

    fn subscribe(&self) -> Result<Subscription> {
        Ok(self.inner.feed.subscribe())
    }

    fn subscriber_count(&self) -> usize {
        self.inner.feed.subscriber_count()
    }
}
