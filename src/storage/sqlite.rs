//! SQLite storage backend implementation
//!
//! rusqlite behind a deadpool-sqlite connection pool. Blocking statements run
//! inside `interact` closures on the pool's worker threads.

use crate::error::{AulaSenseError, Result};
use crate::storage::StorageBackend;
use crate::types::{is_blank_payload, Classroom, ClassroomId, StoredSubmission, Teacher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_sqlite::{Config, Pool, Runtime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS teachers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE,
    password TEXT,
    aula_id INTEGER
);

CREATE TABLE IF NOT EXISTS aulas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT
);

CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aula_id INTEGER,
    data TEXT,
    created_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_responses_aula ON responses (aula_id, created_at);
"#;

/// Classrooms created on first start
pub const SEED_CLASSROOMS: [&str; 5] = [
    "1ro de Secundaria",
    "2do de Secundaria",
    "3ro de Secundaria",
    "4to de Secundaria",
    "5to de Secundaria",
];

const SUBMISSION_COLUMNS: &str = "SELECT id, aula_id, data, created_at FROM responses";

/// SQLite storage backend
pub struct SqliteStorage {
    pool: Pool,
}

impl SqliteStorage {
    /// Open (creating if missing) the database at `db_path`
    ///
    /// Call [`SqliteStorage::init`] before first use to create the schema.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();
        info!("Opening SQLite database: {}", path_str);

        let pool = Config::new(path_str).create_pool(Runtime::Tokio1).map_err(|e| {
            AulaSenseError::Database(format!("Failed to create connection pool: {}", e))
        })?;

        Ok(Self { pool })
    }

    /// Open the database and make sure schema and seed data exist
    pub async fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let storage = Self::new(db_path)?;
        storage.init().await?;
        Ok(storage)
    }

    /// Run a closure against a pooled connection
    async fn interact<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.get().await.map_err(|e| {
            AulaSenseError::Database(format!("Failed to get connection from pool: {}", e))
        })?;

        conn.interact(f)
            .await
            .map_err(|e| AulaSenseError::Database(format!("Pool interaction failed: {}", e)))?
    }

    /// Create tables and seed classrooms and teachers when empty
    ///
    /// Safe to call repeatedly.
    pub async fn init(&self) -> Result<()> {
        self.interact(|conn| {
            conn.execute_batch(SCHEMA)?;

            let tx = conn.transaction()?;

            let classrooms: i64 = tx.query_row("SELECT COUNT(*) FROM aulas", [], |r| r.get(0))?;
            if classrooms == 0 {
                for nombre in SEED_CLASSROOMS {
                    tx.execute("INSERT INTO aulas (nombre) VALUES (?1)", params![nombre])?;
                }
                info!("Seeded {} classrooms", SEED_CLASSROOMS.len());
            }

            let teachers: i64 = tx.query_row("SELECT COUNT(*) FROM teachers", [], |r| r.get(0))?;
            if teachers == 0 {
                for i in 1..=SEED_CLASSROOMS.len() as i64 {
                    tx.execute(
                        "INSERT INTO teachers (username, password, aula_id) VALUES (?1, ?2, ?3)",
                        params![format!("profesor{}", i), format!("pass{}", i), i],
                    )?;
                }
                info!("Seeded {} teacher accounts", SEED_CLASSROOMS.len());
            }

            tx.commit()?;
            Ok(())
        })
        .await?;

        debug!("Database schema ready");
        Ok(())
    }

    fn row_to_submission(row: &Row<'_>) -> rusqlite::Result<StoredSubmission> {
        let id: i64 = row.get(0)?;
        let raw: Option<String> = row.get(2)?;
        let created_at: DateTime<Utc> = row.get(3)?;

        let data = raw.as_deref().and_then(|text| match serde_json::from_str(text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Submission {} has undecodable payload: {}", id, e);
                None
            }
        });

        Ok(StoredSubmission {
            id,
            aula_id: ClassroomId(row.get(1)?),
            created_at,
            data,
        })
    }

    fn query_submissions(
        conn: &Connection,
        sql: &str,
        classroom: Option<ClassroomId>,
    ) -> Result<Vec<StoredSubmission>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = match classroom {
            Some(id) => stmt.query_map(params![id.0], Self::row_to_submission)?,
            None => stmt.query_map([], Self::row_to_submission)?,
        };
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Teacher>> {
        let username = username.to_string();
        let password = password.to_string();

        self.interact(move |conn| {
            let teacher = conn
                .query_row(
                    "SELECT id, username, aula_id FROM teachers WHERE username = ?1 AND password = ?2",
                    params![username, password],
                    |row| {
                        Ok(Teacher {
                            id: row.get(0)?,
                            username: row.get(1)?,
                            aula_id: row.get::<_, Option<i64>>(2)?.map(ClassroomId),
                        })
                    },
                )
                .optional()?;
            Ok(teacher)
        })
        .await
    }

    async fn list_classrooms(&self) -> Result<Vec<Classroom>> {
        self.interact(|conn| {
            let mut stmt = conn.prepare("SELECT id, nombre FROM aulas ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(Classroom {
                    id: ClassroomId(row.get(0)?),
                    nombre: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    async fn append_submission(&self, classroom: ClassroomId, payload: &Value) -> Result<()> {
        if classroom.0 <= 0 {
            return Err(AulaSenseError::Validation("Falta aulaId".to_string()));
        }
        if is_blank_payload(payload) {
            return Err(AulaSenseError::Validation("Falta data".to_string()));
        }

        let data = serde_json::to_string(payload)?;
        let created_at = Utc::now();

        self.interact(move |conn| {
            conn.execute(
                "INSERT INTO responses (aula_id, data, created_at) VALUES (?1, ?2, ?3)",
                params![classroom.0, data, created_at],
            )?;
            Ok(())
        })
        .await?;

        debug!("Stored submission for classroom {}", classroom);
        Ok(())
    }

    async fn list_submissions(&self, classroom: ClassroomId) -> Result<Vec<StoredSubmission>> {
        self.interact(move |conn| {
            let sql = format!(
                "{} WHERE aula_id = ?1 ORDER BY created_at DESC, id DESC",
                SUBMISSION_COLUMNS
            );
            Self::query_submissions(conn, &sql, Some(classroom))
        })
        .await
    }

    async fn list_all_submissions(&self) -> Result<Vec<StoredSubmission>> {
        self.interact(|conn| {
            let sql = format!("{} ORDER BY created_at DESC, id DESC", SUBMISSION_COLUMNS);
            Self::query_submissions(conn, &sql, None)
        })
        .await
    }
}
