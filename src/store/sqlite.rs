use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{GrabberError, Result};
use crate::domain::{ArticleRecord, FeedEntry, Metadata};
use crate::store::ArticleStore;

const ARTICLE_COLUMNS: &str = "id, link, metadata, text, created_at, populated_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;
        migrations.to_latest(&mut conn)?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            GrabberError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<ArticleRecord> {
        let raw_metadata: String = row.get(2)?;
        let metadata: Metadata = serde_json::from_str(&raw_metadata)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

        Ok(ArticleRecord {
            id: row.get(0)?,
            link: row.get(1)?,
            metadata,
            text: row.get(3)?,
            created_at: row
                .get::<_, String>(4)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            populated_at: row
                .get::<_, Option<String>>(5)?
                .and_then(|s| Self::parse_datetime(&s)),
        })
    }
}

impl ArticleStore for SqliteStore {
    fn find_by_link(&self, link: &str) -> Result<Option<ArticleRecord>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE link = ?1"),
                params![link],
                Self::row_to_article,
            )
            .optional()?;

        Ok(result)
    }

    fn insert(&self, entry: &FeedEntry) -> Result<ArticleRecord> {
        let metadata = serde_json::to_string(&entry.metadata)?;
        let conn = self.lock()?;

        let inserted = conn.execute(
            "INSERT INTO articles (link, metadata, created_at) VALUES (?1, ?2, ?3)",
            params![entry.link, metadata, Utc::now().to_rfc3339()],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(GrabberError::DuplicateKey(entry.link.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        let id = conn.last_insert_rowid();
        let record = conn.query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?1"),
            params![id],
            Self::row_to_article,
        )?;

        Ok(record)
    }

    fn save(&self, record: &ArticleRecord) -> Result<bool> {
        let conn = self.lock()?;

        let populated_at = record.text.as_ref().map(|_| Utc::now().to_rfc3339());

        // Only an unpopulated row can be claimed, so text never regresses.
        let written = conn.execute(
            "UPDATE articles SET text = ?1, populated_at = ?2
             WHERE link = ?3 AND (text IS NULL OR text = '')",
            params![record.text, populated_at, record.link],
        )?;

        if written > 0 {
            return Ok(true);
        }

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE link = ?1)",
            params![record.link],
            |row| row.get(0),
        )?;

        if exists {
            Ok(false)
        } else {
            Err(GrabberError::NotFound(record.link.clone()))
        }
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
