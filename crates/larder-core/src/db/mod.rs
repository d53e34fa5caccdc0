//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `items` - Inventory item CRUD
//! - `reminders` - Expiration reminder storage
//! - `prices` - Price ledger upserts and lookups
//! - `spending` - Aggregate queries backing spend analytics

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{info, warn};

use crate::error::Result;

mod items;
mod prices;
mod reminders;
mod spending;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Storage format for timestamps (UTC), matching SQLite's CURRENT_TIMESTAMP
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a SQLite datetime string into a DateTime<Utc>
///
/// A malformed value is logged and read as the current time.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|e| {
            warn!(value = %s, error = %e, "Malformed timestamp, using current time");
            Utc::now()
        })
}

/// Format a timestamp the way SQLite's CURRENT_TIMESTAMP does
pub(crate) fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parse a stored `YYYY-MM-DD` column, surfacing bad rows as conversion errors
pub(crate) fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    ///
    /// Fails if the file cannot be opened or the schema cannot be applied;
    /// callers treat that as fatal at startup.
    pub fn new(path: &str) -> Result<Self> {
        // Foreign keys are a per-connection setting in SQLite, so every pooled
        // connection turns them on (reminders cascade on item delete).
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self { pool };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection would otherwise see its own empty in-memory database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "larder_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().to_string();

        // Remove any existing file
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path, suffix));
        }

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers (API requests vs. timer sweeps)
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Inventory items
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                brand TEXT,
                location TEXT NOT NULL CHECK (location IN ('Pantry', 'Fridge', 'Freezer')),
                purchase_date DATE NOT NULL,
                best_by_date DATE NOT NULL,
                price REAL NOT NULL DEFAULT 0 CHECK (price >= 0),
                image_path TEXT,
                spoiled BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_items_best_by ON items(best_by_date);
            CREATE INDEX IF NOT EXISTS idx_items_purchase ON items(purchase_date);

            -- Expiration reminders
            CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY,
                item_id INTEGER REFERENCES items(id) ON DELETE CASCADE,
                item_name TEXT NOT NULL,                   -- captured at creation
                message TEXT NOT NULL,
                closed BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_reminders_item ON reminders(item_id, closed);
            CREATE INDEX IF NOT EXISTS idx_reminders_closed ON reminders(closed, created_at);

            -- Price ledger (no FK to items: history survives edits and deletes)
            CREATE TABLE IF NOT EXISTS price_history (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                brand TEXT,                                -- NULL = no brand
                price REAL NOT NULL,
                recorded_on DATE NOT NULL
            );

            -- One entry per (name, brand, day); COALESCE so NULL brands collide
            CREATE UNIQUE INDEX IF NOT EXISTS idx_price_history_key
                ON price_history(name, COALESCE(brand, ''), recorded_on);
            CREATE INDEX IF NOT EXISTS idx_price_history_day ON price_history(recorded_on);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}
