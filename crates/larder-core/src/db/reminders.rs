//! Reminder storage operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Reminder, ReminderList};

const REMINDER_COLUMNS: &str = "id, item_id, item_name, message, closed, created_at";

fn row_to_reminder(row: &Row) -> rusqlite::Result<Reminder> {
    let created_at_str: String = row.get(5)?;
    Ok(Reminder {
        id: row.get(0)?,
        item_id: row.get(1)?,
        item_name: row.get(2)?,
        message: row.get(3)?,
        closed: row.get(4)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// List reminders split into open (oldest first) and closed (newest first)
    pub fn list_reminders(&self) -> Result<ReminderList> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reminders WHERE closed = 0 ORDER BY created_at ASC, id ASC",
            REMINDER_COLUMNS
        ))?;
        let active = stmt
            .query_map([], row_to_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reminders WHERE closed = 1 ORDER BY created_at DESC, id DESC",
            REMINDER_COLUMNS
        ))?;
        let closed = stmt
            .query_map([], row_to_reminder)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ReminderList { active, closed })
    }

    /// Get a single reminder by ID
    pub fn get_reminder(&self, id: i64) -> Result<Option<Reminder>> {
        let conn = self.conn()?;
        let reminder = conn
            .query_row(
                &format!("SELECT {} FROM reminders WHERE id = ?", REMINDER_COLUMNS),
                params![id],
                row_to_reminder,
            )
            .optional()?;
        Ok(reminder)
    }

    /// Mark a reminder closed. Returns false if it doesn't exist.
    pub fn close_reminder(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute("UPDATE reminders SET closed = 1 WHERE id = ?", params![id])?;
        Ok(updated > 0)
    }

    /// Delete a reminder only while it is still open. Returns false otherwise.
    pub fn delete_open_reminder(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM reminders WHERE id = ? AND closed = 0",
            params![id],
        )?;
        Ok(deleted > 0)
    }

    /// Delete every closed reminder, returning how many were removed
    pub fn clear_closed_reminders(&self) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM reminders WHERE closed = 1", [])?;
        Ok(deleted)
    }

    /// Delete closed reminders created strictly before `cutoff`
    pub fn purge_closed_reminders_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM reminders WHERE closed = 1 AND created_at < ?",
            params![format_datetime(cutoff)],
        )?;
        Ok(deleted)
    }

    /// Insert an open reminder unless an identical open one already exists
    ///
    /// The existence check and insert are one statement, so overlapping
    /// sweeps cannot both insert. Returns the new ID, or None if skipped.
    pub fn insert_reminder_if_absent(
        &self,
        item_id: i64,
        item_name: &str,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT INTO reminders (item_id, item_name, message, closed, created_at)
            SELECT ?1, ?2, ?3, 0, ?4
            WHERE NOT EXISTS (
                SELECT 1 FROM reminders WHERE item_id = ?1 AND message = ?3 AND closed = 0
            )
            "#,
            params![item_id, item_name, message, format_datetime(created_at)],
        )?;

        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(conn.last_insert_rowid()))
    }
}
