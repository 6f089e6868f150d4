//! Preference key/value store.

use rusqlite::{params, OptionalExtension};

use super::medications::now_rfc3339;
use super::{Database, DbResult};

impl Database {
    /// Read a raw preference value.
    pub fn get_preference(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Write a raw preference value, replacing any previous one.
    pub fn set_preference(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value, now_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove a preference.
    pub fn delete_preference(&self, key: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }
}
