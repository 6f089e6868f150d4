//! Medication database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{parse_dose_time, sort_by_schedule, Medication, MedicationStatus};

const MEDICATION_COLUMNS: &str = "id, user_id, name, dosage, frequency, time, instructions, \
     status, refill_date, low_supply, notification, created_at, updated_at";

impl Database {
    /// Insert a new medication. The owning user must exist.
    pub fn insert_medication(&self, med: &Medication) -> DbResult<()> {
        if self.get_user(&med.user_id)?.is_none() {
            return Err(DbError::NotFound(format!("user {}", med.user_id)));
        }

        self.conn.execute(
            r#"
            INSERT INTO medications (
                id, user_id, name, dosage, frequency, time, instructions,
                status, refill_date, low_supply, notification, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                med.id,
                med.user_id,
                med.name,
                med.dosage,
                med.frequency,
                med.time,
                med.instructions,
                med.status.as_str(),
                med.refill_date,
                med.low_supply,
                med.notification,
                med.created_at,
                med.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing medication's editable fields. `updated_at` is stored as given.
    pub fn update_medication(&self, med: &Medication) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medications SET
                name = ?2,
                dosage = ?3,
                frequency = ?4,
                time = ?5,
                instructions = ?6,
                status = ?7,
                refill_date = ?8,
                low_supply = ?9,
                notification = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
            params![
                med.id,
                med.name,
                med.dosage,
                med.frequency,
                med.time,
                med.instructions,
                med.status.as_str(),
                med.refill_date,
                med.low_supply,
                med.notification,
                med.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: &str) -> DbResult<Option<Medication>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medications WHERE id = ?", MEDICATION_COLUMNS),
                [id],
                read_medication_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a user's medications ordered by scheduled time.
    pub fn list_medications(&self, user_id: &str) -> DbResult<Vec<Medication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medications WHERE user_id = ?",
            MEDICATION_COLUMNS
        ))?;
        let rows = stmt.query_map([user_id], read_medication_row)?;

        let mut meds = Vec::new();
        for row in rows {
            meds.push(row?.try_into()?);
        }
        sort_by_schedule(&mut meds);
        Ok(meds)
    }

    /// List a user's medications with the given status.
    pub fn list_medications_by_status(
        &self,
        user_id: &str,
        status: MedicationStatus,
    ) -> DbResult<Vec<Medication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medications WHERE user_id = ? AND status = ?",
            MEDICATION_COLUMNS
        ))?;
        let rows = stmt.query_map(params![user_id, status.as_str()], read_medication_row)?;

        let mut meds = Vec::new();
        for row in rows {
            meds.push(row?.try_into()?);
        }
        sort_by_schedule(&mut meds);
        Ok(meds)
    }

    /// List every user's medications with the given status.
    pub fn list_all_medications_by_status(
        &self,
        status: MedicationStatus,
    ) -> DbResult<Vec<Medication>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medications WHERE status = ? ORDER BY user_id",
            MEDICATION_COLUMNS
        ))?;
        let rows = stmt.query_map([status.as_str()], read_medication_row)?;

        let mut meds = Vec::new();
        for row in rows {
            meds.push(row?.try_into()?);
        }
        sort_by_schedule(&mut meds);
        meds.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(meds)
    }

    /// Set the status of a medication owned by `user_id`.
    ///
    /// Returns false when no such medication belongs to the user.
    pub fn set_medication_status(
        &self,
        id: &str,
        user_id: &str,
        status: MedicationStatus,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE medications SET status = ?, updated_at = ? WHERE id = ? AND user_id = ?",
            params![status.as_str(), now_rfc3339(), id, user_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Set the status of many medications atomically.
    pub fn set_medication_statuses(&mut self, ids: &[String], status: MedicationStatus) -> DbResult<usize> {
        let stamp = now_rfc3339();
        let tx = self.conn.transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare("UPDATE medications SET status = ?, updated_at = ? WHERE id = ?")?;
            for id in ids {
                updated += stmt.execute(params![status.as_str(), stamp, id])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }

    /// Delete a medication.
    pub fn delete_medication(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete a user's missed medications, returning their names.
    pub fn clear_missed_medications(&mut self, user_id: &str) -> DbResult<Vec<String>> {
        let tx = self.conn.transaction()?;
        let mut missed = {
            let mut stmt = tx.prepare(
                "SELECT name, time FROM medications WHERE user_id = ? AND status = 'missed'",
            )?;
            let missed = stmt
                .query_map([user_id], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            missed
        };
        missed.sort_by_cached_key(|(name, time)| {
            let due = parse_dose_time(time);
            (due.is_none(), due, name.clone())
        });
        tx.execute(
            "DELETE FROM medications WHERE user_id = ? AND status = 'missed'",
            [user_id],
        )?;
        tx.commit()?;
        Ok(missed.into_iter().map(|(name, _)| name).collect())
    }
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Intermediate row struct for database mapping.
struct MedicationRow {
    id: String,
    user_id: String,
    name: String,
    dosage: String,
    frequency: String,
    time: String,
    instructions: Option<String>,
    status: String,
    refill_date: Option<String>,
    low_supply: bool,
    notification: bool,
    created_at: String,
    updated_at: String,
}

fn read_medication_row(row: &Row<'_>) -> rusqlite::Result<MedicationRow> {
    Ok(MedicationRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        dosage: row.get(3)?,
        frequency: row.get(4)?,
        time: row.get(5)?,
        instructions: row.get(6)?,
        status: row.get(7)?,
        refill_date: row.get(8)?,
        low_supply: row.get(9)?,
        notification: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl TryFrom<MedicationRow> for Medication {
    type Error = DbError;

    fn try_from(row: MedicationRow) -> Result<Self, Self::Error> {
        let status = MedicationStatus::parse(&row.status).ok_or(DbError::Corrupt {
            column: "medications.status",
            value: row.status.clone(),
        })?;

        Ok(Medication {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            dosage: row.dosage,
            frequency: row.frequency,
            time: row.time,
            instructions: row.instructions,
            status,
            refill_date: row.refill_date,
            low_supply: row.low_supply,
            notification: row.notification,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
