//! Notification database operations.

use rusqlite::{params, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Notification, NotificationStatus};

const NOTIFICATION_COLUMNS: &str =
    "id, patient_id, caregiver_id, medication_name, title, body, status, read, created_at";

impl Database {
    /// Insert a notification.
    pub fn insert_notification(&self, notification: &Notification) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO notifications (
                id, patient_id, caregiver_id, medication_name, title, body,
                status, read, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                notification.id,
                notification.patient_id,
                notification.caregiver_id,
                notification.medication_name,
                notification.title,
                notification.body,
                notification.status.as_str(),
                notification.read,
                notification.created_at,
            ],
        )?;
        Ok(())
    }

    /// Notifications addressed to a caregiver, newest first.
    pub fn list_notifications_for_caregiver(&self, caregiver_id: &str) -> DbResult<Vec<Notification>> {
        self.query_notifications(
            &format!(
                "SELECT {} FROM notifications WHERE caregiver_id = ? ORDER BY created_at DESC",
                NOTIFICATION_COLUMNS
            ),
            caregiver_id,
        )
    }

    /// Notifications about a patient, newest first.
    pub fn list_notifications_for_patient(&self, patient_id: &str) -> DbResult<Vec<Notification>> {
        self.query_notifications(
            &format!(
                "SELECT {} FROM notifications WHERE patient_id = ? ORDER BY created_at DESC",
                NOTIFICATION_COLUMNS
            ),
            patient_id,
        )
    }

    /// Notifications still waiting for the host to deliver them, oldest first.
    pub fn list_pending_notifications(&self) -> DbResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM notifications WHERE status = 'pending' ORDER BY created_at",
            NOTIFICATION_COLUMNS
        ))?;
        let rows = stmt.query_map([], read_notification_row)?;

        let mut notifications = Vec::new();
        for row in rows {
            notifications.push(row?.try_into()?);
        }
        Ok(notifications)
    }

    /// Record the delivery outcome of a notification.
    pub fn set_notification_status(&self, id: &str, status: NotificationStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE notifications SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Count unread notifications for a caregiver.
    pub fn unread_notification_count(&self, caregiver_id: &str) -> DbResult<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE caregiver_id = ? AND read = 0",
            [caregiver_id],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    /// Mark all of a caregiver's notifications as read.
    pub fn mark_all_notifications_read(&self, caregiver_id: &str) -> DbResult<usize> {
        let rows_affected = self.conn.execute(
            "UPDATE notifications SET read = 1 WHERE caregiver_id = ? AND read = 0",
            [caregiver_id],
        )?;
        Ok(rows_affected)
    }

    fn query_notifications(&self, sql: &str, key: &str) -> DbResult<Vec<Notification>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([key], read_notification_row)?;

        let mut notifications = Vec::new();
        for row in rows {
            notifications.push(row?.try_into()?);
        }
        Ok(notifications)
    }
}

/// Intermediate row struct for database mapping.
struct NotificationRow {
    id: String,
    patient_id: String,
    caregiver_id: Option<String>,
    medication_name: String,
    title: String,
    body: String,
    status: String,
    read: bool,
    created_at: String,
}

fn read_notification_row(row: &Row<'_>) -> rusqlite::Result<NotificationRow> {
    Ok(NotificationRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        caregiver_id: row.get(2)?,
        medication_name: row.get(3)?,
        title: row.get(4)?,
        body: row.get(5)?,
        status: row.get(6)?,
        read: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DbError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let status = NotificationStatus::parse(&row.status).ok_or(DbError::Corrupt {
            column: "notifications.status",
            value: row.status.clone(),
        })?;

        Ok(Notification {
            id: row.id,
            patient_id: row.patient_id,
            caregiver_id: row.caregiver_id,
            medication_name: row.medication_name,
            title: row.title,
            body: row.body,
            status,
            read: row.read,
            created_at: row.created_at,
        })
    }
}
