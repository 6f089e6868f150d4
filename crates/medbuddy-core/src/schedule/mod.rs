//! Dose scheduling: missed-dose sweep, dashboard views and calendar events.

mod adherence;
mod calendar;

pub use adherence::*;
pub use calendar::*;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Medication, MedicationStatus};

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Scheduling errors.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Mark every upcoming dose whose time has passed as missed.
///
/// Times compare at minute resolution, so a dose due at 08:00 is still
/// upcoming at 08:00:59. All status changes land in one transaction.
/// Returns the medications that changed, already carrying the new status.
pub fn sweep_missed(db: &mut Database, now: NaiveTime) -> ScheduleResult<Vec<Medication>> {
    let cutoff = truncate_to_minute(now);
    let upcoming = db.list_all_medications_by_status(MedicationStatus::Upcoming)?;

    let mut overdue = Vec::new();
    for mut med in upcoming {
        match med.scheduled_time() {
            Some(due) if due < cutoff => {
                med.status = MedicationStatus::Missed;
                overdue.push(med);
            }
            Some(_) => {}
            None => {
                tracing::warn!(medication_id = %med.id, time = %med.time, "skipping medication with unparseable time");
            }
        }
    }

    if overdue.is_empty() {
        return Ok(overdue);
    }

    let ids: Vec<String> = overdue.iter().map(|m| m.id.clone()).collect();
    let updated = db.set_medication_statuses(&ids, MedicationStatus::Missed)?;
    tracing::info!(updated, "marked overdue medications as missed");

    Ok(overdue)
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn setup() -> (Database, User) {
        let db = Database::open_in_memory().unwrap();
        let user = User::new("John Doe".into(), "john@example.com".into(), "5551234567".into());
        db.insert_user(&user).unwrap();
        (db, user)
    }

    fn add(db: &Database, user: &User, name: &str, time: &str, status: MedicationStatus) -> Medication {
        let mut med = Medication::new(
            user.id.clone(),
            name.into(),
            "10mg".into(),
            "Once daily".into(),
            time.into(),
        );
        med.status = status;
        db.insert_medication(&med).unwrap();
        med
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_sweep_marks_only_overdue_upcoming() {
        let (mut db, user) = setup();
        let early = add(&db, &user, "Metformin", "08:00 AM", MedicationStatus::Upcoming);
        let late = add(&db, &user, "Atorvastatin", "20:00", MedicationStatus::Upcoming);
        let taken = add(&db, &user, "Aspirin", "07:00", MedicationStatus::Taken);

        let changed = sweep_missed(&mut db, at(12, 0, 0)).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, early.id);
        assert_eq!(changed[0].status, MedicationStatus::Missed);

        let status = |id: &str| db.get_medication(id).unwrap().unwrap().status;
        assert_eq!(status(&early.id), MedicationStatus::Missed);
        assert_eq!(status(&late.id), MedicationStatus::Upcoming);
        assert_eq!(status(&taken.id), MedicationStatus::Taken);
    }

    #[test]
    fn test_sweep_minute_resolution() {
        let (mut db, user) = setup();
        add(&db, &user, "Metformin", "08:00", MedicationStatus::Upcoming);

        assert!(sweep_missed(&mut db, at(8, 0, 59)).unwrap().is_empty());
        assert_eq!(sweep_missed(&mut db, at(8, 1, 0)).unwrap().len(), 1);
        // Already missed, nothing left to do
        assert!(sweep_missed(&mut db, at(23, 59, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_sweep_skips_unparseable() {
        let (mut db, user) = setup();
        let odd = add(&db, &user, "Vitamin D", "after lunch", MedicationStatus::Upcoming);

        assert!(sweep_missed(&mut db, at(23, 0, 0)).unwrap().is_empty());
        let med = db.get_medication(&odd.id).unwrap().unwrap();
        assert_eq!(med.status, MedicationStatus::Upcoming);
    }
}
