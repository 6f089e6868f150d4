//! Caregiver alerts for missed doses.

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Notification, NotificationStatus, UserRole};

/// Notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid patient user: {0}")]
    NotAPatient(String),

    #[error("Push delivery failed: {0}")]
    Push(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

/// Push delivery to a device token.
pub trait PushSender {
    /// Send a push message, returning how many deliveries succeeded.
    fn send(&self, token: &str, title: &str, body: &str) -> NotifyResult<u32>;
}

/// Alerts a patient's caregiver when a dose is missed.
pub struct MissedDoseNotifier<'a> {
    db: &'a Database,
    sender: Option<&'a dyn PushSender>,
}

impl<'a> MissedDoseNotifier<'a> {
    /// Notifier that only records alerts; the host delivers pending ones.
    pub fn new(db: &'a Database) -> Self {
        Self { db, sender: None }
    }

    pub fn with_sender(db: &'a Database, sender: &'a dyn PushSender) -> Self {
        Self {
            db,
            sender: Some(sender),
        }
    }

    /// Alert the caregiver of `patient_id` about a missed medication.
    ///
    /// Returns `Ok(None)` when there is nobody reachable to alert.
    pub fn notify_missed(
        &self,
        patient_id: &str,
        medication_name: &str,
    ) -> NotifyResult<Option<Notification>> {
        let patient = self
            .db
            .get_user(patient_id)?
            .filter(|u| u.role == UserRole::Patient)
            .ok_or_else(|| NotifyError::NotAPatient(patient_id.to_string()))?;

        let Some(caregiver) = self.db.list_caregivers_for_patient(patient_id)?.into_iter().next() else {
            tracing::info!(patient_id, "no caregiver assigned, alert not sent");
            return Ok(None);
        };

        let Some(token) = caregiver.push_token() else {
            tracing::info!(patient_id, caregiver_id = %caregiver.id, "caregiver has no push token, alert not sent");
            return Ok(None);
        };

        let mut notification = Notification::missed_medication(
            patient_id,
            &patient.name,
            Some(caregiver.id.clone()),
            medication_name,
        );

        if let Some(sender) = self.sender {
            notification.status = match sender.send(token, &notification.title, &notification.body) {
                Ok(count) if count > 0 => NotificationStatus::Sent,
                Ok(_) => NotificationStatus::Failed,
                Err(e) => {
                    tracing::warn!(error = %e, caregiver_id = %caregiver.id, "push delivery failed");
                    NotificationStatus::Failed
                }
            };
        }

        self.db.insert_notification(&notification)?;
        tracing::info!(
            caregiver_id = %caregiver.id,
            medication = medication_name,
            status = notification.status.as_str(),
            "missed medication alert recorded"
        );
        Ok(Some(notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaregiverProfile, NotificationChannel, PatientProfile, Profile, User};
    use std::cell::RefCell;

    struct RecordingSender {
        result: fn() -> NotifyResult<u32>,
        sent: RefCell<Vec<(String, String)>>,
    }

    impl PushSender for RecordingSender {
        fn send(&self, token: &str, title: &str, _body: &str) -> NotifyResult<u32> {
            self.sent.borrow_mut().push((token.to_string(), title.to_string()));
            (self.result)()
        }
    }

    fn patient_profile() -> Profile {
        Profile::Patient(PatientProfile {
            date_of_birth: "1950-04-12".into(),
            gender: "male".into(),
            emergency_contact: None,
            medical_info: None,
            notification_preferences: None,
            health_goals: vec![],
            appointments: vec![],
            fcm_token: None,
        })
    }

    fn caregiver_profile(patient_id: &str, token: Option<&str>) -> Profile {
        Profile::Caregiver(CaregiverProfile {
            age: 45,
            gender: "female".into(),
            relation_to_patient: Some("daughter".into()),
            experience: 0,
            certifications: vec![],
            patients_assigned: Some(patient_id.into()),
            notification_preference: NotificationChannel::Email,
            fcm_token: token.map(String::from),
        })
    }

    fn setup(token: Option<&str>) -> (Database, User, User) {
        let db = Database::open_in_memory().unwrap();
        let patient = User::new("John".into(), "john@example.com".into(), "5551234567".into());
        let carer = User::new("Sarah".into(), "sarah@example.com".into(), "5559876543".into());
        db.insert_user(&patient).unwrap();
        db.insert_user(&carer).unwrap();
        db.set_user_profile(&patient.id, &patient_profile()).unwrap();
        db.set_user_profile(&carer.id, &caregiver_profile(&patient.id, token))
            .unwrap();
        (db, patient, carer)
    }

    #[test]
    fn test_sent_alert() {
        let (db, patient, carer) = setup(Some("tok-1"));
        let sender = RecordingSender {
            result: || Ok(1),
            sent: RefCell::new(vec![]),
        };
        let notifier = MissedDoseNotifier::with_sender(&db, &sender);

        let n = notifier.notify_missed(&patient.id, "Aspirin").unwrap().unwrap();
        assert_eq!(n.status, NotificationStatus::Sent);
        assert_eq!(n.caregiver_id.as_deref(), Some(carer.id.as_str()));
        assert_eq!(n.title, "Missed Medication Alert: Aspirin for John");
        assert_eq!(
            n.body,
            format!(
                "John (Patient ID: {}) has missed their scheduled medication: Aspirin. Please follow up accordingly.",
                patient.id
            )
        );

        let sent = sender.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "tok-1");

        let stored = db.list_notifications_for_caregiver(&carer.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, NotificationStatus::Sent);
    }

    #[test]
    fn test_failed_alert_still_stored() {
        let (db, patient, carer) = setup(Some("tok-1"));
        for result in [
            (|| Ok(0)) as fn() -> NotifyResult<u32>,
            || Err(NotifyError::Push("unreachable".into())),
        ] {
            let sender = RecordingSender {
                result,
                sent: RefCell::new(vec![]),
            };
            let n = MissedDoseNotifier::with_sender(&db, &sender)
                .notify_missed(&patient.id, "Aspirin")
                .unwrap()
                .unwrap();
            assert_eq!(n.status, NotificationStatus::Failed);
        }
        assert_eq!(db.list_notifications_for_caregiver(&carer.id).unwrap().len(), 2);
    }

    #[test]
    fn test_no_sender_leaves_pending() {
        let (db, patient, _) = setup(Some("tok-1"));
        let n = MissedDoseNotifier::new(&db)
            .notify_missed(&patient.id, "Aspirin")
            .unwrap()
            .unwrap();
        assert_eq!(n.status, NotificationStatus::Pending);
        assert_eq!(db.list_pending_notifications().unwrap().len(), 1);
    }

    #[test]
    fn test_no_token_no_alert() {
        let (db, patient, carer) = setup(None);
        let result = MissedDoseNotifier::new(&db)
            .notify_missed(&patient.id, "Aspirin")
            .unwrap();
        assert!(result.is_none());
        assert!(db.list_notifications_for_caregiver(&carer.id).unwrap().is_empty());
    }

    #[test]
    fn test_no_caregiver_no_alert() {
        let db = Database::open_in_memory().unwrap();
        let patient = User::new("John".into(), "john@example.com".into(), "5551234567".into());
        db.insert_user(&patient).unwrap();
        db.set_user_profile(&patient.id, &patient_profile()).unwrap();

        let result = MissedDoseNotifier::new(&db)
            .notify_missed(&patient.id, "Aspirin")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_requires_patient() {
        let (db, _, carer) = setup(Some("tok-1"));
        let notifier = MissedDoseNotifier::new(&db);

        assert!(matches!(
            notifier.notify_missed(&carer.id, "Aspirin"),
            Err(NotifyError::NotAPatient(_))
        ));
        assert!(matches!(
            notifier.notify_missed("ghost", "Aspirin"),
            Err(NotifyError::NotAPatient(_))
        ));
    }
}
