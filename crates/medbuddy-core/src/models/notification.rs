//! Caregiver notification models.

use serde::{Deserialize, Serialize};

/// Delivery status of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Stored, waiting for the host app to deliver it
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(NotificationStatus::Pending),
            "sent" => Some(NotificationStatus::Sent),
            "failed" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }
}

/// A notification about a patient's medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub patient_id: String,
    pub caregiver_id: Option<String>,
    pub medication_name: String,
    pub title: String,
    pub body: String,
    pub status: NotificationStatus,
    pub read: bool,
    pub created_at: String,
}

impl Notification {
    /// Build the missed-dose alert sent to a patient's caregiver.
    pub fn missed_medication(
        patient_id: &str,
        patient_name: &str,
        caregiver_id: Option<String>,
        medication_name: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            caregiver_id,
            medication_name: medication_name.to_string(),
            title: format!(
                "Missed Medication Alert: {} for {}",
                medication_name, patient_name
            ),
            body: format!(
                "{} (Patient ID: {}) has missed their scheduled medication: {}. Please follow up accordingly.",
                patient_name, patient_id, medication_name
            ),
            status: NotificationStatus::Pending,
            read: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
