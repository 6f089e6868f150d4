//! Medication models.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::validation::{require, ValidationResult};

/// Accepted spellings of a scheduled dose time.
const TIME_FORMATS: [&str; 3] = ["%I:%M %p", "%I:%M%p", "%H:%M"];

/// Dose status for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    Taken,
    Missed,
    Upcoming,
}

impl MedicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationStatus::Taken => "taken",
            MedicationStatus::Missed => "missed",
            MedicationStatus::Upcoming => "upcoming",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "taken" => Some(MedicationStatus::Taken),
            "missed" => Some(MedicationStatus::Missed),
            "upcoming" => Some(MedicationStatus::Upcoming),
            _ => None,
        }
    }
}

/// A scheduled medication owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Local UUID
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Medication name (e.g., "Metformin")
    pub name: String,
    /// Dosage text (e.g., "500mg")
    pub dosage: String,
    /// Frequency text (e.g., "Twice daily")
    pub frequency: String,
    /// Scheduled time of day ("08:00" or "08:00 AM")
    pub time: String,
    /// Intake instructions (e.g., "Take with food")
    pub instructions: Option<String>,
    /// Status for today
    pub status: MedicationStatus,
    /// Next refill date (YYYY-MM-DD)
    pub refill_date: Option<String>,
    /// Supply is running low
    pub low_supply: bool,
    /// Reminder notifications enabled
    pub notification: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Medication {
    /// Create an upcoming medication with required fields.
    pub fn new(user_id: String, name: String, dosage: String, frequency: String, time: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            name,
            dosage,
            frequency,
            time,
            instructions: None,
            status: MedicationStatus::Upcoming,
            refill_date: None,
            low_supply: false,
            notification: false,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Validate the form-level constraints.
    pub fn validate(&self) -> ValidationResult<()> {
        require("user_id", &self.user_id)?;
        require("name", &self.name)?;
        require("dosage", &self.dosage)?;
        require("frequency", &self.frequency)?;
        require("time", &self.time)?;
        Ok(())
    }

    /// Scheduled time of day, if the stored text parses.
    pub fn scheduled_time(&self) -> Option<NaiveTime> {
        parse_dose_time(&self.time)
    }

    /// Refill date, if present and well formed.
    pub fn refill_on(&self) -> Option<NaiveDate> {
        self.refill_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    pub fn is_taken(&self) -> bool {
        self.status == MedicationStatus::Taken
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Order by scheduled time of day, then name. Unparseable times go last.
pub fn sort_by_schedule(meds: &mut [Medication]) {
    meds.sort_by_cached_key(|m| {
        let due = m.scheduled_time();
        (due.is_none(), due, m.name.clone())
    });
}

/// Parse a dose time in 12-hour ("08:00 AM") or 24-hour ("20:00") form.
pub fn parse_dose_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}
