//! Adherence report export for caregivers and physicians.

use serde::{Deserialize, Serialize};

use super::{ExportError, ExportResult};
use crate::db::Database;
use crate::models::{Medication, User};
use crate::schedule::AdherenceSummary;

/// Adherence report for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherenceReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Status counts and taken rate
    pub summary: AdherenceSummary,
    /// One row per medication
    pub medications: Vec<ReportRow>,
}

/// Adherence report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub user_id: String,
    pub user_name: String,
    /// Export timestamp
    pub generated_at: String,
}

/// Single medication row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    pub status: String,
    pub instructions: Option<String>,
    pub refill_date: Option<String>,
    pub low_supply: bool,
}

impl From<&Medication> for ReportRow {
    fn from(med: &Medication) -> Self {
        Self {
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
            time: med.time.clone(),
            status: med.status.as_str().to_string(),
            instructions: med.instructions.clone(),
            refill_date: med.refill_date.clone(),
            low_supply: med.low_supply,
        }
    }
}

impl AdherenceReport {
    /// Build a report from a user and their medications.
    pub fn from_medications(user: &User, meds: &[Medication]) -> Self {
        Self {
            metadata: ReportMetadata {
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
            summary: AdherenceSummary::from_medications(meds),
            medications: meds.iter().map(ReportRow::from).collect(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("user_id,user_name,name,dosage,frequency,time,status,instructions,refill_date,low_supply\n");

        for row in &self.medications {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                escape_csv(&self.metadata.user_id),
                escape_csv(&self.metadata.user_name),
                escape_csv(&row.name),
                escape_csv(&row.dosage),
                escape_csv(&row.frequency),
                escape_csv(&row.time),
                escape_csv(&row.status),
                escape_csv(row.instructions.as_deref().unwrap_or("")),
                escape_csv(row.refill_date.as_deref().unwrap_or("")),
                row.low_supply,
            ));
        }

        csv
    }
}

/// Builds adherence reports from the database.
pub struct ReportExporter<'a> {
    db: &'a Database,
}

impl<'a> ReportExporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Report covering every medication of a user.
    pub fn export_for_user(&self, user_id: &str) -> ExportResult<AdherenceReport> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or_else(|| ExportError::UserNotFound(user_id.to_string()))?;
        let meds = self.db.list_medications(user_id)?;
        Ok(AdherenceReport::from_medications(&user, &meds))
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
