//! Dashboard views over a medication list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Medication, MedicationStatus};

/// Per-status counts and the taken rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdherenceSummary {
    pub total: u32,
    pub taken: u32,
    pub missed: u32,
    pub upcoming: u32,
    /// round(taken / total * 100); 0 when there is nothing scheduled
    pub rate_percent: u32,
}

impl AdherenceSummary {
    pub fn from_medications(meds: &[Medication]) -> Self {
        let mut summary = Self::default();
        for med in meds {
            summary.total += 1;
            match med.status {
                MedicationStatus::Taken => summary.taken += 1,
                MedicationStatus::Missed => summary.missed += 1,
                MedicationStatus::Upcoming => summary.upcoming += 1,
            }
        }

        if summary.total > 0 {
            let rate = f64::from(summary.taken) / f64::from(summary.total) * 100.0;
            summary.rate_percent = rate.round() as u32;
        }
        summary
    }
}

/// Doses not yet taken, earliest first. Unparseable times sort last.
pub fn upcoming_doses(meds: &[Medication]) -> Vec<Medication> {
    let mut pending: Vec<Medication> = meds.iter().filter(|m| !m.is_taken()).cloned().collect();
    pending.sort_by_key(|m| (m.scheduled_time().is_none(), m.scheduled_time()));
    pending
}

/// Why a medication needs refilling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefillAlert {
    pub medication_id: String,
    pub name: String,
    pub low_supply: bool,
    pub refill_date: Option<String>,
    /// Days until the refill date; negative when overdue
    pub days_until_refill: Option<i64>,
}

/// Medications low on supply or due for refill within `within_days` of `today`.
pub fn refill_alerts(meds: &[Medication], today: NaiveDate, within_days: i64) -> Vec<RefillAlert> {
    meds.iter()
        .filter_map(|med| {
            let days = med.refill_on().map(|d| (d - today).num_days());
            let due_soon = days.is_some_and(|d| d <= within_days);
            if !med.low_supply && !due_soon {
                return None;
            }
            Some(RefillAlert {
                medication_id: med.id.clone(),
                name: med.name.clone(),
                low_supply: med.low_supply,
                refill_date: med.refill_date.clone(),
                days_until_refill: days,
            })
        })
        .collect()
}
