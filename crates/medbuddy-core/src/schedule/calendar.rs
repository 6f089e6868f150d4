//! Calendar events for doses and appointments.

use chrono::{Duration, NaiveDate};

use crate::models::{
    parse_dose_time, Appointment, CalendarEvent, EventKind, Medication, PatientProfile,
};

pub const MEDICATION_EVENT_MINUTES: i64 = 30;
pub const APPOINTMENT_EVENT_MINUTES: i64 = 60;

/// One event per medication on `date`. Medications without a parseable time are left out.
pub fn medication_events(meds: &[Medication], date: NaiveDate) -> Vec<CalendarEvent> {
    meds.iter()
        .filter_map(|med| {
            let start = date.and_time(med.scheduled_time()?);
            Some(CalendarEvent {
                id: med.id.clone(),
                title: med.name.clone(),
                start,
                end: start + Duration::minutes(MEDICATION_EVENT_MINUTES),
                description: Some(format!("{} - {}", med.dosage, med.frequency)),
                kind: EventKind::Medication,
            })
        })
        .collect()
}

/// Events for a patient's appointments with a valid date and time.
pub fn appointment_events(profile: &PatientProfile) -> Vec<CalendarEvent> {
    profile
        .appointments
        .iter()
        .enumerate()
        .filter_map(|(i, appt)| appointment_event(i, appt))
        .collect()
}

fn appointment_event(index: usize, appt: &Appointment) -> Option<CalendarEvent> {
    let date = NaiveDate::parse_from_str(appt.date.trim(), "%Y-%m-%d").ok()?;
    let start = date.and_time(parse_dose_time(&appt.time)?);
    Some(CalendarEvent {
        id: format!("appointment-{}", index),
        title: appt.title.clone(),
        start,
        end: start + Duration::minutes(APPOINTMENT_EVENT_MINUTES),
        description: None,
        kind: EventKind::Appointment,
    })
}

/// Medication and appointment events on `date`, ordered by start.
pub fn calendar_events(
    meds: &[Medication],
    date: NaiveDate,
    profile: Option<&PatientProfile>,
) -> Vec<CalendarEvent> {
    let mut events = medication_events(meds, date);
    if let Some(profile) = profile {
        events.extend(
            appointment_events(profile)
                .into_iter()
                .filter(|e| e.start.date() == date),
        );
    }
    events.sort_by_key(|e| e.start);
    events
}
