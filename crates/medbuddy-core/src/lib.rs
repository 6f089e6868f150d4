//! MedBuddy Core Library
//!
//! Local-first medication adherence tracking with caregiver alerts, a
//! rule-based assistant and a nearby-pharmacy finder.
//!
//! # Architecture
//!
//! ```text
//!   Host app (web / mobile shell)
//!          │  UniFFI
//!          ▼
//!   ┌───────────────┐     ┌──────────────┐     ┌──────────────────┐
//!   │ MedBuddyCore  │────▶│   Database   │◀────│ sweep_missed     │
//!   │  (FFI object) │     │  (SQLite)    │     │ (every 60 s)     │
//!   └──────┬────────┘     └──────┬───────┘     └────────┬─────────┘
//!          │                     │                      │
//!          ▼                     ▼                      ▼
//!     Chat session        Profiles / Theme       Caregiver alerts
//!                                                   (PushSender)
//!
//!   PharmacyFinder ──▶ PlacesService (medbuddy-places) ──▶ places web service
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence for users, medications, notifications and preferences
//! - [`models`]: Domain types (Medication, User, Profile, Notification, etc.)
//! - [`chat`]: Keyword responder and chat session
//! - [`pharmacy`]: Distance math, places/geolocation seams, pharmacy finder
//! - [`schedule`]: Missed-dose sweep, dashboard views, calendar events
//! - [`notify`]: Caregiver alerts for missed doses
//! - [`profiles`]: User and role profile registration
//! - [`theme`]: Dark-mode preference
//! - [`export`]: Adherence report export
//! - [`config`]: Environment configuration and logging setup

pub mod chat;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod notify;
pub mod pharmacy;
pub mod profiles;
pub mod schedule;
pub mod theme;

// Re-export commonly used types
pub use chat::{ChatSession, KeywordResponder, Responder};
pub use config::{init_logging, AppConfig};
pub use db::Database;
pub use models::{
    CalendarEvent, ChatMessage, LatLng, Medication, MedicationStatus, Notification,
    NotificationStatus, Pharmacy, Profile, User, UserProfile, UserRole,
};
pub use notify::{MissedDoseNotifier, PushSender};
pub use pharmacy::{Locator, PharmacyFinder, PlacesService};
pub use theme::{ClassList, ThemeController};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedBuddyError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Profile error: {0}")]
    ProfileError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for MedBuddyError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => MedBuddyError::NotFound(what),
            other => MedBuddyError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for MedBuddyError {
    fn from(e: serde_json::Error) -> Self {
        MedBuddyError::SerializationError(e.to_string())
    }
}

impl From<models::ValidationError> for MedBuddyError {
    fn from(e: models::ValidationError) -> Self {
        MedBuddyError::InvalidInput(e.to_string())
    }
}

impl From<profiles::ProfileError> for MedBuddyError {
    fn from(e: profiles::ProfileError) -> Self {
        match e {
            profiles::ProfileError::Database(db) => db.into(),
            profiles::ProfileError::Validation(v) => v.into(),
            profiles::ProfileError::UserNotFound(id) => MedBuddyError::NotFound(id),
            other => MedBuddyError::ProfileError(other.to_string()),
        }
    }
}

impl From<notify::NotifyError> for MedBuddyError {
    fn from(e: notify::NotifyError) -> Self {
        match e {
            notify::NotifyError::Database(db) => db.into(),
            other => MedBuddyError::NotificationError(other.to_string()),
        }
    }
}

impl From<schedule::ScheduleError> for MedBuddyError {
    fn from(e: schedule::ScheduleError) -> Self {
        match e {
            schedule::ScheduleError::Database(db) => db.into(),
        }
    }
}

impl From<export::ExportError> for MedBuddyError {
    fn from(e: export::ExportError) -> Self {
        match e {
            export::ExportError::Database(db) => db.into(),
            export::ExportError::UserNotFound(id) => MedBuddyError::NotFound(id),
        }
    }
}

impl From<config::ConfigError> for MedBuddyError {
    fn from(e: config::ConfigError) -> Self {
        MedBuddyError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedBuddyError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedBuddyError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MedBuddyCore>, MedBuddyError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(MedBuddyCore::from_database(db, &AppConfig::default())))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MedBuddyCore>, MedBuddyError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(MedBuddyCore::from_database(db, &AppConfig::default())))
}

/// Read configuration from the environment, start logging and open the configured database.
#[uniffi::export]
pub fn open_from_env() -> Result<Arc<MedBuddyCore>, MedBuddyError> {
    let config = AppConfig::from_env()?;
    init_logging(&config.log_filter);
    open_with_config(&config)
}

/// Open the database named by `config`; chat and sweep settings come from it too.
pub fn open_with_config(config: &AppConfig) -> Result<Arc<MedBuddyCore>, MedBuddyError> {
    let db = Database::open(&config.db_path)?;
    Ok(Arc::new(MedBuddyCore::from_database(db, config)))
}

/// Current configuration as seen from the environment.
#[uniffi::export]
pub fn load_config() -> Result<FfiConfig, MedBuddyError> {
    Ok(AppConfig::from_env()?.into())
}

/// Start a chat session with an explicit reply delay.
///
/// [`MedBuddyCore::new_chat_session`] uses the configured delay instead.
#[uniffi::export]
pub fn new_chat_session(reply_delay_ms: u64) -> Arc<MedBuddyChat> {
    Arc::new(MedBuddyChat {
        session: Mutex::new(ChatSession::with_responder(
            KeywordResponder::new(),
            reply_delay_ms,
            Utc::now(),
        )),
    })
}

/// Canned assistant reply for a message.
#[uniffi::export]
pub fn chat_reply(text: String) -> String {
    KeywordResponder::new().respond(&text)
}

/// User-facing message for a geolocation error code.
#[uniffi::export]
pub fn geolocation_error_message(code: u16) -> String {
    pharmacy::GeolocationError::from_code(code).to_string()
}

/// Directions link to a pharmacy.
#[uniffi::export]
pub fn pharmacy_directions_url(lat: f64, lng: f64) -> String {
    pharmacy::directions_url(LatLng::new(lat, lng))
}

/// Rounded great-circle distance in kilometres.
#[uniffi::export]
pub fn distance_km(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> f64 {
    pharmacy::round_km(pharmacy::haversine_km(
        LatLng::new(from_lat, from_lng),
        LatLng::new(to_lat, to_lng),
    ))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedBuddyCore {
    db: Arc<Mutex<Database>>,
    reply_delay_ms: u64,
    sweep_interval_secs: u64,
}

impl MedBuddyCore {
    fn from_database(db: Database, config: &AppConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            reply_delay_ms: config.reply_delay_ms,
            sweep_interval_secs: config.sweep_interval_secs,
        }
    }
}

#[uniffi::export]
impl MedBuddyCore {
    /// Start a chat session using the configured reply delay.
    pub fn new_chat_session(&self) -> Arc<MedBuddyChat> {
        new_chat_session(self.reply_delay_ms)
    }

    /// Seconds between missed-dose sweeps.
    pub fn sweep_interval_secs(&self) -> u64 {
        self.sweep_interval_secs
    }

    // =========================================================================
    // User & Profile Operations
    // =========================================================================

    /// Register a new user with the `general` role.
    pub fn register_user(
        &self,
        name: String,
        email: String,
        phone: String,
    ) -> Result<FfiUser, MedBuddyError> {
        let db = self.db.lock()?;
        let user = profiles::register_user(&db, &name, &email, &phone)?;
        Ok(user.into())
    }

    /// Register a patient or caregiver profile from its JSON form.
    pub fn register_profile(
        &self,
        user_id: String,
        registration_json: String,
    ) -> Result<FfiUser, MedBuddyError> {
        let registration: profiles::ProfileRegistration = serde_json::from_str(&registration_json)?;
        let db = self.db.lock()?;
        let user = profiles::register_profile(&db, &user_id, registration)?;
        Ok(user.into())
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: String) -> Result<Option<FfiUser>, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(db.get_user(&user_id)?.map(|u| u.into()))
    }

    /// Get a user's registered profile as JSON.
    pub fn get_profile_json(&self, user_id: String) -> Result<String, MedBuddyError> {
        let db = self.db.lock()?;
        let user = profiles::get_profile(&db, &user_id)?;
        Ok(serde_json::to_string(&user)?)
    }

    /// Get the user with their assigned caregivers.
    pub fn get_user_profile(&self, user_id: String) -> Result<FfiUserProfile, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(profiles::user_profile(&db, &user_id)?.into())
    }

    // =========================================================================
    // Medication Operations
    // =========================================================================

    /// Add a medication for a user.
    pub fn add_medication(&self, input: FfiNewMedication) -> Result<FfiMedication, MedBuddyError> {
        let mut med = Medication::new(input.user_id, input.name, input.dosage, input.frequency, input.time);
        med.instructions = input.instructions;
        med.refill_date = input.refill_date;
        med.low_supply = input.low_supply;
        med.notification = input.notification;
        med.validate()?;

        let db = self.db.lock()?;
        db.insert_medication(&med)?;
        tracing::info!(medication_id = %med.id, "medication added");
        Ok(med.into())
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, medication_id: String) -> Result<Option<FfiMedication>, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(db.get_medication(&medication_id)?.map(|m| m.into()))
    }

    /// Update a medication's editable fields.
    pub fn update_medication(&self, medication: FfiMedication) -> Result<bool, MedBuddyError> {
        let mut med = Medication::try_from(medication)?;
        med.validate()?;
        med.touch();
        let db = self.db.lock()?;
        Ok(db.update_medication(&med)?)
    }

    /// Delete a medication.
    pub fn delete_medication(&self, medication_id: String) -> Result<bool, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(db.delete_medication(&medication_id)?)
    }

    /// List a user's medications ordered by time.
    pub fn list_medications(&self, user_id: String) -> Result<Vec<FfiMedication>, MedBuddyError> {
        let db = self.db.lock()?;
        let meds = db.list_medications(&user_id)?;
        Ok(meds.into_iter().map(|m| m.into()).collect())
    }

    /// List a user's medications with a status ("taken", "missed", "upcoming").
    pub fn list_medications_by_status(
        &self,
        user_id: String,
        status: String,
    ) -> Result<Vec<FfiMedication>, MedBuddyError> {
        let status = parse_status(&status)?;
        let db = self.db.lock()?;
        let meds = db.list_medications_by_status(&user_id, status)?;
        Ok(meds.into_iter().map(|m| m.into()).collect())
    }

    /// Mark a user's medication as taken.
    pub fn mark_taken(&self, user_id: String, medication_id: String) -> Result<bool, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(db.set_medication_status(&medication_id, &user_id, MedicationStatus::Taken)?)
    }

    /// Delete a user's missed medications, returning their names.
    pub fn clear_missed(&self, user_id: String) -> Result<Vec<String>, MedBuddyError> {
        let mut db = self.db.lock()?;
        Ok(db.clear_missed_medications(&user_id)?)
    }

    // =========================================================================
    // Schedule Operations
    // =========================================================================

    /// Mark overdue upcoming doses as missed using the local clock.
    pub fn sweep_missed(&self) -> Result<Vec<FfiMedication>, MedBuddyError> {
        let mut db = self.db.lock()?;
        let changed = schedule::sweep_missed(&mut db, Local::now().time())?;
        Ok(changed.into_iter().map(|m| m.into()).collect())
    }

    /// Mark doses earlier than `time` ("HH:MM" or "hh:MM AM") as missed.
    pub fn sweep_missed_at(&self, time: String) -> Result<Vec<FfiMedication>, MedBuddyError> {
        let now = models::parse_dose_time(&time)
            .ok_or_else(|| MedBuddyError::InvalidInput(format!("time: {}", time)))?;
        let mut db = self.db.lock()?;
        let changed = schedule::sweep_missed(&mut db, now)?;
        Ok(changed.into_iter().map(|m| m.into()).collect())
    }

    /// Status counts and taken rate for a user.
    pub fn adherence_summary(&self, user_id: String) -> Result<FfiAdherenceSummary, MedBuddyError> {
        let db = self.db.lock()?;
        let meds = db.list_medications(&user_id)?;
        Ok(schedule::AdherenceSummary::from_medications(&meds).into())
    }

    /// Doses not yet taken, earliest first.
    pub fn upcoming_doses(&self, user_id: String) -> Result<Vec<FfiMedication>, MedBuddyError> {
        let db = self.db.lock()?;
        let meds = db.list_medications(&user_id)?;
        Ok(schedule::upcoming_doses(&meds).into_iter().map(|m| m.into()).collect())
    }

    /// Medications low on supply or due for refill within `within_days`.
    pub fn refill_alerts(
        &self,
        user_id: String,
        within_days: u32,
    ) -> Result<Vec<FfiRefillAlert>, MedBuddyError> {
        let db = self.db.lock()?;
        let meds = db.list_medications(&user_id)?;
        let today = Local::now().date_naive();
        let alerts = schedule::refill_alerts(&meds, today, i64::from(within_days));
        Ok(alerts.into_iter().map(|a| a.into()).collect())
    }

    /// Calendar events for a date (YYYY-MM-DD): doses plus that day's appointments.
    pub fn calendar_events(
        &self,
        user_id: String,
        date: String,
    ) -> Result<Vec<FfiCalendarEvent>, MedBuddyError> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| MedBuddyError::InvalidInput(format!("date: {}", date)))?;
        let db = self.db.lock()?;
        let meds = db.list_medications(&user_id)?;
        let user = db.get_user(&user_id)?;
        let profile = user.as_ref().and_then(|u| u.patient_profile());
        let events = schedule::calendar_events(&meds, day, profile);
        Ok(events.into_iter().map(|e| e.into()).collect())
    }

    // =========================================================================
    // Notification Operations
    // =========================================================================

    /// Record a missed-dose alert for the patient's caregiver.
    ///
    /// The alert is stored as pending; deliver it and report back with
    /// `record_delivery`.
    pub fn notify_missed(
        &self,
        patient_id: String,
        medication_name: String,
    ) -> Result<Option<FfiNotification>, MedBuddyError> {
        let db = self.db.lock()?;
        let notification = MissedDoseNotifier::new(&db).notify_missed(&patient_id, &medication_name)?;
        Ok(notification.map(|n| n.into()))
    }

    /// Record how a pending alert's push delivery went.
    pub fn record_delivery(&self, notification_id: String, success_count: u32) -> Result<bool, MedBuddyError> {
        let status = if success_count > 0 {
            NotificationStatus::Sent
        } else {
            NotificationStatus::Failed
        };
        let db = self.db.lock()?;
        Ok(db.set_notification_status(&notification_id, status)?)
    }

    /// Alerts waiting for delivery.
    pub fn pending_notifications(&self) -> Result<Vec<FfiNotification>, MedBuddyError> {
        let db = self.db.lock()?;
        let notifications = db.list_pending_notifications()?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    /// Alerts addressed to a caregiver, newest first.
    pub fn list_notifications(&self, caregiver_id: String) -> Result<Vec<FfiNotification>, MedBuddyError> {
        let db = self.db.lock()?;
        let notifications = db.list_notifications_for_caregiver(&caregiver_id)?;
        Ok(notifications.into_iter().map(|n| n.into()).collect())
    }

    /// Count a caregiver's unread alerts.
    pub fn unread_notification_count(&self, caregiver_id: String) -> Result<u32, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(db.unread_notification_count(&caregiver_id)?)
    }

    /// Mark all of a caregiver's alerts as read.
    pub fn mark_all_notifications_read(&self, caregiver_id: String) -> Result<u32, MedBuddyError> {
        let db = self.db.lock()?;
        Ok(db.mark_all_notifications_read(&caregiver_id)? as u32)
    }

    // =========================================================================
    // Theme Operations
    // =========================================================================

    /// Load the dark-mode preference (writing it back) and return it.
    pub fn load_dark_mode(&self) -> Result<bool, MedBuddyError> {
        let db = self.db.lock()?;
        let controller = ThemeController::load(&db, ClassList::new())?;
        Ok(controller.is_dark())
    }

    /// Flip and persist dark mode, returning the new state.
    pub fn toggle_dark_mode(&self) -> Result<bool, MedBuddyError> {
        let db = self.db.lock()?;
        let mut controller = ThemeController::load(&db, ClassList::new())?;
        Ok(controller.toggle(&db)?)
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export a user's adherence report as JSON.
    pub fn export_report_json(&self, user_id: String) -> Result<String, MedBuddyError> {
        let db = self.db.lock()?;
        let report = export::ReportExporter::new(&db).export_for_user(&user_id)?;
        Ok(report.to_json()?)
    }

    /// Export a user's adherence report as CSV.
    pub fn export_report_csv(&self, user_id: String) -> Result<String, MedBuddyError> {
        let db = self.db.lock()?;
        let report = export::ReportExporter::new(&db).export_for_user(&user_id)?;
        Ok(report.to_csv())
    }
}

fn parse_status(status: &str) -> Result<MedicationStatus, MedBuddyError> {
    MedicationStatus::parse(status)
        .ok_or_else(|| MedBuddyError::InvalidInput(format!("status: {}", status)))
}

// =========================================================================
// Chat Object
// =========================================================================

/// Chat session handle for FFI.
#[derive(uniffi::Object)]
pub struct MedBuddyChat {
    session: Mutex<ChatSession>,
}

#[uniffi::export]
impl MedBuddyChat {
    /// Send a message; the reply arrives through `deliver_due`.
    pub fn send(&self, text: String) -> Result<Option<FfiChatMessage>, MedBuddyError> {
        let mut session = self.session.lock()?;
        Ok(session.send(&text, Utc::now()).cloned().map(|m| m.into()))
    }

    /// Deliver replies that are due, returning how many arrived.
    pub fn deliver_due(&self) -> Result<u32, MedBuddyError> {
        let mut session = self.session.lock()?;
        Ok(session.deliver_due(Utc::now()) as u32)
    }

    /// Full conversation so far.
    pub fn messages(&self) -> Result<Vec<FfiChatMessage>, MedBuddyError> {
        let session = self.session.lock()?;
        Ok(session.messages().iter().cloned().map(|m| m.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe configuration.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConfig {
    pub db_path: String,
    pub has_maps_api_key: bool,
    pub reply_delay_ms: u64,
    pub search_radius_m: u32,
    pub sweep_interval_secs: u64,
    pub log_filter: String,
}

impl From<AppConfig> for FfiConfig {
    fn from(config: AppConfig) -> Self {
        Self {
            db_path: config.db_path.display().to_string(),
            has_maps_api_key: config.maps_api_key.is_some(),
            reply_delay_ms: config.reply_delay_ms,
            search_radius_m: config.search_radius_m,
            sweep_interval_secs: config.sweep_interval_secs,
            log_filter: config.log_filter,
        }
    }
}

/// FFI-safe user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub has_profile: bool,
}

impl From<User> for FfiUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role.as_str().to_string(),
            has_profile: user.profile.is_some(),
        }
    }
}

/// FFI-safe caregiver contact.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaregiverContact {
    pub id: String,
    pub name: String,
    pub relationship: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub notification_preference: String,
}

/// FFI-safe user profile view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub caregivers: Vec<FfiCaregiverContact>,
}

impl From<UserProfile> for FfiUserProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            caregivers: profile
                .caregivers
                .into_iter()
                .map(|c| FfiCaregiverContact {
                    id: c.id,
                    name: c.name,
                    relationship: c.relationship,
                    email: c.email,
                    phone: c.phone,
                    notification_preference: format!("{:?}", c.notification_preference).to_lowercase(),
                })
                .collect(),
        }
    }
}

/// FFI-safe medication input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewMedication {
    pub user_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    pub instructions: Option<String>,
    pub refill_date: Option<String>,
    pub low_supply: bool,
    pub notification: bool,
}

/// FFI-safe medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time: String,
    pub instructions: Option<String>,
    pub status: String,
    pub refill_date: Option<String>,
    pub low_supply: bool,
    pub notification: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            id: med.id,
            user_id: med.user_id,
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency,
            time: med.time,
            instructions: med.instructions,
            status: med.status.as_str().to_string(),
            refill_date: med.refill_date,
            low_supply: med.low_supply,
            notification: med.notification,
            created_at: med.created_at,
            updated_at: med.updated_at,
        }
    }
}

impl TryFrom<FfiMedication> for Medication {
    type Error = MedBuddyError;

    fn try_from(med: FfiMedication) -> Result<Self, Self::Error> {
        Ok(Medication {
            status: parse_status(&med.status)?,
            id: med.id,
            user_id: med.user_id,
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency,
            time: med.time,
            instructions: med.instructions,
            refill_date: med.refill_date,
            low_supply: med.low_supply,
            notification: med.notification,
            created_at: med.created_at,
            updated_at: med.updated_at,
        })
    }
}

/// FFI-safe adherence summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAdherenceSummary {
    pub total: u32,
    pub taken: u32,
    pub missed: u32,
    pub upcoming: u32,
    pub rate_percent: u32,
}

impl From<schedule::AdherenceSummary> for FfiAdherenceSummary {
    fn from(s: schedule::AdherenceSummary) -> Self {
        Self {
            total: s.total,
            taken: s.taken,
            missed: s.missed,
            upcoming: s.upcoming,
            rate_percent: s.rate_percent,
        }
    }
}

/// FFI-safe refill alert.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRefillAlert {
    pub medication_id: String,
    pub name: String,
    pub low_supply: bool,
    pub refill_date: Option<String>,
    pub days_until_refill: Option<i64>,
}

impl From<schedule::RefillAlert> for FfiRefillAlert {
    fn from(a: schedule::RefillAlert) -> Self {
        Self {
            medication_id: a.medication_id,
            name: a.name,
            low_supply: a.low_supply,
            refill_date: a.refill_date,
            days_until_refill: a.days_until_refill,
        }
    }
}

/// FFI-safe calendar event. Times are ISO 8601 local date-times.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalendarEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
    pub kind: String,
}

impl From<CalendarEvent> for FfiCalendarEvent {
    fn from(e: CalendarEvent) -> Self {
        Self {
            id: e.id,
            title: e.title,
            start: e.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end: e.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            description: e.description,
            kind: format!("{:?}", e.kind).to_lowercase(),
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub id: String,
    pub patient_id: String,
    pub caregiver_id: Option<String>,
    pub medication_name: String,
    pub title: String,
    pub body: String,
    pub status: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for FfiNotification {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            patient_id: n.patient_id,
            caregiver_id: n.caregiver_id,
            medication_name: n.medication_name,
            title: n.title,
            body: n.body,
            status: n.status.as_str().to_string(),
            read: n.read,
            created_at: n.created_at,
        }
    }
}

/// FFI-safe chat message.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChatMessage {
    pub id: String,
    pub text: String,
    pub is_bot: bool,
    pub timestamp: String,
}

impl From<ChatMessage> for FfiChatMessage {
    fn from(m: ChatMessage) -> Self {
        Self {
            is_bot: m.is_from_bot(),
            id: m.id,
            text: m.text,
            timestamp: m.timestamp,
        }
    }
}
