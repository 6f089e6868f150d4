//! User, patient and caregiver profile models.
//!
//! Patient profile fields keep the camelCase names used by the profile forms,
//! so JSON from the host app deserializes without a mapping layer.

use serde::{Deserialize, Serialize};

use super::validation::{check_email, check_length, require, ValidationError, ValidationResult};

/// Account role. Every user starts as `General` until a profile is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    General,
    Patient,
    Caregiver,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::General => "general",
            UserRole::Patient => "patient",
            UserRole::Caregiver => "caregiver",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(UserRole::General),
            "patient" => Some(UserRole::Patient),
            "caregiver" => Some(UserRole::Caregiver),
            _ => None,
        }
    }
}

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    /// Role-specific profile, present once registered
    pub profile: Option<Profile>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Create a general user with required fields.
    pub fn new(name: String, email: String, phone: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            role: UserRole::General,
            profile: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        check_length("name", self.name.trim(), 2, 50)?;
        check_email(&self.email)?;
        check_length("phone", self.phone.trim(), 10, 15)?;
        Ok(())
    }

    pub fn patient_profile(&self) -> Option<&PatientProfile> {
        match &self.profile {
            Some(Profile::Patient(p)) => Some(p),
            _ => None,
        }
    }

    pub fn caregiver_profile(&self) -> Option<&CaregiverProfile> {
        match &self.profile {
            Some(Profile::Caregiver(c)) => Some(c),
            _ => None,
        }
    }

    /// Push token from whichever profile is registered.
    pub fn push_token(&self) -> Option<&str> {
        match &self.profile {
            Some(Profile::Patient(p)) => p.fcm_token.as_deref(),
            Some(Profile::Caregiver(c)) => c.fcm_token.as_deref(),
            None => None,
        }
    }
}

/// Role-specific profile payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum Profile {
    Patient(PatientProfile),
    Caregiver(CaregiverProfile),
}

impl Profile {
    pub fn role(&self) -> UserRole {
        match self {
            Profile::Patient(_) => UserRole::Patient,
            Profile::Caregiver(_) => UserRole::Caregiver,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    #[serde(rename = "emergencyName")]
    pub name: String,
    #[serde(rename = "emergencyRelation")]
    pub relation: String,
    #[serde(rename = "emergencyPhone")]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Physician {
    #[serde(rename = "physicianName")]
    pub name: String,
    #[serde(rename = "physicianPhone")]
    pub phone: String,
    pub hospital: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    pub blood_type: Option<String>,
    pub physician: Option<Physician>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPreferences {
    pub push: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthGoal {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
    /// Same forms as medication times
    pub time: String,
}

/// Patient demographic and medical profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub date_of_birth: String,
    pub gender: String,
    pub emergency_contact: Option<EmergencyContact>,
    pub medical_info: Option<MedicalInfo>,
    pub notification_preferences: Option<NotificationPreferences>,
    #[serde(default)]
    pub health_goals: Vec<HealthGoal>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
    #[serde(rename = "fcm_token")]
    pub fcm_token: Option<String>,
}

impl PatientProfile {
    pub fn validate(&self) -> ValidationResult<()> {
        require("dateOfBirth", &self.date_of_birth)?;
        require("gender", &self.gender)?;
        Ok(())
    }
}

/// How a caregiver wants to hear about the patient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    #[default]
    Email,
    Sms,
    Both,
}

/// Caregiver profile. `patients_assigned` holds the patient's user ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaregiverProfile {
    pub age: u32,
    pub gender: String,
    pub relation_to_patient: Option<String>,
    /// Years of caregiving experience
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub patients_assigned: Option<String>,
    #[serde(default)]
    pub notification_preference: NotificationChannel,
    pub fcm_token: Option<String>,
}

impl CaregiverProfile {
    pub fn validate(&self) -> ValidationResult<()> {
        // Caregivers must be adults
        if self.age <= 18 || self.age >= 100 {
            return Err(ValidationError::OutOfRange {
                field: "age",
                value: i64::from(self.age),
            });
        }
        require("gender", &self.gender)?;
        Ok(())
    }
}

/// A caregiver as seen from the patient's profile page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaregiverContact {
    pub id: String,
    pub name: String,
    pub relationship: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub notification_preference: NotificationChannel,
}

/// Profile page read model: the user and everyone caring for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub caregivers: Vec<CaregiverContact>,
}
