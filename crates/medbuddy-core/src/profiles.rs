//! User registration and role-based profile registration.
//!
//! A user starts with the `general` role. Registering a profile moves the
//! user to `patient` or `caregiver` exactly once. A caregiver names the
//! patient they look after by email; the patient's id is stored on the
//! caregiver profile.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{
    CaregiverContact, CaregiverProfile, PatientProfile, Profile, User, UserProfile, UserRole,
    ValidationError,
};

/// Profile errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("User already exists")]
    EmailTaken(String),

    #[error("User not found")]
    UserNotFound(String),

    #[error("Profile already registered")]
    AlreadyRegistered,

    #[error("Profile not registered")]
    NotRegistered,

    #[error("Patient email is required")]
    PatientEmailRequired,

    #[error("Patient with this email not found")]
    PatientNotFound(String),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

/// Profile submitted for a `general` user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileRegistration {
    Patient {
        profile: PatientProfile,
    },
    Caregiver {
        patient_email: String,
        profile: CaregiverProfile,
    },
}

/// Create a `general` user after validating the sign-up fields.
pub fn register_user(db: &Database, name: &str, email: &str, phone: &str) -> ProfileResult<User> {
    let user = User::new(
        name.trim().to_string(),
        email.trim().to_string(),
        phone.trim().to_string(),
    );
    user.validate()?;

    if db.get_user_by_email(&user.email)?.is_some() {
        return Err(ProfileError::EmailTaken(user.email));
    }

    db.insert_user(&user)?;
    tracing::info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Attach a role profile to a `general` user and return the updated user.
pub fn register_profile(
    db: &Database,
    user_id: &str,
    registration: ProfileRegistration,
) -> ProfileResult<User> {
    let user = db
        .get_user(user_id)?
        .ok_or_else(|| ProfileError::UserNotFound(user_id.to_string()))?;

    if user.role != UserRole::General {
        return Err(ProfileError::AlreadyRegistered);
    }

    let profile = match registration {
        ProfileRegistration::Patient { profile } => {
            profile.validate()?;
            Profile::Patient(profile)
        }
        ProfileRegistration::Caregiver {
            patient_email,
            mut profile,
        } => {
            let patient_email = patient_email.trim();
            if patient_email.is_empty() {
                return Err(ProfileError::PatientEmailRequired);
            }
            profile.validate()?;

            let patient = db
                .get_user_by_email(patient_email)?
                .filter(|p| p.role == UserRole::Patient)
                .ok_or_else(|| ProfileError::PatientNotFound(patient_email.to_string()))?;

            profile.patients_assigned = Some(patient.id);
            Profile::Caregiver(profile)
        }
    };

    db.set_user_profile(user_id, &profile)?;
    tracing::info!(user_id, role = profile.role().as_str(), "profile registered");

    db.get_user(user_id)?
        .ok_or_else(|| ProfileError::UserNotFound(user_id.to_string()))
}

/// A user with a registered profile.
pub fn get_profile(db: &Database, user_id: &str) -> ProfileResult<User> {
    let user = db
        .get_user(user_id)?
        .ok_or_else(|| ProfileError::UserNotFound(user_id.to_string()))?;

    if user.profile.is_none() {
        return Err(ProfileError::NotRegistered);
    }
    Ok(user)
}

/// The user plus the caregivers assigned to them.
pub fn user_profile(db: &Database, user_id: &str) -> ProfileResult<UserProfile> {
    let user = db
        .get_user(user_id)?
        .ok_or_else(|| ProfileError::UserNotFound(user_id.to_string()))?;

    let caregivers = db
        .list_caregivers_for_patient(user_id)?
        .into_iter()
        .filter_map(|c| {
            let profile = c.caregiver_profile()?.clone();
            Some(CaregiverContact {
                id: c.id,
                name: c.name,
                relationship: profile.relation_to_patient,
                email: c.email,
                phone: Some(c.phone),
                notification_preference: profile.notification_preference,
            })
        })
        .collect();

    Ok(UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        caregivers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationChannel;

    fn patient_profile() -> PatientProfile {
        PatientProfile {
            date_of_birth: "1950-04-12".into(),
            gender: "male".into(),
            emergency_contact: None,
            medical_info: None,
            notification_preferences: None,
            health_goals: vec![],
            appointments: vec![],
            fcm_token: None,
        }
    }

    fn caregiver_profile(age: u32) -> CaregiverProfile {
        CaregiverProfile {
            age,
            gender: "female".into(),
            relation_to_patient: Some("daughter".into()),
            experience: 2,
            certifications: vec![],
            patients_assigned: None,
            notification_preference: NotificationChannel::Sms,
            fcm_token: Some("tok".into()),
        }
    }

    fn caregiver_reg(email: &str, age: u32) -> ProfileRegistration {
        ProfileRegistration::Caregiver {
            patient_email: email.into(),
            profile: caregiver_profile(age),
        }
    }

    #[test]
    fn test_register_user_validates() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            register_user(&db, "J", "john@example.com", "5551234567"),
            Err(ProfileError::Validation(_))
        ));
        assert!(matches!(
            register_user(&db, "John", "not-an-email", "5551234567"),
            Err(ProfileError::Validation(_))
        ));

        let user = register_user(&db, "John", "john@example.com", "5551234567").unwrap();
        assert_eq!(user.role, UserRole::General);

        assert!(matches!(
            register_user(&db, "Johnny", "john@example.com", "5551234567"),
            Err(ProfileError::EmailTaken(_))
        ));
    }

    #[test]
    fn test_patient_then_caregiver() {
        let db = Database::open_in_memory().unwrap();
        let patient = register_user(&db, "John", "john@example.com", "5551234567").unwrap();
        let carer = register_user(&db, "Sarah", "sarah@example.com", "5559876543").unwrap();

        let patient = register_profile(
            &db,
            &patient.id,
            ProfileRegistration::Patient {
                profile: patient_profile(),
            },
        )
        .unwrap();
        assert_eq!(patient.role, UserRole::Patient);

        let carer = register_profile(&db, &carer.id, caregiver_reg("john@example.com", 45)).unwrap();
        assert_eq!(carer.role, UserRole::Caregiver);
        assert_eq!(
            carer.caregiver_profile().unwrap().patients_assigned.as_deref(),
            Some(patient.id.as_str())
        );

        let view = user_profile(&db, &patient.id).unwrap();
        assert_eq!(view.caregivers.len(), 1);
        assert_eq!(view.caregivers[0].name, "Sarah");
        assert_eq!(view.caregivers[0].relationship.as_deref(), Some("daughter"));
        assert_eq!(view.caregivers[0].notification_preference, NotificationChannel::Sms);
    }

    #[test]
    fn test_registration_only_once() {
        let db = Database::open_in_memory().unwrap();
        let user = register_user(&db, "John", "john@example.com", "5551234567").unwrap();
        let reg = ProfileRegistration::Patient {
            profile: patient_profile(),
        };

        register_profile(&db, &user.id, reg.clone()).unwrap();
        let err = register_profile(&db, &user.id, reg).unwrap_err();
        assert_eq!(err.to_string(), "Profile already registered");
    }

    #[test]
    fn test_caregiver_rules() {
        let db = Database::open_in_memory().unwrap();
        let other = register_user(&db, "Gene", "gene@example.com", "5550001111").unwrap();
        let carer = register_user(&db, "Sarah", "sarah@example.com", "5559876543").unwrap();

        assert!(matches!(
            register_profile(&db, &carer.id, caregiver_reg("  ", 45)),
            Err(ProfileError::PatientEmailRequired)
        ));
        // Exists but is not a patient
        assert!(matches!(
            register_profile(&db, &carer.id, caregiver_reg(&other.email, 45)),
            Err(ProfileError::PatientNotFound(_))
        ));

        register_profile(
            &db,
            &other.id,
            ProfileRegistration::Patient {
                profile: patient_profile(),
            },
        )
        .unwrap();
        assert!(matches!(
            register_profile(&db, &carer.id, caregiver_reg(&other.email, 18)),
            Err(ProfileError::Validation(ValidationError::OutOfRange { .. }))
        ));

        // Failed attempts leave the user general
        assert!(register_profile(&db, &carer.id, caregiver_reg(&other.email, 30)).is_ok());
    }

    #[test]
    fn test_get_profile_requires_registration() {
        let db = Database::open_in_memory().unwrap();
        let user = register_user(&db, "John", "john@example.com", "5551234567").unwrap();
        assert!(matches!(get_profile(&db, &user.id), Err(ProfileError::NotRegistered)));
        assert!(matches!(get_profile(&db, "ghost"), Err(ProfileError::UserNotFound(_))));
    }

    #[test]
    fn test_registration_json_shape() {
        let json = r#"{
            "role": "caregiver",
            "patient_email": "john@example.com",
            "profile": {"age": 40, "gender": "female", "relation_to_patient": "daughter",
                        "patients_assigned": null, "fcm_token": null}
        }"#;
        let reg: ProfileRegistration = serde_json::from_str(json).unwrap();
        assert!(matches!(reg, ProfileRegistration::Caregiver { .. }));
    }
}
