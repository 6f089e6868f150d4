//! User and profile database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::medications::now_rfc3339;
use super::{Database, DbError, DbResult};
use crate::models::{Profile, User, UserRole};

const USER_COLUMNS: &str = "id, name, email, phone, role, profile, created_at, updated_at";

impl Database {
    /// Insert a new user. Emails are unique.
    pub fn insert_user(&self, user: &User) -> DbResult<()> {
        if self.get_user_by_email(&user.email)?.is_some() {
            return Err(DbError::Constraint(format!(
                "User already exists: {}",
                user.email
            )));
        }

        let profile_json = user
            .profile
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.conn.execute(
            r#"
            INSERT INTO users (
                id, name, email, phone, role, profile, assigned_patient_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user.id,
                user.name,
                user.email,
                user.phone,
                user.role.as_str(),
                profile_json,
                assigned_patient(user.profile.as_ref()),
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                [id],
                read_user_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a user by email (case-sensitive, as stored).
    pub fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                [email],
                read_user_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Store a role-specific profile and switch the user's role to match.
    pub fn set_user_profile(&self, user_id: &str, profile: &Profile) -> DbResult<bool> {
        let profile_json = serde_json::to_string(profile)?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE users SET
                role = ?2,
                profile = ?3,
                assigned_patient_id = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                user_id,
                profile.role().as_str(),
                profile_json,
                assigned_patient(Some(profile)),
                now_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Caregivers whose profile is assigned to the given patient.
    pub fn list_caregivers_for_patient(&self, patient_id: &str) -> DbResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM users WHERE role = 'caregiver' AND assigned_patient_id = ? ORDER BY created_at",
            USER_COLUMNS
        ))?;
        let rows = stmt.query_map([patient_id], read_user_row)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?.try_into()?);
        }
        Ok(users)
    }
}

fn assigned_patient(profile: Option<&Profile>) -> Option<&str> {
    match profile {
        Some(Profile::Caregiver(c)) => c.patients_assigned.as_deref(),
        _ => None,
    }
}

/// Intermediate row struct for database mapping.
struct UserRow {
    id: String,
    name: String,
    email: String,
    phone: String,
    role: String,
    profile: Option<String>,
    created_at: String,
    updated_at: String,
}

fn read_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        role: row.get(4)?,
        profile: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&row.role).ok_or(DbError::Corrupt {
            column: "users.role",
            value: row.role.clone(),
        })?;
        let profile: Option<Profile> = row
            .profile
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            role,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
