//! # Accounts
//!
//! Registration, login and the admin guard.
//!
//! ## Credential Flow
//! ```text
//! register:  form.password ──► Argon2 (random salt) ──► User.password_hash (PHC)
//! login:     password ──► verify against PHC string ──► User | InvalidCredentials
//! ```
//! Plain passwords never reach the state tree or local storage.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::User;
use crate::validation::{validate_email, validate_name, validate_password, validate_phone};

/// Fields of the sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Optional; validated when present.
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Hashes a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks `password` against a PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Validates `form` and builds a new non-admin account.
///
/// Does not touch state; the caller dispatches `AddUser` and
/// `SetCurrentUser` with the result.
///
/// ## Errors
/// - `Validation` for a bad name, email, password or phone
/// - `EmailTaken` when any existing account has the same email
///   (case-insensitive)
pub fn register(users: &[User], form: &RegistrationForm, now: DateTime<Utc>) -> CoreResult<User> {
    validate_name("name", &form.name)?;
    validate_email(&form.email)?;
    validate_password(&form.password)?;
    if !form.phone.trim().is_empty() {
        validate_phone(&form.phone)?;
    }

    let email = form.email.trim();
    if users.iter().any(|u| u.has_email(email)) {
        return Err(CoreError::EmailTaken(email.to_string()));
    }

    debug!(email = %email, "Registering account");

    Ok(User {
        id: Uuid::new_v4().to_string(),
        name: form.name.trim().to_string(),
        email: email.to_string(),
        password_hash: hash_password(&form.password)?,
        phone: form.phone.trim().to_string(),
        address: form.address.trim().to_string(),
        is_admin: false,
        created_at: now,
    })
}

/// Finds the account matching `email` and `password`.
pub fn authenticate<'a>(users: &'a [User], email: &str, password: &str) -> CoreResult<&'a User> {
    users
        .iter()
        .find(|u| u.has_email(email) && verify_password(password, &u.password_hash))
        .ok_or(CoreError::InvalidCredentials)
}

/// Returns the signed-in user, or `NotSignedIn`.
pub fn require_user(current: Option<&User>) -> CoreResult<&User> {
    current.ok_or(CoreError::NotSignedIn)
}

/// Returns the signed-in administrator, or the reason access is refused.
pub fn require_admin(current: Option<&User>) -> CoreResult<&User> {
    let user = require_user(current)?;
    if !user.is_admin {
        return Err(CoreError::AdminRequired);
    }
    Ok(user)
}
