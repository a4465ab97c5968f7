//! Handles requests to register a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Email, Error, PasswordHash, User, ValidatedPassword, auth::form::CredentialsForm,
    create_user,
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used to hash new passwords.
    pub password_hash_cost: u32,
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new user.
///
/// Responds with 201 and the new user's ID and email address.
///
/// # Errors
///
/// Responds with 400 if the email is invalid or the password is too weak, and
/// 409 if the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), Error> {
    let (raw_email, raw_password) = CredentialsForm::parse(&body)?;

    let email = Email::new(&raw_email)?;
    let password = ValidatedPassword::new(&raw_password, &[email.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = create_user(email, password_hash, &connection)?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)))
}
