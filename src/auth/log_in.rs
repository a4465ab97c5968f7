//! Handles log-in requests by exchanging an email and password for an auth token.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    body::Bytes,
    extract::{FromRef, State},
};
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde_json::{Value, json};
use time::Duration;

use crate::{
    AppState, Email, Error, User,
    auth::{form::CredentialsForm, token::encode_token},
    user::get_user_by_email,
};

/// The state needed to perform a login.
#[derive(Clone)]
pub struct LogInState {
    /// The key used to sign new tokens.
    pub encoding_key: EncodingKey,
    /// The duration for which newly issued tokens are valid.
    pub token_duration: Duration,
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            encoding_key: state.token_keys.encoding_key.clone(),
            token_duration: state.token_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success, responds with a JSON object holding a bearer token that the
/// client should send with requests to the transaction endpoints.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing from the form.
/// - The email is not registered or the password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
pub async fn post_log_in(
    State(state): State<LogInState>,
    body: Bytes,
) -> Result<Json<Value>, Error> {
    let (email, password) = CredentialsForm::parse(&body)?;
    let user = find_user(&email, &state.db_connection)?;

    if !user.password_hash.verify(&password)? {
        tracing::info!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.token_duration, &state.encoding_key)?;
    tracing::info!("User {} logged in", user.id);

    Ok(Json(json!({ "token": token })))
}

fn find_user(email: &str, db_connection: &Mutex<Connection>) -> Result<User, Error> {
    let connection = db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    match get_user_by_email(&Email::new_unchecked(email.trim()), &connection) {
        Ok(user) => Ok(user),
        Err(Error::NotFound) => Err(Error::InvalidCredentials),
        Err(error) => Err(error),
    }
}
