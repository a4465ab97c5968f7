//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use time::Duration;

use crate::{Error, PasswordHash, db::initialize};

/// The default duration for which auth tokens are valid.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(1);

/// The keys used to sign and verify auth tokens.
#[derive(Clone)]
pub struct TokenKeys {
    /// Signs new tokens.
    pub encoding_key: EncodingKey,
    /// Verifies tokens presented by clients.
    pub decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Derive a key pair from a shared `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The keys to be used for signing and verifying auth tokens.
    pub token_keys: TokenKeys,

    /// The duration for which newly issued auth tokens are valid.
    pub token_duration: Duration,

    /// The bcrypt cost used when hashing the passwords of new users.
    pub password_hash_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `token_secret` is used to sign and verify auth tokens.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        token_secret: &str,
        token_duration: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            token_keys: TokenKeys::from_secret(token_secret),
            token_duration,
            password_hash_cost: PasswordHash::DEFAULT_COST,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
