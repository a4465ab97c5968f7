#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::Value;

use crate::{
    AppState, DEFAULT_TOKEN_DURATION, Email, PasswordHash, UserID, ValidatedPassword, build_router,
    create_user, endpoints,
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "vK9#mQ2!zL7@pX4w";

/// The lowest cost bcrypt accepts, keeps the tests fast.
const TEST_HASH_COST: u32 = 4;

/// Create an app state backed by an in-memory database.
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let mut state = AppState::new(connection, "foobar", DEFAULT_TOKEN_DURATION)
        .expect("Could not create app state");
    state.password_hash_cost = TEST_HASH_COST;

    state
}

/// Insert a user with [TEST_PASSWORD] directly into the database.
pub(crate) fn insert_test_user(state: &AppState, email: &str) -> UserID {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        TEST_HASH_COST,
    )
    .expect("Could not hash password");
    let connection = state.db_connection.lock().unwrap();

    create_user(Email::new_unchecked(email), password_hash, &connection)
        .expect("Could not create test user")
        .id
}

/// Create a test server for the full app router.
pub(crate) fn get_test_server() -> TestServer {
    TestServer::try_new(build_router(get_test_app_state())).expect("Could not create test server.")
}

/// Register `email` via the API, log in, and return the new user's ID and bearer token.
pub(crate) async fn register_and_log_in(server: &TestServer, email: &str) -> (UserID, String) {
    let user = server
        .post(endpoints::USERS)
        .form(&[("email", email), ("password", TEST_PASSWORD)])
        .await
        .json::<Value>();
    let user_id = UserID::new(user["id"].as_i64().expect("user ID should be an integer"));

    let response = server
        .post(endpoints::LOG_IN)
        .form(&[("email", email), ("password", TEST_PASSWORD)])
        .await
        .json::<Value>();
    let token = response["token"]
        .as_str()
        .expect("token should be a string")
        .to_owned();

    (user_id, token)
}

/// The form fields for a complete, valid transaction.
pub(crate) fn transaction_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("category_id", "food"),
        ("budget_id", "monthly"),
        ("goal_id", "holiday"),
        ("type", "expense"),
        ("amount", "12.5"),
        ("date", "2025-10-05"),
        ("description", "Lunch"),
    ]
}
