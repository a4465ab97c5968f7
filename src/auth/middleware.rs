//! Authentication middleware that validates bearer tokens.

use std::sync::{Arc, Mutex};

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::DecodingKey;
use rusqlite::Connection;

use crate::{AppState, Error, UserID, auth::token::decode_token, get_user_by_id};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key used to verify tokens presented by clients.
    pub decoding_key: DecodingKey,
    /// The database connection, used to check that the token's user still exists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            decoding_key: state.token_keys.decoding_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
///
/// The user ID is placed into the request and the request executed normally if the token is
/// valid, otherwise a 401 response with a JSON error body is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let user_id = match authenticate(&mut parts, &state).await {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

async fn authenticate(parts: &mut Parts, state: &AuthState) -> Result<UserID, Error> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|error| {
            tracing::debug!("Missing or malformed authorization header: {error}");
            Error::InvalidToken
        })?;

    let claims = decode_token(bearer.token(), &state.decoding_key)?;

    check_user_exists(claims.user_id, &state.db_connection)
}

fn check_user_exists(
    user_id: UserID,
    db_connection: &Mutex<Connection>,
) -> Result<UserID, Error> {
    let connection = db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    match get_user_by_id(user_id, &connection) {
        Ok(user) => Ok(user.id),
        Err(Error::NotFound) => {
            tracing::warn!("Rejected token for user {user_id} who no longer exists");
            Err(Error::InvalidToken)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;
    use serde_json::json;
    use time::Duration;

    use crate::{
        AppState, UserID,
        auth::{middleware::AuthState, token::encode_token},
        test_utils::{get_test_app_state, insert_test_user},
    };

    use super::auth_guard;

    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn test_handler(Extension(user_id): Extension<UserID>) -> String {
        user_id.to_string()
    }

    fn get_test_server(state: &AppState) -> TestServer {
        let auth_state = AuthState {
            decoding_key: state.token_keys.decoding_key.clone(),
            db_connection: state.db_connection.clone(),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(auth_state.clone(), auth_guard))
            .with_state(auth_state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_user_id_to_handler_with_valid_token() {
        let state = get_test_app_state();
        let user_id = insert_test_user(&state, "foo@bar.baz");
        let token = encode_token(
            user_id,
            Duration::minutes(5),
            &state.token_keys.encoding_key,
        )
        .unwrap();
        let server = get_test_server(&state);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();
        response.assert_text(user_id.to_string());
    }

    #[tokio::test]
    async fn rejects_request_without_token() {
        let state = get_test_app_state();
        let server = get_test_server(&state);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": "a valid bearer token is required" }));
    }

    #[tokio::test]
    async fn rejects_malformed_token() {
        let state = get_test_app_state();
        let server = get_test_server(&state);

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer("FOOBAR")
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let state = get_test_app_state();
        let user_id = insert_test_user(&state, "foo@bar.baz");
        let token = encode_token(
            user_id,
            Duration::minutes(-5),
            &state.token_keys.encoding_key,
        )
        .unwrap();
        let server = get_test_server(&state);

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn rejects_token_for_unknown_user() {
        let state = get_test_app_state();
        let token = encode_token(
            UserID::new(42),
            Duration::minutes(5),
            &state.token_keys.encoding_key,
        )
        .unwrap();
        let server = get_test_server(&state);

        server
            .get(TEST_PROTECTED_ROUTE)
            .authorization_bearer(token)
            .await
            .assert_status_unauthorized();
    }
}
