//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// The number of characters of a request or response body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";
const REDACTED_FIELDS: [&str; 1] = ["password"];
const REDACTED_JSON_FIELDS: [&str; 1] = ["token"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Passwords in form bodies, tokens in JSON bodies and the `Authorization`
/// header are never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return Error::InvalidField {
                field: "body",
                reason: error.to_string(),
            }
            .into_response();
        }
    };

    let body_text = if is_content_type(&parts.headers, "application/x-www-form-urlencoded") {
        redact_form(&String::from_utf8_lossy(&body_bytes))
    } else {
        String::from_utf8_lossy(&body_bytes).into_owned()
    };
    log_body(
        &format!(
            "Received request: {} {}\nheaders: {:#?}",
            parts.method,
            parts.uri,
            redact_headers(&parts.headers)
        ),
        &body_text,
    );

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes: Bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_body(
        &format!(
            "Sending response: {}\nheaders: {:#?}",
            parts.status, parts.headers
        ),
        &redact_response_body(&parts.headers, &body_bytes),
    );

    Response::from_parts(parts, Body::from(body_bytes))
}

fn is_content_type(headers: &HeaderMap, mime: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with(mime))
}

fn redact_response_body(headers: &HeaderMap, body: &[u8]) -> String {
    if is_content_type(headers, "application/json") {
        redact_json(body)
    } else {
        String::from_utf8_lossy(body).into_owned()
    }
}

/// Replace the value of every token field in the JSON `body`, at any depth.
///
/// A body that cannot be decoded is replaced entirely.
fn redact_json(body: &[u8]) -> String {
    let Ok(mut value) = serde_json::from_slice::<Value>(body) else {
        return REDACTED.to_owned();
    };

    redact_json_value(&mut value);

    value.to_string()
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            for (key, field) in fields.iter_mut() {
                if REDACTED_JSON_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_json_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        _ => {}
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

/// Replace the value of every password field in `form_text`.
///
/// Form text that cannot be decoded is replaced entirely, since it may still contain a password.
fn redact_form(form_text: &str) -> String {
    let Ok(fields) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return REDACTED.to_owned();
    };

    let fields: Vec<(String, String)> = fields
        .into_iter()
        .map(|(key, value)| {
            if REDACTED_FIELDS.contains(&key.as_str()) {
                (key, REDACTED.to_owned())
            } else {
                (key, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&fields).unwrap_or_else(|_| REDACTED.to_owned())
}

fn truncate(text: &str, limit: usize) -> Option<&str> {
    text.char_indices().nth(limit).map(|(end, _)| &text[..end])
}

fn log_body(summary: &str, body: &str) {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(truncated) => {
            tracing::info!("{summary}\nbody: {truncated}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{summary}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod logging_tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use axum::{
        Router,
        http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
        middleware,
        routing::post,
    };
    use axum_test::TestServer;
    use serde_json::Value;
    use tracing_subscriber::fmt::MakeWriter;

    use crate::{
        build_router, endpoints,
        test_utils::{TEST_PASSWORD, get_test_app_state},
    };

    use super::{logging_middleware, redact_form, redact_headers, redact_json, truncate};

    /// Collects everything written by a tracing subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn redacts_password_field() {
        let got = redact_form("email=foo%40bar.baz&password=hunter2");

        assert_eq!(got, "email=foo%40bar.baz&password=********");
    }

    #[test]
    fn leaves_other_fields_alone() {
        let got = redact_form("description=Lunch&amount=12.5");

        assert_eq!(got, "description=Lunch&amount=12.5");
    }

    #[test]
    fn redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        let got = redact_headers(&headers);

        assert_eq!(got.get(AUTHORIZATION).unwrap(), "********");
    }

    #[test]
    fn redacts_token_in_json() {
        let got = redact_json(br#"{"token":"abc.def.ghi","nested":[{"token":"x"}],"id":1}"#);

        assert!(!got.contains("abc.def.ghi"));
        assert!(!got.contains("\"x\""));
        assert!(got.contains("\"id\":1"));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate("héllo", 2), Some("hé"));
        assert_eq!(truncate("hi", 2), None);
    }

    async fn echo(body: String) -> String {
        body
    }

    #[tokio::test]
    async fn passes_request_body_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post("/echo")
            .form(&[("email", "foo@bar.baz"), ("password", "hunter2")])
            .await;

        response.assert_status_ok();
        response.assert_text("email=foo%40bar.baz&password=hunter2");
    }

    #[tokio::test]
    async fn log_in_response_token_is_not_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = build_router(get_test_app_state()).layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server.");
        server
            .post(endpoints::USERS)
            .form(&[("email", "foo@bar.baz"), ("password", TEST_PASSWORD)])
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post(endpoints::LOG_IN)
            .form(&[("email", "foo@bar.baz"), ("password", TEST_PASSWORD)])
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        let token = body["token"].as_str().unwrap();
        let logs = logs.contents();
        assert!(logs.contains("Sending response"), "expected responses to be logged");
        assert!(!logs.contains(token), "token was written to the logs");
        assert!(!logs.contains(TEST_PASSWORD), "password was written to the logs");
    }
}
