//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The route for registering a new user.
pub const USERS: &str = "/users";
/// The route for exchanging an email and password for an auth token.
pub const LOG_IN: &str = "/log_in";
/// The route to create and list the caller's transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to get, edit or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, for
/// example '{transaction_id}' in '/transactions/{transaction_id}'.
///
/// If no parameter is found in `endpoint_path`, the original path is returned.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let end = endpoint_path[start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| start + offset + 1);

    format!("{}{id}{}", &endpoint_path[..start], &endpoint_path[end..])
}
