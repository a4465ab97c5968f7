//! User registration, log in, and the bearer token auth guard.

mod form;
mod log_in;
mod middleware;
mod register_user;
mod token;

pub use log_in::post_log_in;
pub use middleware::auth_guard;
pub use register_user::register_user;
