pub mod auth;

pub use auth::{client_context, require_admin, require_auth, AuthUser};
