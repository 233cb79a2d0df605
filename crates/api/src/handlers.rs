pub mod admin;
pub mod assets;
pub mod audit;
pub mod error;
pub mod health;
pub mod users;

// Re-export common types
pub use error::ErrorResponse;
