// Defines the application error taxonomy and a result type alias using the thiserror crate.
use thiserror::Error;

use crate::models::Role;

// Make the response module public
pub mod response;

#[derive(Error, Debug)]
pub enum AppError {
    // Deliberately generic: never reveals whether the email or the
    // password was wrong.
    #[error("Please check your login details and try again.")]
    InvalidCredentials,

    #[error("Your account has been deactivated.")]
    AccountDeactivated,

    #[error("Please log in to continue.")]
    Unauthenticated,

    // Carries the denied identity's own role so the response layer can
    // send them to their own landing page, never the page they were denied.
    #[error("Access denied.")]
    Forbidden { role: Role },

    #[error("{field} is required.")]
    Validation {
        field: &'static str,
        redirect: &'static str,
    },

    #[error("{0} not found")]
    NotFound(String),

    // The #[from] attribute automatically converts a redis::RedisError into an AppError::Store.
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Template error: {0}")]
    Template(#[from] std::io::Error),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
