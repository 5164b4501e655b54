use thiserror::Error;

use crate::api::ApiError;

/// Failures surfaced by the authentication core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to exchange authorization code: {0}")]
    AuthExchange(#[source] ApiError),

    #[error("Not authenticated. Complete the login flow first.")]
    NotAuthenticated,

    #[error("Remote API error: {0}")]
    Remote(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The remote error behind this failure, if there is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::AuthExchange(e) | Error::Remote(e) => Some(e),
            _ => None,
        }
    }
}
