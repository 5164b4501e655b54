//! Authentication module for the Upstox OAuth flow.
//!
//! This module provides:
//! - `Credentials`: API key, secret and redirect target
//! - `Session` / `TokenRecord`: in-memory and on-disk token state
//! - `TokenManager`: the token lifecycle and the authenticated reads
//!
//! Tokens are persisted to a JSON file and stop working at the nightly
//! 03:30 IST reset; nothing here refreshes them.

pub mod credentials;
pub mod manager;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use credentials::{Credentials, DEFAULT_REDIRECT_URI};
pub use manager::{
    extract_authorization_code, ConnectionStatus, ExchangeOutcome, TokenManager, DEFAULT_STATE,
};
pub use session::{Session, TokenRecord, DEFAULT_TOKEN_FILE, TOKEN_VALIDITY};
