//! Data models for Upstox API payloads.
//!
//! - `TokenResponse`, `UserIdentity`, `Profile`: login and user data
//! - `Holding`, `Position`: portfolio data
//! - `MarketStatus`, `LtpQuote`, `FullQuote`, `Ohlc`: market data
//!
//! Every successful Upstox response is wrapped in `ApiResponse`.

pub mod market;
pub mod portfolio;
pub mod user;

use serde::Deserialize;

pub use market::{FullQuote, LtpQuote, MarketStatus, Ohlc};
pub use portfolio::{Holding, Position};
pub use user::{Profile, TokenResponse, UserIdentity};

/// `{"status": "success", "data": ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: String,
    pub data: T,
}
