//! REST API client module for the Upstox v2 API.
//!
//! `ApiClient` talks HTTP; `BrokerApi` is the seam the token manager
//! depends on, so the remote can be replaced in tests.

pub mod client;
pub mod error;

pub use client::{ApiClient, BrokerApi, API_BASE_URL};
pub use error::ApiError;
