//! Core library for upstox-bridge.
//!
//! Provides the OAuth token lifecycle (`auth`), a typed client for the
//! Upstox REST API (`api`), response models, local configuration, the
//! static stock directory and the text-formatting tool service used by the
//! stdio tool server.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod stocks;
pub mod tools;
pub mod utils;

pub use error::{Error, Result};
