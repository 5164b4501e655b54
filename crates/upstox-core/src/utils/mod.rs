//! Utility functions for text formatting.

pub mod format;

pub use format::{format_currency, format_epoch_millis, format_percentage, format_quantity};
