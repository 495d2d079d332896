//! Shared utilities for the flash token workspace.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration, format_time_to_expiry};
