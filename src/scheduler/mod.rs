//! Reload Scheduler Module
//!
//! Owns the recurring reload timer and the disable -> wait -> enable
//! sequence run against the configured target component.

pub mod reloader;


pub use reloader::{ReloadOutcome, ReloadScheduler};
