//! Plugin reloader core.
//!
//! An automation helper embedded inside a larger host application. It
//! periodically disables and re-enables one other component of that host,
//! on a timer, to force the host to reload that component's code and state.
//! This crate provides:
//! - Settings persistence with default overlay (JSON file storage)
//! - A recurring reload scheduler with manual trigger support
//! - The disable -> wait -> enable reload sequence with single-flight guarding
//! - Narrow host capability traits for target control and user notices

pub mod core;
pub mod host;
pub mod scheduler;
pub mod settings;

// Re-export commonly used items
pub use crate::core::error::{ReloaderError, Result};
pub use host::{HostError, LogNotifier, Notifier, TargetControl};
pub use scheduler::{ReloadOutcome, ReloadScheduler};
pub use settings::{ReloaderSettings, SettingsStore};
