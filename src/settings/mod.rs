//! Settings Module
//!
//! Holds the reloader's configuration record and its JSON file-backed store.
//! Loading overlays the persisted partial record on defaults and never fails;
//! saving is atomic and propagates storage errors to the caller.

pub mod store;


pub use store::{ReloaderSettings, SettingsStore};
