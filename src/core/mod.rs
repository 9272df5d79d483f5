//! Core types shared across the crate.

pub mod error;

pub use self::error::{ReloaderError, Result};
