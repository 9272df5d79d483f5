//! Settings Storage Implementation
//!
//! Provides JSON file-based settings storage with:
//! - Atomic writes using temp file + rename
//! - Thread-safe access via RwLock
//! - Default overlay on load: persisted fields are merged over defaults one
//!   by one, so an absent or malformed field never breaks loading

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::error::{ReloaderError, Result};

/// Reloader configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloaderSettings {
    /// Identifier of the managed component; empty means none selected
    #[serde(default)]
    pub target_id: String,

    /// Minutes between automatic reload ticks
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Pause between the disable and enable steps, in seconds
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Whether the automatic timer runs at all
    #[serde(default)]
    pub enabled: bool,

    /// Whether diagnostic messages are emitted
    #[serde(default)]
    pub debug_enabled: bool,
}

fn default_interval_minutes() -> u64 {
    1
}

fn default_delay_seconds() -> f64 {
    0.1
}

impl Default for ReloaderSettings {
    fn default() -> Self {
        Self {
            target_id: String::new(),
            interval_minutes: default_interval_minutes(),
            delay_seconds: default_delay_seconds(),
            enabled: false,
            debug_enabled: false,
        }
    }
}

impl ReloaderSettings {
    /// Overlay a persisted partial record on the defaults, field by field.
    ///
    /// A field that is absent, of the wrong JSON type, or outside its allowed
    /// range keeps its default. The scheduler invariant (positive interval,
    /// non-negative finite delay) therefore holds for any input.
    pub fn from_partial(value: &Value) -> Self {
        let mut settings = Self::default();
        let Some(record) = value.as_object() else {
            return settings;
        };

        if let Some(v) = record.get("target_id").and_then(Value::as_str) {
            settings.target_id = v.to_string();
        }
        if let Some(v) = record.get("interval_minutes").and_then(Value::as_u64) {
            if v > 0 {
                settings.interval_minutes = v;
            }
        }
        if let Some(v) = record.get("delay_seconds").and_then(Value::as_f64) {
            if v >= 0.0 && v.is_finite() {
                settings.delay_seconds = v;
            }
        }
        if let Some(v) = record.get("enabled").and_then(Value::as_bool) {
            settings.enabled = v;
        }
        if let Some(v) = record.get("debug_enabled").and_then(Value::as_bool) {
            settings.debug_enabled = v;
        }

        settings
    }
}

/// Settings store with thread-safe access and file persistence.
pub struct SettingsStore {
    settings: Arc<RwLock<ReloaderSettings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Default settings file location under the host user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plugin-reloader")
            .join("settings.json")
    }

    /// Open a store backed by the given file.
    ///
    /// Missing or unreadable content yields the defaults; only failing to
    /// create the parent directory is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let settings = Self::load_from_file(&path).await;
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        })
    }

    /// Load settings from file, merging over defaults.
    async fn load_from_file(path: &Path) -> ReloaderSettings {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(value) => ReloaderSettings::from_partial(&value),
                Err(e) => {
                    tracing::warn!("Settings file is not valid JSON, using defaults: {}", e);
                    ReloaderSettings::default()
                }
            },
            Err(_) => ReloaderSettings::default(),
        }
    }

    /// Save settings to file with atomic write.
    async fn save_to_file(path: &Path, settings: &ReloaderSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        // Write to temp file first
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;

        // Atomic rename
        tokio::fs::rename(&temp_path, path).await?;

        Ok(())
    }

    /// Get the current settings (read-only snapshot).
    pub async fn get(&self) -> ReloaderSettings {
        self.settings.read().await.clone()
    }

    /// Shared handle the scheduler reads current settings through.
    pub fn shared(&self) -> Arc<RwLock<ReloaderSettings>> {
        Arc::clone(&self.settings)
    }

    /// Update settings and persist the full record.
    pub async fn update<F>(&self, updater: F) -> Result<ReloaderSettings>
    where
        F: FnOnce(&mut ReloaderSettings),
    {
        let mut settings = self.settings.write().await;
        updater(&mut settings);
        Self::save_to_file(&self.path, &settings).await?;
        Ok(settings.clone())
    }

    /// Persist the current record without modifying it.
    pub async fn save(&self) -> Result<()> {
        let settings = self.settings.read().await;
        Self::save_to_file(&self.path, &settings).await
    }

    /// Get the settings file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

// Per-field setters used by the settings UI layer.
impl SettingsStore {
    /// Select the target component to reload; empty clears the selection.
    pub async fn set_target(&self, target_id: impl Into<String>) -> Result<ReloaderSettings> {
        let target_id = target_id.into();
        self.update(|s| s.target_id = target_id).await
    }

    /// Set the automatic reload interval.
    pub async fn set_interval_minutes(&self, minutes: u64) -> Result<ReloaderSettings> {
        if minutes == 0 {
            return Err(ReloaderError::InvalidSetting(
                "interval must be at least one minute".to_string(),
            ));
        }
        self.update(|s| s.interval_minutes = minutes).await
    }

    /// Set the pause between the disable and enable steps.
    pub async fn set_delay_seconds(&self, seconds: f64) -> Result<ReloaderSettings> {
        if !(seconds >= 0.0 && seconds.is_finite()) {
            return Err(ReloaderError::InvalidSetting(
                "delay must be a non-negative number of seconds".to_string(),
            ));
        }
        self.update(|s| s.delay_seconds = seconds).await
    }

    /// Enable or disable the automatic timer.
    pub async fn set_enabled(&self, enabled: bool) -> Result<ReloaderSettings> {
        self.update(|s| s.enabled = enabled).await
    }

    /// Enable or disable diagnostic messages.
    pub async fn set_debug_enabled(&self, enabled: bool) -> Result<ReloaderSettings> {
        self.update(|s| s.debug_enabled = enabled).await
    }
}
