//! Host capability seams.
//!
//! The reloader runs embedded in a larger application and drives exactly one
//! other component of that host. Everything it needs from the host goes
//! through the narrow traits in this module; the embedding application
//! supplies the adapters.

use async_trait::async_trait;
use thiserror::Error;

/// Error reported by a host adapter when a target-control call fails.
///
/// Host APIs differ too much to type their failures; what the reloader needs
/// from them is the human-readable message for the failure notice.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HostError(String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Control surface for the managed target component.
#[async_trait]
pub trait TargetControl: Send + Sync {
    /// Whether the target is currently active in the host.
    async fn is_active(&self, target_id: &str) -> bool;

    /// Ask the host to deactivate the target.
    async fn deactivate(&self, target_id: &str) -> Result<(), HostError>;

    /// Ask the host to activate the target.
    async fn activate(&self, target_id: &str) -> Result<(), HostError>;
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier for hosts without a notice UI: routes notices to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}
