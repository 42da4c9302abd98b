use async_trait::async_trait;
use tracing::warn;

use crate::Result;

/// Delivers a text alert to an operator channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message. Returns `Error::NotifierFailure` on transport errors
    /// or a rejected request.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Send a message, logging instead of propagating any failure.
/// Returns whether the message was delivered.
pub async fn notify_best_effort(notifier: &dyn Notifier, message: &str) -> bool {
    match notifier.notify(message).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to deliver notification");
            false
        }
    }
}
