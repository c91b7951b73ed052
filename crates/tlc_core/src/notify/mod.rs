//! Best-effort external notifications.
//!
//! Every surfaced change and issue can be mirrored to an external channel.
//! Delivery failures are logged and dropped; they never affect a run.

mod discord;

pub use discord::DiscordWebhookNotifier;

/// Errors from a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// HTTP client could not be built or the request failed to send.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Delivers a message somewhere outside the process.
pub trait Notifier {
    /// Send a message. Implementations swallow their own failures.
    fn notify(&self, message: &str);
}

/// Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str) {}
}

/// Build the configured notifier: a Discord webhook when a URL is set,
/// otherwise [`NullNotifier`].
pub fn from_webhook_url(url: &str) -> Box<dyn Notifier> {
    let url = url.trim();
    if url.is_empty() {
        return Box::new(NullNotifier);
    }

    match DiscordWebhookNotifier::new(url) {
        Ok(notifier) => Box::new(notifier),
        Err(e) => {
            tracing::warn!("Webhook notifications disabled: {}", e);
            Box::new(NullNotifier)
        }
    }
}
