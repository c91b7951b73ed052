//! Discord webhook delivery.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{NotifyError, Notifier};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Discord rejects `content` longer than this many characters.
const MAX_CONTENT_CHARS: usize = 2000;

/// Longest wait honored from a rate-limit response.
const MAX_RETRY_WAIT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Body of an HTTP 429 from Discord. `retry_after` is in seconds.
#[derive(Debug, Deserialize)]
struct RateLimited {
    retry_after: f64,
}

/// Posts messages to a Discord webhook.
#[derive(Debug, Clone)]
pub struct DiscordWebhookNotifier {
    client: Client,
    url: String,
}

impl DiscordWebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Post once, retrying a single time when rate limited.
    pub fn send(&self, message: &str) -> Result<(), NotifyError> {
        match self.post(message)? {
            None => Ok(()),
            Some(wait) => {
                tracing::debug!("Webhook rate limited, retrying in {:?}", wait);
                std::thread::sleep(wait);
                match self.post(message)? {
                    None => Ok(()),
                    Some(_) => Err(NotifyError::Status {
                        status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
                        body: "rate limited".to_string(),
                    }),
                }
            }
        }
    }

    /// Returns the wait hint when the webhook answered 429.
    fn post(&self, message: &str) -> Result<Option<Duration>, NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { content: message })
            .send()?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().unwrap_or_default();
            return Ok(Some(retry_wait(&body)));
        }
        if !status.is_success() {
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        Ok(None)
    }
}

impl Notifier for DiscordWebhookNotifier {
    fn notify(&self, message: &str) {
        if message.trim().is_empty() {
            return;
        }
        for chunk in split_message(message, MAX_CONTENT_CHARS) {
            if let Err(e) = self.send(&chunk) {
                tracing::warn!("Discord notification failed: {}", e);
                return;
            }
        }
    }
}

/// Split `message` into pieces of at most `limit` characters, breaking on
/// line boundaries. A single line longer than `limit` is cut mid-line.
fn split_message(message: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in message.lines() {
        let mut line_chars: Vec<char> = line.chars().collect();

        while line_chars.len() > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = line_chars.split_off(limit);
            chunks.push(line_chars.into_iter().collect());
            line_chars = rest;
        }

        let needed = if current.is_empty() { line_chars.len() } else { current_len + 1 + line_chars.len() };
        if needed > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current_len += line_chars.len();
        current.extend(line_chars);
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Wait time from a 429 body, capped. Defaults to one second.
fn retry_wait(body: &str) -> Duration {
    serde_json::from_str::<RateLimited>(body)
        .ok()
        .filter(|r| r.retry_after.is_finite() && r.retry_after >= 0.0)
        .map(|r| Duration::from_secs_f64(r.retry_after))
        .unwrap_or(Duration::from_secs(1))
        .min(MAX_RETRY_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_wait_parses_hint() {
        assert_eq!(retry_wait(r#"{"message":"slow down","retry_after":0.5,"global":false}"#), Duration::from_millis(500));
    }

    #[test]
    fn retry_wait_defaults_and_caps() {
        assert_eq!(retry_wait("not json"), Duration::from_secs(1));
        assert_eq!(retry_wait(r#"{"retry_after":-3}"#), Duration::from_secs(1));
        assert_eq!(retry_wait(r#"{"retry_after":3600}"#), MAX_RETRY_WAIT);
    }

    #[test]
    fn short_message_is_one_chunk() {
        assert_eq!(split_message("--- Changes ---\nNone", 2000), vec!["--- Changes ---\nNone".to_string()]);
    }

    #[test]
    fn long_summary_splits_on_line_boundaries() {
        let lines: Vec<String> = (0..100).map(|i| format!("[CHANGED] /anime/Show - {:03}-Group.mkv (track 2): und -> eng", i)).collect();
        let message = lines.join("\n");
        assert!(message.chars().count() > 2000);

        let chunks = split_message(&message, 2000);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 2000));
        // nothing lost, no line cut
        assert_eq!(chunks.join("\n"), message);
    }

    #[test]
    fn overlong_line_is_cut() {
        let line = "é".repeat(25);
        let chunks = split_message(&format!("head\n{}", line), 10);
        assert_eq!(chunks[0], "head");
        assert_eq!(chunks[1], "é".repeat(10));
        assert_eq!(chunks[3], "é".repeat(5));
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn message_body_shape() {
        let json = serde_json::to_string(&WebhookMessage { content: "hello" }).unwrap();
        assert_eq!(json, r#"{"content":"hello"}"#);
    }

    #[test]
    fn unreachable_webhook_is_swallowed() {
        let notifier = DiscordWebhookNotifier::new("http://127.0.0.1:9/webhook").unwrap();
        assert!(notifier.send("test").is_err());
        // notify never panics or propagates
        notifier.notify("test");
    }
}
