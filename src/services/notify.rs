//! Fire-and-forget webhook notifications.

use serde_json::{json, Value};

/// POST an event to the configured webhook, if any. Runs detached so the
/// caller never waits on the remote endpoint; failures are logged only.
pub fn dispatch(notify_url: Option<String>, event: &str, payload: Value) {
    let Some(url) = notify_url else {
        return;
    };

    let body = json!({
        "event": event,
        "payload": payload,
    });

    tokio::spawn(async move {
        let client = reqwest::Client::new();
        match client.post(&url).json(&body).send().await {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!("notification endpoint returned {}", resp.status());
            }
            Ok(_) => {
                tracing::debug!("notification delivered to {}", url);
            }
            Err(e) => {
                tracing::warn!("failed to deliver notification: {}", e);
            }
        }
    });
}
