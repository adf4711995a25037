use async_trait::async_trait;
use bridgette_common::Message;
use reqwest::Client;

/// Best-effort direct messages to a single user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `message` to the user's direct-message space. Failures are
    /// logged and swallowed; callers must not assume delivery.
    async fn send_direct(&self, user_id: &str, message: &Message);
}

/// Direct-message space for a user resource name (`users/123` -> `spaces/123`).
pub fn direct_space_name(user_id: &str) -> Option<String> {
    user_id
        .split('/')
        .nth(1)
        .filter(|id| !id.is_empty())
        .map(|id| format!("spaces/{}", id))
}

/// Google Chat REST API notifier.
pub struct ChatNotifier {
    http_client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, thiserror::Error)]
enum SendError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Chat API error: {0}")]
    Api(String),
}

impl ChatNotifier {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    async fn post(&self, space: &str, message: &Message) -> Result<(), SendError> {
        let url = format!("{}/v1/{}/messages", self.base_url, space);

        tracing::debug!("Sending direct message: {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(message)
            .send()
            .await
            .map_err(|e| SendError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Api(format!("{}: {}", status, body)));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for ChatNotifier {
    async fn send_direct(&self, user_id: &str, message: &Message) {
        let Some(space) = direct_space_name(user_id) else {
            tracing::warn!("Cannot derive a direct-message space for {}", user_id);
            return;
        };

        if let Err(e) = self.post(&space, message).await {
            tracing::error!("Failed to send message to {}: {}", user_id, e);
        }
    }
}
