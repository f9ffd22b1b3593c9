use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{
    domain::{
        errors::{NotificationError, NotificationResult},
        models::PushMessage,
    },
    ports::notifications::PushTransport,
};

/// Expo push API endpoint
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

/// Push transport posting Expo-style messages to an HTTP push service
#[derive(Clone)]
pub struct HttpPushTransport {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    data: Vec<PushTicket>,
}

#[derive(Debug, Deserialize)]
struct PushTicket {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl HttpPushTransport {
    pub fn new(endpoint: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            access_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Turn the provider's per-message ticket into a delivery outcome
    fn interpret_response(address: &str, body: &str) -> NotificationResult<()> {
        let response: PushResponse =
            serde_json::from_str(body).map_err(|e| NotificationError::Transport {
                message: format!("Unreadable push response: {}", e),
            })?;

        match response.data.first() {
            Some(ticket) if ticket.status == "ok" => Ok(()),
            Some(ticket) => Err(NotificationError::Rejected {
                address: address.to_string(),
                reason: ticket
                    .message
                    .clone()
                    .unwrap_or_else(|| ticket.status.clone()),
            }),
            None => Err(NotificationError::Transport {
                message: "Push response contained no ticket".to_string(),
            }),
        }
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn deliver(&self, message: &PushMessage) -> NotificationResult<()> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&[message]);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| NotificationError::Transport {
            message: format!("Push request failed: {}", e),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| NotificationError::Transport {
            message: format!("Failed to read push response: {}", e),
        })?;

        if !status.is_success() {
            return Err(NotificationError::Transport {
                message: format!("Push service returned {}: {}", status, body),
            });
        }

        debug!(to = %message.to, "push notification accepted");
        Self::interpret_response(&message.to, &body)
    }
}
