use std::time::Duration;

use serde::Serialize;

use crate::error::SendError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Body posted to the webhook. `content` is the only field Discord needs.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// A message addressed to one Discord user, built fresh for every send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub recipient_mention: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(recipient_id: &str, body: impl Into<String>) -> Self {
        Self {
            recipient_mention: mention(recipient_id),
            body: body.into(),
        }
    }

    /// Mention token, one space, then the body.
    pub fn content(&self) -> String {
        format!("{} {}", self.recipient_mention, self.body)
    }
}

fn mention(user_id: &str) -> String {
    format!("<@{}>", user_id)
}

pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
    recipient_id: String,
}

impl Notifier {
    pub fn new(webhook_url: String, recipient_id: String) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(SendError::Client)?;

        Ok(Self {
            client,
            webhook_url,
            recipient_id,
        })
    }

    /// Posts `body` once. Identical calls produce identical, repeated messages.
    pub async fn notify(&self, body: &str) -> Result<(), SendError> {
        let message = NotificationMessage::new(&self.recipient_id, body);
        let content = message.content();

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookPayload { content: &content })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Discord webhook request failed");
                SendError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Discord webhook rejected message");
            return Err(SendError::Status { status, body });
        }

        tracing::debug!(%status, "Discord webhook accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn content_is_mention_space_body() {
        let message = NotificationMessage::new("123", "hello");
        assert_eq!(message.content(), "<@123> hello");
    }

    #[tokio::test]
    async fn posts_content_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "content": "<@42> 草チェック" })))
            .with_status(204)
            .expect(1)
            .create_async()
            .await;

        let notifier = Notifier::new(format!("{}/webhook", server.url()), "42".into()).unwrap();
        notifier.notify("草チェック").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_send_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook")
            .with_status(400)
            .with_body(r#"{"message": "Cannot send an empty message", "code": 50006}"#)
            .expect(1)
            .create_async()
            .await;

        let notifier = Notifier::new(format!("{}/webhook", server.url()), "42".into()).unwrap();
        let err = notifier.notify("hello").await.unwrap_err();

        match err {
            SendError::Status { status, body } => {
                assert_eq!(status.as_u16(), 400);
                assert!(body.contains("50006"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_webhook_is_network_error() {
        let notifier = Notifier::new("http://127.0.0.1:1/webhook".into(), "42".into()).unwrap();
        let err = notifier.notify("hello").await.unwrap_err();

        assert!(matches!(err, SendError::Network(_)), "got {err:?}");
    }
}
