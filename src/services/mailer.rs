use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Outgoing message for the Resend `/emails` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub tags: Vec<EmailTag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailTag {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Thin Resend client used by the feedback form
#[derive(Clone)]
pub struct Mailer {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    pub from: String,
    pub to: String,
}

impl Mailer {
    pub fn new(
        api_key: String,
        api_url: impl Into<String>,
        from: String,
        to: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            from,
            to,
        })
    }

    /// Sends an email and returns the provider's message id
    pub async fn send(&self, email: &Email) -> AppResult<Option<String>> {
        let url = format!("{}/emails", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Mail(format!(
                "Resend API returned status {}: {}",
                status, body
            )));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Mail(format!("Failed to parse Resend response: {}", e)))?;

        tracing::info!(id = ?sent.id, "Feedback email sent");

        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn email() -> Email {
        Email {
            from: "Vidoza Feedback <onboarding@resend.dev>".to_string(),
            to: vec!["feedback@vidoza.app".to_string()],
            subject: "[Vidoza Feedback] Hello".to_string(),
            html: "<p>hi</p>".to_string(),
            tags: vec![EmailTag {
                name: "category".to_string(),
                value: "feedback".to_string(),
            }],
        }
    }

    fn mailer_for(server: &Server) -> Mailer {
        Mailer::new(
            "re_test".to_string(),
            server.url(),
            "Vidoza Feedback <onboarding@resend.dev>".to_string(),
            "feedback@vidoza.app".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_returns_message_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(Matcher::PartialJson(json!({
                "subject": "[Vidoza Feedback] Hello",
                "tags": [{ "name": "category", "value": "feedback" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": "email_123" }).to_string())
            .create_async()
            .await;

        let id = mailer_for(&server).send(&email()).await.unwrap();

        assert_eq!(id.as_deref(), Some("email_123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_rejection_is_mail_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body(json!({ "message": "Invalid `to` field" }).to_string())
            .create_async()
            .await;

        let err = mailer_for(&server).send(&email()).await.unwrap_err();
        assert!(matches!(err, AppError::Mail(_)));
    }
}
