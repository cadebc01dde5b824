//! HTTP client for the Resend email API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use village_types::{AccessCode, Email};

use crate::error::MailError;
use crate::mailer::Mailer;
use crate::template;

/// Default timeout for a send request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone, Debug)]
pub struct ResendConfig {
    pub api_url: String,
    pub api_key: String,
    /// `From` header, e.g. `YC Startup Village <noreply@example.com>`.
    pub from: String,
    /// Public base URL of the app, used for the login link.
    pub app_url: String,
}

/// Body of `POST /emails`.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Mailer backed by the Resend HTTP API.
///
/// Sends `POST {api_url}` with a bearer key; any non-2xx status is a delivery
/// failure.
pub struct ResendMailer {
    config: ResendConfig,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Result<Self, MailError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| MailError::Client(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_access_code_email(
        &self,
        to: &Email,
        code: &AccessCode,
    ) -> Result<(), MailError> {
        let html = template::access_code_html(code.as_str(), &self.config.app_url);
        let body = SendRequest {
            from: &self.config.from,
            to: [to.as_str()],
            subject: template::SUBJECT,
            html: &html,
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailError::Delivery(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    MailError::Delivery(format!("connection failed: {e}"))
                } else {
                    MailError::Delivery(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail = %detail, "mail provider rejected message");
            return Err(MailError::Delivery(format!("HTTP status {status}")));
        }

        tracing::debug!(to = %to, "access code email accepted by provider");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = SendRequest {
            from: "Village <noreply@example.com>",
            to: ["a@b.io"],
            subject: "s",
            html: "<p>x</p>",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "Village <noreply@example.com>",
                "to": ["a@b.io"],
                "subject": "s",
                "html": "<p>x</p>",
            })
        );
    }

    #[test]
    fn builds_client_from_config() {
        let mailer = ResendMailer::new(ResendConfig {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: "k".to_string(),
            from: "f@example.com".to_string(),
            app_url: "http://localhost:3000".to_string(),
        });
        assert!(mailer.is_ok());
    }

    #[tokio::test]
    async fn unreachable_provider_is_delivery_failure() {
        let mailer = ResendMailer::new(ResendConfig {
            api_url: "http://127.0.0.1:9/emails".to_string(),
            api_key: "k".to_string(),
            from: "f@example.com".to_string(),
            app_url: "http://localhost:3000".to_string(),
        })
        .unwrap();
        let err = mailer
            .send_access_code_email(&Email::new("a@b.io"), &AccessCode::new("YC25-AAAAAA"))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Delivery(_)));
    }
}
