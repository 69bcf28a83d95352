use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::{api_log::ApiLogger, errors::ServiceError};

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, text: &str) -> Result<(), ServiceError>;
}

/// Request body as stored in `third_party_api_log`; credentials travel in headers.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayMessage<'a> {
    sender: &'a str,
    to: &'a str,
    message: &'a str,
}

/// JSON-over-HTTP SMS gateway.
pub struct HttpSmsSender {
    client: reqwest::Client,
    gateway_url: String,
    api_key: String,
    sender_id: String,
    api_log: ApiLogger,
}

impl HttpSmsSender {
    pub fn new(cfg: &configs::SmsConfig, api_log: ApiLogger) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url: cfg.gateway_url.clone(),
            api_key: cfg.api_key.clone(),
            sender_id: cfg.sender_id.clone(),
            api_log,
        }
    }

    fn request(&self, phone: &str, text: &str) -> Result<reqwest::Request, ServiceError> {
        self.client
            .post(&self.gateway_url)
            .bearer_auth(&self.api_key)
            .json(&GatewayMessage { sender: &self.sender_id, to: phone, message: text })
            .build()
            .map_err(|e| ServiceError::external("sms", e))
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, phone: &str, text: &str) -> Result<(), ServiceError> {
        let req = self.request(phone, text)?;
        self.api_log.execute(&self.client, "sms", req).await?;
        info!(to = %phone, "sms_sent");
        Ok(())
    }
}

pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, phone: &str, text: &str) -> Result<(), ServiceError> {
        info!(to = %phone, chars = text.len(), "sms_skipped: gateway not configured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_stays_out_of_logged_body() {
        let cfg = configs::SmsConfig {
            gateway_url: "https://sms.example.com/send".into(),
            api_key: "sk-live-0f3c9a".into(),
            sender_id: "SPICES".into(),
        };
        let req = HttpSmsSender::new(&cfg, ApiLogger::disabled()).request("9000000000", "Order SPC-1 confirmed").unwrap();
        let body = String::from_utf8_lossy(req.body().and_then(|b| b.as_bytes()).unwrap()).into_owned();
        assert!(!body.contains("sk-live-0f3c9a"), "{body}");
        assert!(body.contains("SPICES"));
        let auth = req.headers().get(reqwest::header::AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer sk-live-0f3c9a");
        assert!(auth.is_sensitive());
    }
}
