//! Payment provider glue: order registration and refunds with the gateway,
//! and checkout signature verification.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::{api_log::ApiLogger, errors::ServiceError};

type HmacSha256 = Hmac<Sha256>;

/// Provider-side order the storefront hands to the payment widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrder {
    pub provider: String,
    pub provider_order_id: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn provider(&self) -> &str;

    async fn create_order(&self, amount: Decimal, currency: &str, receipt: &str) -> Result<GatewayOrder, ServiceError>;

    /// Refund `amount` of a captured payment and return the provider's refund id.
    async fn refund(&self, provider_payment_id: &str, amount: Decimal) -> Result<String, ServiceError>;
}

/// Amount in paise (or the currency's minor unit).
pub fn to_minor_units(amount: Decimal) -> Result<i64, ServiceError> {
    (amount * Decimal::new(100, 0))
        .round()
        .to_i64()
        .ok_or_else(|| ServiceError::Validation(format!("amount {amount} out of range")))
}

/// Hex HMAC-SHA256 of `order_id|payment_id`.
pub fn sign(secret: &str, provider_order_id: &str, provider_payment_id: &str) -> Result<String, ServiceError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| ServiceError::Validation(e.to_string()))?;
    mac.update(format!("{provider_order_id}|{provider_payment_id}").as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time check of the checkout signature. An empty secret verifies nothing.
pub fn verify_signature(secret: &str, provider_order_id: &str, provider_payment_id: &str, signature: &str) -> bool {
    if secret.trim().is_empty() {
        return false;
    }
    let Ok(expected) = hex::decode(signature.trim()) else { return false };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else { return false };
    mac.update(format!("{provider_order_id}|{provider_payment_id}").as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[derive(Serialize)]
struct RazorpayOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Serialize)]
struct RazorpayRefundRequest {
    amount: i64,
}

/// Orders and refunds both answer with at least an `id`.
#[derive(Deserialize)]
struct RazorpayEntity {
    id: String,
}

pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    api_log: ApiLogger,
}

impl RazorpayGateway {
    pub fn new(cfg: &configs::PaymentConfig, api_log: ApiLogger) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.razorpay.com/v1".into(),
            key_id: cfg.key_id.clone(),
            key_secret: cfg.key_secret.clone(),
            api_log,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn provider(&self) -> &str { "razorpay" }

    async fn create_order(&self, amount: Decimal, currency: &str, receipt: &str) -> Result<GatewayOrder, ServiceError> {
        let amount_minor = to_minor_units(amount)?;
        let req = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&RazorpayOrderRequest { amount: amount_minor, currency, receipt })
            .build()
            .map_err(|e| ServiceError::external("razorpay", e))?;
        let body = self.api_log.execute(&self.client, "razorpay", req).await?;
        let parsed: RazorpayEntity = serde_json::from_str(&body).map_err(|e| ServiceError::external("razorpay", e))?;
        Ok(GatewayOrder { provider: "razorpay".into(), provider_order_id: parsed.id, amount_minor, currency: currency.to_string() })
    }

    async fn refund(&self, provider_payment_id: &str, amount: Decimal) -> Result<String, ServiceError> {
        let req = self
            .client
            .post(format!("{}/payments/{provider_payment_id}/refund", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&RazorpayRefundRequest { amount: to_minor_units(amount)? })
            .build()
            .map_err(|e| ServiceError::external("razorpay", e))?;
        let body = self.api_log.execute(&self.client, "razorpay", req).await?;
        let parsed: RazorpayEntity = serde_json::from_str(&body).map_err(|e| ServiceError::external("razorpay", e))?;
        Ok(parsed.id)
    }
}

/// Issues local order and refund ids. Only wired when `payment.allow_offline` is set.
pub struct OfflineGateway;

#[async_trait]
impl PaymentGateway for OfflineGateway {
    fn provider(&self) -> &str { "offline" }

    async fn create_order(&self, amount: Decimal, currency: &str, _receipt: &str) -> Result<GatewayOrder, ServiceError> {
        Ok(GatewayOrder {
            provider: "offline".into(),
            provider_order_id: format!("order_{}", Uuid::new_v4().simple()),
            amount_minor: to_minor_units(amount)?,
            currency: currency.to_string(),
        })
    }

    async fn refund(&self, _provider_payment_id: &str, amount: Decimal) -> Result<String, ServiceError> {
        to_minor_units(amount)?;
        Ok(format!("rfnd_{}", Uuid::new_v4().simple()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_signature_verifies() {
        let sig = sign("s3cret", "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify_signature("s3cret", "order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f", &sig));
    }

    #[test]
    fn any_other_signature_fails() {
        let sig = sign("s3cret", "order_1", "pay_1").unwrap();
        assert!(!verify_signature("other", "order_1", "pay_1", &sig));
        assert!(!verify_signature("s3cret", "order_2", "pay_1", &sig));
        assert!(!verify_signature("s3cret", "order_1", "pay_2", &sig));
        assert!(!verify_signature("s3cret", "order_1", "pay_1", "not-hex"));
        assert!(!verify_signature("s3cret", "order_1", "pay_1", ""));
    }

    #[test]
    fn empty_secret_never_verifies() {
        let forged = sign("", "order_1", "pay_1").unwrap();
        assert!(!verify_signature("", "order_1", "pay_1", &forged));
        assert!(!verify_signature("   ", "order_1", "pay_1", &forged));
    }

    async fn stub(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{addr}")
    }

    fn razorpay(base_url: String) -> RazorpayGateway {
        let cfg = configs::PaymentConfig { key_id: "rzp_test_1".into(), key_secret: "s".into(), ..Default::default() };
        let mut gw = RazorpayGateway::new(&cfg, ApiLogger::disabled());
        gw.base_url = base_url;
        gw
    }

    #[tokio::test]
    async fn razorpay_refund_posts_minor_units() {
        use axum::{extract::Path, routing::post, Json};
        let app = axum::Router::new().route(
            "/payments/:id/refund",
            post(|Path(id): Path<String>, Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({ "id": format!("rfnd_{id}_{}", body["amount"]), "entity": "refund" }))
            }),
        );
        let gw = razorpay(stub(app).await);
        let id = gw.refund("pay_29QQoUBi66xm2f", Decimal::new(200, 0)).await.unwrap();
        assert_eq!(id, "rfnd_pay_29QQoUBi66xm2f_20000");
    }

    #[tokio::test]
    async fn razorpay_refund_failure_is_external() {
        use axum::{http::StatusCode, routing::post};
        let app = axum::Router::new().route(
            "/payments/:id/refund",
            post(|| async { (StatusCode::BAD_REQUEST, r#"{"error":{"code":"BAD_REQUEST_ERROR"}}"#) }),
        );
        let gw = razorpay(stub(app).await);
        let err = gw.refund("pay_1", Decimal::new(10, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::External(m) if m.starts_with("razorpay")));
    }

    #[tokio::test]
    async fn offline_refund_issues_local_id() {
        let id = OfflineGateway.refund("pay_1", Decimal::new(10, 0)).await.unwrap();
        assert!(id.starts_with("rfnd_"));
    }

    #[test]
    fn minor_units_round() {
        assert_eq!(to_minor_units(Decimal::new(49950, 2)).unwrap(), 49950);
        assert_eq!(to_minor_units(Decimal::new(1, 0)).unwrap(), 100);
    }

    #[tokio::test]
    async fn offline_gateway_issues_ids() {
        let o = OfflineGateway.create_order(Decimal::new(120, 0), "INR", "SPC-1").await.unwrap();
        assert!(o.provider_order_id.starts_with("order_"));
        assert_eq!(o.amount_minor, 12000);
    }
}
