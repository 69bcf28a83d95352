//! Outbound customer messages. One attempt per message; failures are
//! returned to the caller wrapped as `External`.

pub mod email;
pub mod sms;

use std::sync::Arc;

use tracing::warn;

use models::order;

pub use email::{EmailSender, LogEmailSender, OutgoingEmail, SmtpEmailSender};
pub use sms::{HttpSmsSender, LogSmsSender, SmsSender};

#[derive(Clone)]
pub struct Notifier {
    pub email: Arc<dyn EmailSender>,
    pub sms: Arc<dyn SmsSender>,
}

impl Notifier {
    /// SMTP and SMS gateway when configured, logging stand-ins otherwise.
    pub fn from_config(smtp: Option<&configs::SmtpConfig>, sms: Option<&configs::SmsConfig>, api_log: crate::api_log::ApiLogger) -> anyhow::Result<Self> {
        let email: Arc<dyn EmailSender> = match smtp {
            Some(cfg) => Arc::new(SmtpEmailSender::new(cfg)?),
            None => Arc::new(LogEmailSender),
        };
        let sms: Arc<dyn SmsSender> = match sms {
            Some(cfg) => Arc::new(HttpSmsSender::new(cfg, api_log)),
            None => Arc::new(LogSmsSender),
        };
        Ok(Self { email, sms })
    }

    pub fn logging() -> Self {
        Self { email: Arc::new(LogEmailSender), sms: Arc::new(LogSmsSender) }
    }

    /// Email and SMS after a successful payment. Delivery problems are logged;
    /// the order is already paid at this point.
    pub async fn order_confirmed(&self, order: &order::Model, email_to: &str, phone: Option<&str>, store_name: &str) {
        let mail = email::order_confirmation(order, email_to, store_name);
        if let Err(e) = self.email.send(mail).await {
            warn!(order_number = %order.order_number, error = %e, "order confirmation email failed");
        }
        if let Some(phone) = phone {
            let text = format!(
                "{store_name}: payment received for order {} ({} {}). Thank you!",
                order.order_number, order.currency_code, order.grand_total
            );
            if let Err(e) = self.sms.send(phone, &text).await {
                warn!(order_number = %order.order_number, error = %e, "order confirmation sms failed");
            }
        }
    }
}
