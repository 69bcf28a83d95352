use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
    Message, Tokio1Executor,
};
use tracing::info;

use models::order;

use crate::{errors::ServiceError, invoice::template::escape, metrics};

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, mail: OutgoingEmail) -> Result<(), ServiceError>;
}

pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpEmailSender {
    pub fn new(cfg: &configs::SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        Ok(Self { transport, from: cfg.from.clone() })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, mail: OutgoingEmail) -> Result<(), ServiceError> {
        let wrap = |e: &dyn std::fmt::Display| ServiceError::external("smtp", e);
        let msg = Message::builder()
            .from(self.from.parse().map_err(|e| wrap(&e))?)
            .to(mail.to.parse().map_err(|e| wrap(&e))?)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)
            .map_err(|e| wrap(&e))?;
        let res = self.transport.send(msg).await;
        metrics::third_party_call("smtp", res.is_ok());
        res.map_err(|e| wrap(&e))?;
        info!(to = %mail.to, "email_sent");
        Ok(())
    }
}

/// Logs instead of sending; used when SMTP is not configured.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, mail: OutgoingEmail) -> Result<(), ServiceError> {
        info!(to = %mail.to, subject = %mail.subject, "email_skipped: smtp not configured");
        Ok(())
    }
}

pub fn order_confirmation(order: &order::Model, to: &str, store_name: &str) -> OutgoingEmail {
    let html = format!(
        "<p>Thank you for shopping with {store}.</p>\
         <p>We have received your payment for order <strong>{number}</strong>.</p>\
         <p>Amount paid: {currency} {total}</p>\
         <p>Your invoice number is {invoice}. We will let you know when the parcel ships.</p>",
        store = escape(store_name),
        number = escape(&order.order_number),
        currency = escape(&order.currency_code),
        total = order.grand_total,
        invoice = escape(order.invoice_number.as_deref().unwrap_or("-")),
    );
    OutgoingEmail { to: to.to_string(), subject: format!("Order {} confirmed", order.order_number), html }
}
