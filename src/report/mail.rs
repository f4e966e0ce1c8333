use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Template key carried by every consolidated status mail.
pub const STATUS_REPORT_TEMPLATE: &str = "queue_status_report";

/// A prepared report mail for one recipient. The langcode travels with the
/// message so a transport can defer formatting to the receiving side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub template: &'static str,
    pub to: String,
    pub langcode: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail gateway request failed: {0}")]
    Gateway(#[from] reqwest::Error),
    #[error("mail delivery rejected: {0}")]
    Rejected(String),
}

/// Narrow delivery seam; implementations own all transport details.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Used when no mail gateway is configured; accepts and drops every message.
pub struct DisabledMailGateway;

#[async_trait]
impl MailTransport for DisabledMailGateway {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::debug!(
            target: "mail",
            to = %message.to,
            "mail gateway not configured, dropping report mail"
        );
        Ok(())
    }
}
