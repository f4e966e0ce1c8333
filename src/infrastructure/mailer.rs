use async_trait::async_trait;
use reqwest::Client;

use crate::report::{MailError, MailMessage, MailTransport};

/// Delivers report mails as JSON posts to the configured gateway endpoint.
#[derive(Clone)]
pub struct HttpMailGateway {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpMailGateway {
    pub fn new(http: Client, endpoint: String, token: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            token,
        }
    }
}

#[async_trait]
impl MailTransport for HttpMailGateway {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let mut request = self.http.post(&self.endpoint).json(message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(format!(
                "gateway returned status {}",
                response.status()
            )));
        }
        tracing::debug!(target: "mail", to = %message.to, "report mail handed to gateway");
        Ok(())
    }
}
