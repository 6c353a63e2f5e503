//! Welcome-email composition and dispatch.
//!
//! Delivery itself is an external collaborator: the composed message is
//! POSTed as JSON to a configurable email-send API. When no API is
//! configured the send is skipped with a warning so a missing email
//! integration never breaks webhook handling.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

pub const WELCOME_SUBJECT: &str =
    "Welcome to Advanced Eye Care Plan - Your WhatsApp Details Inside!";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email API returned status {status}")]
    UnexpectedStatus { status: u16 },
}

/// WhatsApp support details included in the welcome email.
#[derive(Debug, Clone)]
pub struct SupportContact {
    pub whatsapp_number: String,
    pub contact_name: String,
    pub hours: String,
}

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from_name: &'a str,
    from_address: &'a str,
    to: &'a str,
    subject: &'a str,
    html: String,
}

pub struct EmailClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    from_name: String,
    from_address: String,
}

impl EmailClient {
    /// # Errors
    ///
    /// Returns [`EmailError::Http`] if the underlying client cannot be
    /// built.
    pub fn new(
        api_url: &str,
        api_key: Option<&str>,
        from_name: &str,
        from_address: &str,
        timeout_secs: u64,
    ) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.map(ToOwned::to_owned),
            from_name: from_name.to_string(),
            from_address: from_address.to_string(),
        })
    }

    /// Sends the subscription welcome email.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` when the email API rejects the request.
    pub async fn send_welcome_email(
        &self,
        to: &str,
        customer_name: &str,
        support: &SupportContact,
    ) -> Result<(), EmailError> {
        let message = OutgoingEmail {
            from_name: &self.from_name,
            from_address: &self.from_address,
            to,
            subject: WELCOME_SUBJECT,
            html: welcome_email_html(customer_name, support),
        };

        let mut request = self.client.post(&self.api_url).json(&message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EmailError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        tracing::info!(to, "welcome email dispatched");
        Ok(())
    }
}

/// Renders the welcome email body with the WhatsApp support box.
#[must_use]
pub fn welcome_email_html(customer_name: &str, support: &SupportContact) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<body style=\"font-family: Arial, sans-serif; \
         line-height: 1.6; color: #333;\">\n  <h1>Welcome to the Advanced Eye Care Plan!</h1>\n  \
         <p>Hi {customer_name},</p>\n  <p>Your subscription is active. You now have 25% \
         discounts, priority booking and direct WhatsApp support.</p>\n  <div style=\"background: \
         #E8F5E8; border: 2px solid #4CAF50; border-radius: 8px; padding: 20px;\">\n    \
         <h2>Your WhatsApp Support Line</h2>\n    <p><strong>{number}</strong></p>\n    \
         <p>{contact}</p>\n    <p>Available {hours}</p>\n  </div>\n  <p>We look forward to \
         looking after your eyes.</p>\n</body>\n</html>\n",
        number = support.whatsapp_number,
        contact = support.contact_name,
        hours = support.hours,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn support() -> SupportContact {
        SupportContact {
            whatsapp_number: "+44 7737886713".to_string(),
            contact_name: "Advanced Eye Care Support".to_string(),
            hours: "8am-8pm, 7 days a week".to_string(),
        }
    }

    #[test]
    fn welcome_html_includes_name_and_whatsapp_details() {
        let html = welcome_email_html("Sam", &support());
        assert!(html.contains("Hi Sam,"));
        assert!(html.contains("+44 7737886713"));
        assert!(html.contains("8am-8pm, 7 days a week"));
    }

    #[test]
    fn subject_matches_the_campaign_copy() {
        assert!(WELCOME_SUBJECT.contains("Advanced Eye Care Plan"));
    }
}
