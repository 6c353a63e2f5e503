//! Minimal Stripe REST client: checkout-session creation and customer
//! retrieval, which is all the subscription flow needs.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A created Checkout Session. Only the hosted-redirect URL is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// A Stripe customer as needed for the welcome email.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Parameters for a subscription checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    pub product_name: String,
    pub product_description: String,
    /// Unit amount in the currency's minor unit (pence).
    pub unit_amount: i64,
    pub currency: String,
    pub interval: String,
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

pub struct StripeClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    /// Creates a client against the live Stripe API.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Http`] if the underlying client cannot be
    /// built.
    pub fn new(secret_key: &str, timeout_secs: u64) -> Result<Self, StripeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    /// Points the client at a different base URL; tests use this to run
    /// against a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Creates a subscription-mode Checkout Session.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Api`] with Stripe's error message on any
    /// non-2xx response.
    pub async fn create_subscription_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "subscription".into()),
            ("line_items[0][quantity]".into(), "1".into()),
            (
                "line_items[0][price_data][currency]".into(),
                params.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                params.product_name.clone(),
            ),
            (
                "line_items[0][price_data][product_data][description]".into(),
                params.product_description.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                params.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][recurring][interval]".into(),
                params.interval.clone(),
            ),
            ("success_url".into(), params.success_url.clone()),
            ("cancel_url".into(), params.cancel_url.clone()),
            ("allow_promotion_codes".into(), "true".into()),
            ("billing_address_collection".into(), "required".into()),
        ];
        for (key, value) in &params.metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }
        if let Some(email) = params
            .customer_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            form.push(("customer_email".into(), email.to_string()));
        }

        let url = format!("{}/v1/checkout/sessions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        Self::parse_response(response, "checkout session").await
    }

    /// Retrieves a customer by id.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Api`] on any non-2xx response.
    pub async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, StripeError> {
        let url = format!("{}/v1/customers/{customer_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse_response(response, "customer").await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, StripeError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(ToOwned::to_owned)
                })
                .unwrap_or_else(|| format!("request failed with status {status}"));
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| StripeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
