//! HTTP client for the Storefront GraphQL cart API.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::StorefrontError;
use crate::queries;
use crate::types::{Cart, CartLineInput, CartLineUpdateInput, CartMutationPayload};

/// Client for the Storefront cart API.
///
/// Handles non-2xx responses, top-level GraphQL errors and mutation
/// `userErrors` as typed errors. No automatic retries: the one permitted
/// recovery (stale cart id → create a new cart) is the caller's decision,
/// not a transport concern.
pub struct StorefrontClient {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl StorefrontClient {
    /// Creates a client for the given store.
    ///
    /// `store_domain` may be a bare domain (`example.myshopify.com`) or a
    /// full `http(s)://` base URL, which test servers use.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidDomain`] for an empty domain and
    /// [`StorefrontError::Http`] if the underlying client cannot be built.
    pub fn new(
        store_domain: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let trimmed = store_domain.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(StorefrontError::InvalidDomain {
                domain: store_domain.to_string(),
                reason: "domain must be non-empty".to_string(),
            });
        }
        let base = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        let endpoint = format!("{base}/api/{api_version}/graphql.json");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_string(),
        })
    }

    /// Creates a new cart with the given lines.
    ///
    /// # Errors
    ///
    /// See [`StorefrontError`]; `userErrors` in the mutation payload are
    /// surfaced as [`StorefrontError::UserErrors`].
    pub async fn create_cart(&self, lines: &[CartLineInput]) -> Result<Cart, StorefrontError> {
        let data = self
            .execute(
                &queries::cart_create_mutation(),
                json!({ "input": { "lines": lines } }),
                "cartCreate",
            )
            .await?;
        Self::mutation_cart(data, "cartCreate")
    }

    /// Adds lines to an existing cart.
    ///
    /// A stale or unknown cart id surfaces as either
    /// [`StorefrontError::UserErrors`] or [`StorefrontError::CartNotFound`];
    /// callers fall back to [`StorefrontClient::create_cart`] once.
    ///
    /// # Errors
    ///
    /// See [`StorefrontError`].
    pub async fn add_lines(
        &self,
        cart_id: &str,
        lines: &[CartLineInput],
    ) -> Result<Cart, StorefrontError> {
        let data = self
            .execute(
                &queries::cart_lines_add_mutation(),
                json!({ "cartId": cart_id, "lines": lines }),
                "cartLinesAdd",
            )
            .await?;
        Self::mutation_cart(data, "cartLinesAdd")
    }

    /// Updates line quantities on an existing cart.
    ///
    /// # Errors
    ///
    /// See [`StorefrontError`].
    pub async fn update_lines(
        &self,
        cart_id: &str,
        lines: &[CartLineUpdateInput],
    ) -> Result<Cart, StorefrontError> {
        let data = self
            .execute(
                &queries::cart_lines_update_mutation(),
                json!({ "cartId": cart_id, "lines": lines }),
                "cartLinesUpdate",
            )
            .await?;
        Self::mutation_cart(data, "cartLinesUpdate")
    }

    /// Removes the given line ids from a cart in a single call.
    ///
    /// # Errors
    ///
    /// See [`StorefrontError`].
    pub async fn remove_lines(
        &self,
        cart_id: &str,
        line_ids: &[String],
    ) -> Result<Cart, StorefrontError> {
        let data = self
            .execute(
                &queries::cart_lines_remove_mutation(),
                json!({ "cartId": cart_id, "lineIds": line_ids }),
                "cartLinesRemove",
            )
            .await?;
        Self::mutation_cart(data, "cartLinesRemove")
    }

    /// Fetches the current state of a cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::CartNotFound`] when the id resolves to
    /// null (expired or foreign cart), plus the usual transport errors.
    pub async fn fetch_cart(&self, cart_id: &str) -> Result<Cart, StorefrontError> {
        let data = self
            .execute(&queries::cart_query(), json!({ "id": cart_id }), "cart")
            .await?;
        let cart = data.get("cart").cloned().unwrap_or(Value::Null);
        if cart.is_null() {
            return Err(StorefrontError::CartNotFound);
        }
        serde_json::from_value(cart).map_err(|e| StorefrontError::Deserialize {
            context: "cart".to_string(),
            source: e,
        })
    }

    /// Executes one GraphQL document and returns the `data` object.
    async fn execute(
        &self,
        query: &str,
        variables: Value,
        context: &str,
    ) -> Result<Value, StorefrontError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("X-Shopify-Storefront-Access-Token", &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorefrontError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let envelope: Value =
            serde_json::from_str(&body).map_err(|e| StorefrontError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;

        if let Some(errors) = envelope.get("errors").and_then(Value::as_array) {
            let messages: Vec<String> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .map(ToOwned::to_owned)
                .collect();
            tracing::warn!(context, ?messages, "storefront GraphQL errors");
            return Err(StorefrontError::Graphql {
                context: context.to_string(),
                messages,
            });
        }

        Ok(envelope.get("data").cloned().unwrap_or(Value::Null))
    }

    /// Unwraps a `{ cart, userErrors }` mutation payload.
    fn mutation_cart(data: Value, context: &str) -> Result<Cart, StorefrontError> {
        let payload = data.get(context).cloned().unwrap_or(Value::Null);
        let payload: CartMutationPayload =
            serde_json::from_value(payload).map_err(|e| StorefrontError::Deserialize {
                context: context.to_string(),
                source: e,
            })?;

        if !payload.user_errors.is_empty() {
            let messages = payload
                .user_errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>();
            tracing::warn!(context, ?messages, "storefront mutation user errors");
            return Err(StorefrontError::UserErrors {
                context: context.to_string(),
                messages,
            });
        }

        payload.cart.ok_or(StorefrontError::CartNotFound)
    }
}
