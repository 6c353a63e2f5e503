//! Public runtime configuration for the storefront pages.
//!
//! Exposes only values that are public by design: the publishable Stripe
//! key and the Storefront API token (scoped to public storefront reads).
//! Secret keys never leave the server.

use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct RuntimeConfig {
    api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stripe_publishable_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopify_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shopify_storefront_token: Option<String>,
    shopify_api_version: String,
}

pub(super) async fn runtime_config(State(state): State<AppState>) -> Json<RuntimeConfig> {
    Json(RuntimeConfig {
        api_base_url: state.config.site_base_url.clone(),
        stripe_publishable_key: state.config.stripe_publishable_key.clone(),
        shopify_domain: state.config.shopify_store_domain.clone(),
        shopify_storefront_token: state.config.shopify_storefront_token.clone(),
        shopify_api_version: state.config.shopify_api_version.clone(),
    })
}
