use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::stripe::CheckoutSessionParams;

const DEFAULT_PRODUCT_NAME: &str = "Advanced Eye Care Plan";
const DEFAULT_PRODUCT_DESCRIPTION: &str = "Monthly subscription for comprehensive home eye care \
     services with 25% discounts, WhatsApp support, and priority booking.";
/// £15.00 in pence.
const DEFAULT_UNIT_AMOUNT: i64 = 1500;

#[derive(Debug, Default, Deserialize)]
pub(super) struct CheckoutSessionRequest {
    product_name: Option<String>,
    /// Whole-currency amount; the storefront sends it as a string.
    amount: Option<Value>,
    currency: Option<String>,
    interval: Option<String>,
    customer_email: Option<String>,
}

/// Converts the requested whole-currency amount into minor units, falling
/// back to the plan default when absent or unparsable.
fn amount_in_pence(amount: Option<&Value>) -> i64 {
    let parsed = match amount {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.map_or(DEFAULT_UNIT_AMOUNT, |pounds| pounds * 100)
}

pub(super) async fn create_checkout_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutSessionRequest>,
) -> Result<Json<Value>, ApiError> {
    let params = CheckoutSessionParams {
        product_name: request
            .product_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
        product_description: DEFAULT_PRODUCT_DESCRIPTION.to_string(),
        unit_amount: amount_in_pence(request.amount.as_ref()),
        currency: request
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "gbp".to_string()),
        interval: request
            .interval
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| "month".to_string()),
        customer_email: request.customer_email,
        success_url: format!(
            "{}/success.html?session_id={{CHECKOUT_SESSION_ID}}",
            state.config.site_base_url
        ),
        cancel_url: format!("{}/cancel.html", state.config.site_base_url),
        metadata: vec![
            ("plan_type".to_string(), "advanced_eye_care".to_string()),
            ("commitment_months".to_string(), "12".to_string()),
        ],
    };

    let session = state
        .stripe
        .create_subscription_checkout_session(&params)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to create checkout session");
            ApiError::bad_request(stripe_error_message(&e))
        })?;

    let Some(url) = session.url else {
        tracing::error!(session_id = %session.id, "checkout session missing redirect URL");
        return Err(ApiError::bad_request("checkout session has no URL"));
    };

    Ok(Json(json!({ "checkout_url": url })))
}

/// Surfaces Stripe's own message where available, a generic one otherwise.
fn stripe_error_message(error: &crate::stripe::StripeError) -> String {
    match error {
        crate::stripe::StripeError::Api { message, .. } => message.clone(),
        _ => "There was an error processing your request. Please try again.".to_string(),
    }
}
