//! Stripe webhook intake.
//!
//! The raw body is verified against the `Stripe-Signature` header
//! (HMAC-SHA256 over `"{t}.{payload}"`, constant-time comparison) when a
//! webhook secret is configured; without one events are parsed unverified.
//! Event handling never fails the webhook response: Stripe retries on
//! non-2xx, and a broken email integration must not replay subscriptions.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::AppState;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: Value,
}

/// Verifies a `Stripe-Signature` header against the raw payload.
///
/// The header carries a timestamp and one or more `v1` candidates; the
/// signed payload is `"{t}.{body}"`. Comparison is constant-time.
fn verify_signature(secret: &str, header: &str, payload: &[u8]) -> bool {
    let mut timestamp = None;
    let mut candidates = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }
    let Some(timestamp) = timestamp else {
        return false;
    };
    if candidates.is_empty() {
        return false;
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    candidates.into_iter().any(|candidate| {
        hex::decode(candidate)
            .map(|decoded| bool::from(decoded.ct_eq(expected.as_slice())))
            .unwrap_or(false)
    })
}

pub(super) async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.config.stripe_webhook_secret {
        let signature = headers
            .get("stripe-signature")
            .and_then(|value| value.to_str().ok());
        let verified = signature.is_some_and(|header| verify_signature(secret, header, &body));
        if !verified {
            tracing::warn!("webhook signature verification failed");
            return (
                StatusCode::BAD_REQUEST,
                "Webhook Error: signature verification failed",
            )
                .into_response();
        }
    }

    let event: StripeEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "webhook payload is not a valid event");
            return (StatusCode::BAD_REQUEST, format!("Webhook Error: {e}")).into_response();
        }
    };

    let object_id = event
        .data
        .object
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>");

    match event.event_type.as_str() {
        "customer.subscription.created" => {
            tracing::info!(subscription = object_id, "new subscription created");
            handle_new_subscription(&state, &event.data.object).await;
        }
        "customer.subscription.updated" => {
            tracing::info!(subscription = object_id, "subscription updated");
        }
        "customer.subscription.deleted" => {
            tracing::info!(subscription = object_id, "subscription canceled");
        }
        "invoice.payment_succeeded" => {
            tracing::info!(invoice = object_id, "payment succeeded");
        }
        "invoice.payment_failed" => {
            tracing::warn!(invoice = object_id, "payment failed");
        }
        other => {
            tracing::debug!(event_type = other, "unhandled webhook event type");
        }
    }

    Json(json!({ "received": true })).into_response()
}

/// Sends the welcome email for a freshly created subscription. Failures
/// are logged and swallowed.
async fn handle_new_subscription(state: &AppState, subscription: &Value) {
    let Some(customer_id) = subscription.get("customer").and_then(Value::as_str) else {
        tracing::warn!("subscription event carries no customer id");
        return;
    };

    let customer = match state.stripe.retrieve_customer(customer_id).await {
        Ok(customer) => customer,
        Err(e) => {
            tracing::error!(customer_id, error = %e, "failed to retrieve customer");
            return;
        }
    };

    let Some(email) = customer.email else {
        tracing::info!(customer = %customer.id, "no email address on customer record");
        return;
    };

    let Some(email_client) = &state.email else {
        tracing::warn!("email API not configured, skipping welcome email");
        return;
    };

    let customer_name = customer
        .name
        .clone()
        .or_else(|| email.split('@').next().map(ToOwned::to_owned))
        .unwrap_or_else(|| "Valued Customer".to_string());

    if let Err(e) = email_client
        .send_welcome_email(&email, &customer_name, &state.support_contact())
        .await
    {
        tracing::error!(to = email, error = %e, "failed to send welcome email");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: &str, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let payload = r#"{"type":"x"}"#;
        let header = format!("t=99,v1={}", sign("whsec_a", "99", payload));
        assert!(verify_signature("whsec_a", &header, payload.as_bytes()));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let payload = r#"{"type":"x"}"#;
        let header = format!("t=99,v1={}", sign("whsec_other", "99", payload));
        assert!(!verify_signature("whsec_a", &header, payload.as_bytes()));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let header = format!("t=99,v1={}", sign("whsec_a", "99", "original"));
        assert!(!verify_signature("whsec_a", &header, b"tampered"));
    }

    #[test]
    fn wrong_timestamp_fails_verification() {
        let payload = r#"{"type":"x"}"#;
        let header = format!("t=100,v1={}", sign("whsec_a", "99", payload));
        assert!(!verify_signature("whsec_a", &header, payload.as_bytes()));
    }

    #[test]
    fn any_matching_v1_candidate_verifies() {
        // Key-rollover headers carry two signatures; one match suffices.
        let payload = r#"{"type":"x"}"#;
        let header = format!(
            "t=99,v1={},v1={}",
            sign("whsec_old", "99", payload),
            sign("whsec_a", "99", payload)
        );
        assert!(verify_signature("whsec_a", &header, payload.as_bytes()));
    }

    #[test]
    fn malformed_header_fails_verification() {
        assert!(!verify_signature("whsec_a", "gibberish", b"payload"));
        assert!(!verify_signature("whsec_a", "v1=deadbeef", b"payload"));
        assert!(!verify_signature("whsec_a", "t=99", b"payload"));
        assert!(!verify_signature("whsec_a", "t=99,v1=not-hex", b"payload"));
    }
}
