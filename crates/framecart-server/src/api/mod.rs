mod checkout;
mod runtime_config;
mod webhook;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use framecart_core::AppConfig;

use crate::email::{EmailClient, SupportContact};
use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};
use crate::stripe::StripeClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub stripe: Arc<StripeClient>,
    pub email: Option<Arc<EmailClient>>,
}

impl AppState {
    pub(crate) fn support_contact(&self) -> SupportContact {
        SupportContact {
            whatsapp_number: self.config.support_whatsapp_number.clone(),
            contact_name: self.config.support_contact_name.clone(),
            hours: self.config.support_hours.clone(),
        }
    }
}

/// Error body in the wire format the storefront pages consume:
/// `{"error": {"message": "..."}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(json!({ "error": { "message": self.message } })),
        )
            .into_response()
    }
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/config", get(runtime_config::runtime_config))
        .route(
            "/api/v1/checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/api/v1/webhooks/stripe", post(webhook::stripe_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors(&state.config.allowed_origins))
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                )),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, std::time::Duration::from_secs(60))
}
