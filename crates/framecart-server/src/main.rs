mod api;
mod email;
mod middleware;
mod stripe;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};
use crate::email::EmailClient;
use crate::stripe::StripeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(framecart_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let stripe = Arc::new(StripeClient::new(
        &config.stripe_secret_key,
        config.http_timeout_secs,
    )?);

    let email = match (&config.email_api_url, &config.email_from_address) {
        (Some(api_url), Some(from_address)) => Some(Arc::new(EmailClient::new(
            api_url,
            config.email_api_key.as_deref(),
            &config.email_from_name,
            from_address,
            config.http_timeout_secs,
        )?)),
        _ => {
            tracing::warn!("email API not configured; welcome emails will be skipped");
            None
        }
    };

    if config.stripe_webhook_secret.is_none() {
        tracing::warn!("STRIPE_WEBHOOK_SECRET not set; webhook events will not be verified");
    }

    let app = build_app(
        AppState {
            config: Arc::clone(&config),
            stripe,
            email,
        },
        default_rate_limit_state(),
    );

    tracing::info!(addr = %config.bind_addr, "starting framecart server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
