use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let stripe_secret_key = require("STRIPE_SECRET_KEY")?;

    let env = parse_environment(&or_default("FRAMECART_ENV", "development"));
    let bind_addr = parse_addr("FRAMECART_BIND_ADDR", "0.0.0.0:4242")?;
    let log_level = or_default("FRAMECART_LOG_LEVEL", "info");
    let site_base_url = or_default("FRAMECART_DOMAIN", "http://localhost:4242");
    let allowed_origins = or_default(
        "FRAMECART_ALLOWED_ORIGINS",
        "http://localhost:3000,http://127.0.0.1:5500",
    )
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(ToOwned::to_owned)
    .collect();
    let lens_catalog_path =
        PathBuf::from(or_default("FRAMECART_LENSES_PATH", "./config/lenses.yaml"));
    let http_timeout_secs = parse_u64("FRAMECART_HTTP_TIMEOUT_SECS", "30")?;

    let stripe_publishable_key = lookup("STRIPE_PUBLISHABLE_KEY").ok();
    let stripe_webhook_secret = lookup("STRIPE_WEBHOOK_SECRET").ok();

    let shopify_store_domain = lookup("SHOPIFY_STORE_DOMAIN").ok();
    let shopify_storefront_token = lookup("SHOPIFY_STOREFRONT_ACCESS_TOKEN").ok();
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2025-01");

    let email_api_url = lookup("FRAMECART_EMAIL_API_URL").ok();
    let email_api_key = lookup("FRAMECART_EMAIL_API_KEY").ok();
    let email_from_name = or_default("FRAMECART_EMAIL_FROM_NAME", "I Care Services Providers Ltd");
    let email_from_address = lookup("FRAMECART_EMAIL_FROM").ok();

    let support_whatsapp_number = or_default("FRAMECART_SUPPORT_WHATSAPP", "+44 7737886713");
    let support_contact_name =
        or_default("FRAMECART_SUPPORT_CONTACT", "Advanced Eye Care Support");
    let support_hours = or_default("FRAMECART_SUPPORT_HOURS", "8am-8pm, 7 days a week");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        site_base_url,
        allowed_origins,
        lens_catalog_path,
        http_timeout_secs,
        stripe_secret_key,
        stripe_publishable_key,
        stripe_webhook_secret,
        shopify_store_domain,
        shopify_storefront_token,
        shopify_api_version,
        email_api_url,
        email_api_key,
        email_from_name,
        email_from_address,
        support_whatsapp_number,
        support_contact_name,
        support_hours,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
