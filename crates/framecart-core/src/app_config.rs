use std::net::SocketAddr;
use std::path::PathBuf;

/// Deployment environment, controlling startup strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

/// Application configuration resolved from the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Public site base URL used for checkout success/cancel redirects.
    pub site_base_url: String,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    pub lens_catalog_path: PathBuf,
    pub http_timeout_secs: u64,

    pub stripe_secret_key: String,
    pub stripe_publishable_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,

    pub shopify_store_domain: Option<String>,
    pub shopify_storefront_token: Option<String>,
    pub shopify_api_version: String,

    pub email_api_url: Option<String>,
    pub email_api_key: Option<String>,
    pub email_from_name: String,
    pub email_from_address: Option<String>,

    pub support_whatsapp_number: String,
    pub support_contact_name: String,
    pub support_hours: String,
}
