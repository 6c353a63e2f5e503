use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Storefront(#[from] framecart_storefront::StorefrontError),

    #[error(transparent)]
    InvalidVariant(#[from] framecart_core::CoreError),

    #[error("no active cart")]
    NoActiveCart,

    #[error("unknown cart line {0}")]
    UnknownLine(String),

    #[error("failed to read cart state at {path}: {source}")]
    StateIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode cart state: {0}")]
    StateEncode(#[from] serde_json::Error),
}
