use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("GraphQL errors for {context}: {messages:?}")]
    Graphql {
        context: String,
        messages: Vec<String>,
    },

    #[error("user errors for {context}: {messages:?}")]
    UserErrors {
        context: String,
        messages: Vec<String>,
    },

    #[error("cart not found")]
    CartNotFound,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store domain \"{domain}\": {reason}")]
    InvalidDomain { domain: String, reason: String },
}
