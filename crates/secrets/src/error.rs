use thiserror::Error;

pub type Result<T> = std::result::Result<T, SecretsError>;

#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No access token available: {0}")]
    NoToken(String),

    /// The secret exists but its payload is not the structured data we
    /// expect. Callers treat this the same as an absent secret.
    #[error("Malformed secret payload: {0}")]
    MalformedPayload(String),
}
