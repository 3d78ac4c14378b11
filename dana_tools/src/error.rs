use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DanaApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid private key: {0}")]
    KeyFormat(String),
    #[error("Could not sign request: {0}")]
    Signing(String),
    #[error("Could not serialize request body: {0}")]
    Serialization(String),
    #[error("DANA API error (HTTP {status}): {body}")]
    Provider { status: u16, body: String },
    #[error("Request to DANA failed: {0}")]
    Network(String),
    #[error("Request to DANA timed out: {0}")]
    Timeout(String),
    #[error("Could not deserialize DANA response: {0}")]
    JsonError(String),
}

impl DanaApiError {
    /// A stable discriminator for the error, suitable for machine consumption.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "INITIALIZATION_ERROR",
            Self::KeyFormat(_) => "KEY_FORMAT_ERROR",
            Self::Signing(_) => "SIGNING_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Network(_) | Self::Timeout(_) => "NETWORK_ERROR",
            Self::JsonError(_) => "PROVIDER_ERROR",
        }
    }
}

impl From<reqwest::Error> for DanaApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}
