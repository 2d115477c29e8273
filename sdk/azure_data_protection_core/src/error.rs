use thiserror::Error;

/// Errors that can occur when configuring or calling the Azure Data Protection API.
#[derive(Error, Debug)]
pub enum DataProtectionError {
    /// A construction input was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No operation group is registered under the requested name.
    #[error("Unknown operation group: {0}")]
    UnknownOperationGroup(String),

    /// The supported API versions are inconsistent (e.g. no usable default).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The credential provider failed to supply a token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The request failed due to an HTTP error.
    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The service returned an ARM error response.
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The request payload or response body could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request failed at the transport level.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl DataProtectionError {
    /// Create an [`DataProtectionError::InvalidArgument`] from any message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an [`DataProtectionError::Http`] error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}

/// Result type alias for Data Protection operations.
pub type DataProtectionResult<T> = std::result::Result<T, DataProtectionError>;
