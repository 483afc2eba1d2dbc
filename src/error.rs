use thiserror::Error;

/// Errors surfaced to the workflow host. All of them are terminal for the
/// current invocation; nothing is retried inside the connector.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Bad or missing user input, detected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The primary operation call failed (non-2xx status or transport error).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// A selector could not be populated. Partial pages are discarded.
    #[error("Failed to load {what}: {message}")]
    Resolver { what: String, message: String },

    /// A dependent selector was queried before its prerequisite field was set.
    #[error("Choose {0} first")]
    MissingDependency(&'static str),
}

impl ConnectorError {
    pub fn validation(message: impl Into<String>) -> Self {
        ConnectorError::Validation(message.into())
    }

    pub fn api(message: impl std::fmt::Display) -> Self {
        ConnectorError::ApiRequest(message.to_string())
    }

    /// Re-wraps an upstream failure as a resolver failure, keeping the
    /// upstream message text.
    pub fn resolver(what: impl Into<String>, source: ConnectorError) -> Self {
        let message = match source {
            ConnectorError::ApiRequest(m) => m,
            other => other.to_string(),
        };
        ConnectorError::Resolver {
            what: what.into(),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
