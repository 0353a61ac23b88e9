//! Error types for userboard operations.
//!
//! [`Error`] covers every failure the state layer can observe: transport
//! failures, non-success HTTP responses, response bodies that do not match the
//! expected shape, and invalid configuration. Stores record the `Display`
//! form of these errors verbatim in their `error` field.
//!
//! Editing, submitting or deleting an id that is not in canonical state is not
//! an error; those operations are silent no-ops.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the remote API or loading
/// configuration.
///
/// # Examples
///
/// ```
/// use userboard::Error;
///
/// let err = Error::Http {
///     status: 404,
///     message: "Request failed with status code 404".to_string(),
/// };
/// assert_eq!(err.to_string(), "Request failed with status code 404");
/// assert_eq!(err.category(), "http");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Connection-level failure (DNS, TCP connect, TLS, timeout).
    #[error("Network Error: {message}")]
    Network {
        /// Human-readable description of the failure.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message captured for display.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
    },

    /// Invalid configuration value or unreadable configuration source.
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },
}

impl Error {
    /// Creates a [`Error::Network`] from any displayable message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an [`Error::Http`] with the conventional status message.
    pub fn http_status(status: u16) -> Self {
        Self::Http {
            status,
            message: format!("Request failed with status code {status}"),
        }
    }

    /// Creates a [`Error::Config`] from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the error category as a static string, suitable for log
    /// fields and metrics labels.
    ///
    /// Categories: `"network"`, `"http"`, `"decode"`, `"config"`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::Decode { .. } => "decode",
            Self::Config { .. } => "config",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parse error: {err}"))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::config(format!("invalid URL: {err}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::http_status(status.as_u16())
        } else if err.is_timeout() {
            Self::network("request timed out")
        } else {
            Self::network(err.to_string())
        }
    }
}
