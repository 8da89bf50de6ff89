//! Error types for the gymdesk console

use std::{error::Error as StdError, fmt};

/// Main error type for gymdesk
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Client-side validation rejected a value before it was sent
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The request never produced a response (connect, timeout, body read)
    Http {
        /// Error message
        message: String,
    },

    /// The server answered with a non-success status
    Status {
        /// HTTP status code
        status: u16,
        /// Endpoint that was called
        endpoint: String,
    },

    /// The response body did not have the expected shape
    MalformedResponse {
        /// Endpoint that was called
        endpoint: String,
        /// What was wrong with the body
        message: String,
    },

    /// Not found error
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Authentication error
    Authentication(String),

    /// Session storage error, or no session where one is required
    Session {
        /// Error message
        message: String,
    },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    #[must_use]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error
    #[must_use]
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new transport error
    #[must_use]
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    /// Create a new malformed response error
    #[must_use]
    pub fn malformed<E: Into<String>, S: Into<String>>(endpoint: E, message: S) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a new session error
    #[must_use]
    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Whether the request failed on the network or the server side
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Status { .. })
    }

    /// Whether the server answered with a body of the wrong shape
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Http { message } => write!(f, "Request failed: {message}"),
            Self::Status { status, endpoint } => {
                write!(f, "API returned status {status} for {endpoint}")
            }
            Self::MalformedResponse { endpoint, message } => {
                write!(f, "Malformed response from {endpoint}: {message}")
            }
            Self::NotFound { resource } => write!(f, "Resource not found: {resource}"),
            Self::Authentication(msg) => write!(f, "Authentication failed: {msg}"),
            Self::Session { message } => write!(f, "Session error: {message}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first offending field; `__all__` carries schema-level checks
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, errs)) = fields.into_iter().next() else {
            return Self::validation("input", errors.to_string());
        };
        let message = errs
            .first()
            .map(|e| {
                e.message
                    .as_ref()
                    .map_or_else(|| e.code.to_string(), ToString::to_string)
            })
            .unwrap_or_default();

        Self::Validation {
            field: field.to_string(),
            message,
        }
    }
}
