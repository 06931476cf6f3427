//! Errors produced while dispatching DoH queries.

use http::StatusCode;
use std::time::Duration;

use crate::endpoint::Method;

/// Boxed error type used for collaborator failures (codec, transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors encountered while performing a DoH query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query was cancelled through its cancellation signal.
    #[error("request aborted")]
    Abort,
    /// A single attempt did not receive a response within its timeout.
    #[error("request timed out (timeout={}ms)", .0.as_millis())]
    Timeout(Duration),
    /// The endpoint answered with a non-success HTTP status.
    #[error("status={status} while requesting {uri} [{method}]")]
    HttpStatus {
        /// URI that was requested.
        uri: String,
        /// Status returned by the endpoint.
        status: StatusCode,
        /// HTTP method used for the request.
        method: Method,
    },
    /// The endpoint's response body was empty or could not be decoded.
    #[error("{message}")]
    Response {
        /// Description of what was wrong with the response.
        message: String,
        /// Underlying decode error, if any.
        #[source]
        cause: Option<BoxError>,
    },
    /// Transport-level failure that is neither a timeout nor an HTTP status.
    #[error("transport: {0}")]
    Transport(#[source] BoxError),
    /// The query could not be encoded into a DNS message.
    #[error("encoding query: {0}")]
    Encode(#[source] BoxError),
    /// Invalid endpoints or options, detected before any attempt is made.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Creates a [`Error::Response`] without an underlying cause.
    pub fn response(message: impl Into<String>) -> Self {
        Self::Response {
            message: message.into(),
            cause: None,
        }
    }

    /// Stable error code for the classified failure kinds.
    ///
    /// ```
    /// # use doh_rs::Error;
    /// assert_eq!(Error::Abort.code(), Some("ABORT"));
    /// assert_eq!(Error::response("Empty.").code(), Some("RESPONSE_ERR"));
    /// ```
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Abort => Some("ABORT"),
            Self::Timeout(_) => Some("ETIMEOUT"),
            Self::HttpStatus { .. } => Some("HTTP_STATUS"),
            Self::Response { .. } => Some("RESPONSE_ERR"),
            Self::Transport(_) | Self::Encode(_) | Self::Config(_) => None,
        }
    }

    /// Whether the error was caused by cancellation.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort)
    }

    /// Whether another attempt against a (possibly different) endpoint may
    /// succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Abort | Self::Config(_))
    }
}

/// Configuration errors: malformed endpoints or invalid query options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An endpoint string or structure could not be turned into an endpoint.
    #[error("invalid endpoint {input:?}: {reason}")]
    InvalidEndpoint {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A registry key that does not exist was requested explicitly.
    #[error("no registered endpoint named {0:?}")]
    UnknownEndpoint(String),
    /// Query options that cannot be honored.
    #[error("invalid query options: {0}")]
    InvalidOptions(&'static str),
}

impl ConfigError {
    pub(crate) fn invalid_endpoint(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidEndpoint {
            input: input.into(),
            reason,
        }
    }
}
