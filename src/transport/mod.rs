//! HTTP transports carrying DNS messages (RFC 8484).

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use http::StatusCode;
use std::time::Duration;

use crate::{
    endpoint::{Endpoint, Method},
    error::BoxError,
};

#[cfg(feature = "reqwest")]
mod reqwest_client;
#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestTransport;

/// Media type of DNS wire-format messages.
pub const DNS_MESSAGE: &str = "application/dns-message";

/// A single DoH exchange to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DohRequest {
    scheme: &'static str,
    host: String,
    port: u16,
    path: String,
    method: Method,
    body: Vec<u8>,
    timeout: Duration,
}

impl DohRequest {
    /// Creates a request carrying `body` to `endpoint`.
    pub fn new(endpoint: &Endpoint, body: Vec<u8>, timeout: Duration) -> Self {
        Self {
            scheme: endpoint.scheme(),
            host: endpoint.host().to_owned(),
            port: endpoint.port(),
            path: endpoint.path().to_owned(),
            method: endpoint.method(),
            body,
            timeout,
        }
    }

    /// Full request URI. `GET` requests carry the message base64url-encoded
    /// in the `dns` parameter.
    ///
    /// ```
    /// use doh_rs::{transport::DohRequest, Endpoint};
    /// use std::time::Duration;
    /// let endpoint: Endpoint = "dns.example".parse().unwrap();
    /// let request = DohRequest::new(&endpoint, vec![0xff, 0xfe], Duration::from_secs(1));
    /// assert_eq!(request.uri(), "https://dns.example:443/dns-query?dns=__4");
    /// ```
    pub fn uri(&self) -> String {
        let base = format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path);
        match self.method {
            Method::Get => {
                let separator = if self.path.contains('?') { '&' } else { '?' };
                format!("{}{}dns={}", base, separator, URL_SAFE_NO_PAD.encode(&self.body))
            }
            Method::Post => base,
        }
    }

    /// Host the request is sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port the request is sent to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request path, without the `dns` parameter.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// HTTP method to use.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Encoded DNS message. Sent as the body of `POST` requests.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Time budget for this exchange.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Failures reported by a [`Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a status other than `200 OK`.
    #[error("unexpected status {0}")]
    Status(StatusCode),
    /// The transport gave up waiting for a response.
    #[error("timed out")]
    Timeout,
    /// Any other failure (connection, TLS, reading the body, ...).
    #[error(transparent)]
    Other(BoxError),
}

/// Represents the ability to exchange DoH requests with a server.
///
/// Implementations are not required to enforce [`DohRequest::timeout`] or to
/// watch for cancellation: the client races every exchange against both and
/// drops the returned future when either fires.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the exchange, returning the response body of a `200 OK`.
    async fn send(&self, request: &DohRequest) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, request: &DohRequest) -> Result<Vec<u8>, TransportError> {
        (**self).send(request).await
    }
}
