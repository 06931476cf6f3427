//! Transport backed by [`reqwest`].

use async_trait::async_trait;
use http::{header, StatusCode};

use super::{DohRequest, Transport, TransportError, DNS_MESSAGE};
use crate::endpoint::Method;

/// [`Transport`] using a [`reqwest::Client`] with rustls.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport from a preconfigured client (proxies, custom
    /// roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Other(Box::new(err))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &DohRequest) -> Result<Vec<u8>, TransportError> {
        let uri = request.uri();
        #[cfg(feature = "log")]
        tracing::debug!(URI = %uri, method = %request.method(), "sending DoH request");

        let builder = match request.method() {
            Method::Get => self.client.get(uri.as_str()),
            Method::Post => self
                .client
                .post(uri.as_str())
                .header(header::CONTENT_TYPE, DNS_MESSAGE)
                .body(request.body().to_vec()),
        };
        let response = builder
            .header(header::ACCEPT, DNS_MESSAGE)
            .timeout(request.timeout())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::Status(status));
        }
        let body = response.bytes().await.map_err(classify)?;
        Ok(body.to_vec())
    }
}
