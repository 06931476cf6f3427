//! A single request/response cycle against one endpoint.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    codec::{DohCodec, Query},
    endpoint::Endpoint,
    error::Error,
    transport::{DohRequest, Transport, TransportError},
};

/// Runs one attempt: encode `query`, exchange it with `endpoint` within
/// `timeout`, and decode the answer.
///
/// Cancellation is checked before anything else and raced against the
/// in-flight exchange; either way it yields [`Error::Abort`].
pub(crate) async fn attempt<T, C>(
    transport: &T,
    codec: &C,
    endpoint: &Endpoint,
    query: &Query,
    timeout: Duration,
    signal: Option<&CancellationToken>,
) -> Result<C::Response, Error>
where
    T: Transport + ?Sized,
    C: DohCodec + ?Sized,
{
    if signal.is_some_and(CancellationToken::is_cancelled) {
        return Err(Error::Abort);
    }

    let body = codec
        .encode(&query.with_defaults())
        .map_err(|err| Error::Encode(Box::new(err)))?;
    let request = DohRequest::new(endpoint, body, timeout);

    let exchange = tokio::time::timeout(timeout, transport.send(&request));
    let outcome = match signal {
        Some(signal) => tokio::select! {
            biased;
            _ = signal.cancelled() => return Err(Error::Abort),
            outcome = exchange => outcome,
        },
        None => exchange.await,
    };

    let data = match outcome {
        Err(_elapsed) => return Err(Error::Timeout(timeout)),
        Ok(Err(TransportError::Timeout)) => return Err(Error::Timeout(timeout)),
        Ok(Err(TransportError::Status(status))) => {
            return Err(Error::HttpStatus {
                uri: request.uri(),
                status,
                method: request.method(),
            })
        }
        Ok(Err(TransportError::Other(err))) => return Err(Error::Transport(err)),
        Ok(Ok(data)) => data,
    };

    if data.is_empty() {
        return Err(Error::response("Empty."));
    }
    codec.decode(&data).map_err(|err| Error::Response {
        message: format!("Invalid packet (cause={})", err),
        cause: Some(Box::new(err)),
    })
}
