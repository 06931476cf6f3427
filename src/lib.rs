#![deny(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/*!
Rust client for resolving DNS queries over HTTPS.

# Introduction

DNS over HTTPS (DoH), as defined in [RFC 8484](https://tools.ietf.org/html/rfc8484),
carries DNS wire-format messages inside HTTP requests, either base64url-encoded
in the `dns` parameter of a `GET`:

```text
GET https://cloudflare-dns.com:443/dns-query?dns=AAABAAABAAAAAAAAB2V4YW1wbGUDY29tAAABAAE
Accept: application/dns-message
```

or as the body of a `POST` with the `application/dns-message` content type.

Public DoH resolvers come and go, rate limit, and time out. `doh-rs` sends each
query to an endpoint picked at random from a pool (by default, every provider
in the built-in [registry]) and retries failed attempts on freshly picked
endpoints until one answers, the retry budget runs out, or the query is
cancelled:

```no_run
# #[tokio::main]
# async fn main() -> Result<(), doh_rs::Error> {
use doh_rs::codec::{Query, RecordType};
use doh_rs::QueryOptions;
use std::time::Duration;

let query = Query::new().question("example.com", RecordType::AAAA);
let options = QueryOptions::new()
    .endpoints(["cloudflare", "quad9", "https://dns.example:8443/custom [post]"])
    .retries(3)
    .timeout(Duration::from_secs(5));
let outcome = doh_rs::query(&query, &options).await?;
println!("{} answered: {:?}", outcome.endpoint(), outcome.answers());
# Ok(())
# }
```

Endpoints may be given as registry keys (`"cloudflare"`), URL-like strings
(`[http[s]://]host[:port][/path][ [post|get]]`) or [`Endpoint`] values; see
[`normalize`]. Malformed endpoints are reported before any request is made.

# Failure handling

Every attempt has its own timeout. A failed attempt ([`Error::Timeout`],
[`Error::HttpStatus`], [`Error::Response`], [`Error::Transport`]) consumes
one unit of the retry budget; once the budget is exhausted the last failure
is returned. Cancelling the [`CancellationToken`] passed through
[`QueryOptions::signal`] interrupts the in-flight request and ends the query
with [`Error::Abort`], whatever budget remains.

# Codecs, Transports and Policies

The DNS wire format and the HTTP exchange are pluggable through the
[`DohCodec`] and [`Transport`] traits, and endpoint selection through the
[`Policy`] trait. The provided implementations are enabled by the following
features:

- `hickory` (via [`HickoryCodec`], producing `hickory_proto` messages)
- `reqwest` (via [`ReqwestTransport`], using rustls)

Log events are emitted through `tracing` when the `log` feature is enabled,
and endpoint specifications can be deserialized with the `serde` feature.

[`DohCodec`]: codec::DohCodec
[`Transport`]: transport::Transport
[`Policy`]: policy::Policy
[`HickoryCodec`]: codec::HickoryCodec
[`ReqwestTransport`]: transport::ReqwestTransport
[`CancellationToken`]: tokio_util::sync::CancellationToken
*/

mod client;
pub use client::{policy, DohClient, Outcome, QueryOptions, DEFAULT_RETRIES, DEFAULT_TIMEOUT};

pub mod codec;

pub mod endpoint;
pub use endpoint::{
    registry::{registry, Registry},
    spec::{normalize, EndpointSpec},
    Endpoint, EndpointInfo, Method,
};

mod error;
pub use error::{BoxError, ConfigError, Error};

pub mod transport;

pub use tokio_util::sync::CancellationToken;

#[cfg(feature = "hickory")]
pub use hickory_proto;

/// Resolves `query` with a process-wide client using [`ReqwestTransport`],
/// [`HickoryCodec`] and random endpoint selection.
///
/// See [`DohClient::query`].
///
/// The shared client keeps no idle connections, so it can be used from any
/// number of tokio runtimes, including ones created after an earlier runtime
/// was shut down. Applications issuing many queries from one runtime should
/// build their own [`DohClient`] to benefit from connection reuse.
///
/// [`ReqwestTransport`]: transport::ReqwestTransport
/// [`HickoryCodec`]: codec::HickoryCodec
#[cfg(all(feature = "hickory", feature = "reqwest"))]
pub async fn query(
    query: &codec::Query,
    options: &QueryOptions,
) -> Result<Outcome<hickory_proto::op::Message>, Error> {
    use once_cell::sync::Lazy;
    static CLIENT: Lazy<DohClient<transport::ReqwestTransport, codec::HickoryCodec>> =
        Lazy::new(|| {
            // Pooled connections are bound to the runtime that opened them.
            let http = reqwest::Client::builder()
                .pool_max_idle_per_host(0)
                .build()
                .unwrap_or_default();
            DohClient::new_with(
                transport::ReqwestTransport::with_client(http),
                codec::HickoryCodec,
            )
        });
    CLIENT.query(query, options).await
}
