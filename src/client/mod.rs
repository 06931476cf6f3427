//! Clients performing DoH queries with endpoint failover.

use std::{ops::Deref, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::{
    codec::{DohCodec, Query},
    endpoint::{
        spec::{normalize, EndpointSpec},
        Endpoint,
    },
    error::{ConfigError, Error},
    transport::Transport,
};

mod attempt;

/// Endpoint selection policies.
pub mod policy;

/// Number of additional attempts made after a failure, unless configured.
pub const DEFAULT_RETRIES: u32 = 5;

/// Time budget of a single attempt, unless configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for a single [`DohClient::query`] call.
///
/// ```
/// use doh_rs::QueryOptions;
/// use std::time::Duration;
/// let options = QueryOptions::new()
///     .endpoint("cloudflare")
///     .endpoint("https://dns.example/dns-query [post]")
///     .retries(2)
///     .timeout(Duration::from_secs(5));
/// assert_eq!(options.get_retries(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct QueryOptions {
    endpoints: Vec<EndpointSpec>,
    retries: u32,
    timeout: Duration,
    signal: Option<CancellationToken>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            retries: DEFAULT_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            signal: None,
        }
    }
}

impl QueryOptions {
    /// Options with the defaults: every registered endpoint,
    /// [`DEFAULT_RETRIES`] retries and [`DEFAULT_TIMEOUT`] per attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a candidate endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<EndpointSpec>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }

    /// Adds several candidate endpoints.
    pub fn endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EndpointSpec>,
    {
        self.endpoints.extend(endpoints.into_iter().map(Into::into));
        self
    }

    /// Sets how many more attempts are made after the first failure.
    pub fn retries(self, retries: u32) -> Self {
        Self { retries, ..self }
    }

    /// Sets the time budget of each attempt.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Sets the signal that cancels the query.
    pub fn signal(self, signal: CancellationToken) -> Self {
        Self {
            signal: Some(signal),
            ..self
        }
    }

    /// Configured retry budget.
    pub fn get_retries(&self) -> u32 {
        self.retries
    }

    /// Configured per-attempt timeout.
    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidOptions("timeout must be positive"));
        }
        Ok(())
    }
}

/// A decoded response together with the endpoint that produced it.
#[derive(Debug, Clone)]
pub struct Outcome<R> {
    response: R,
    endpoint: Endpoint,
}

impl<R> Outcome<R> {
    /// Decoded response.
    pub fn response(&self) -> &R {
        &self.response
    }

    /// Endpoint that served the response.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Splits the outcome into the response and the serving endpoint.
    pub fn into_parts(self) -> (R, Endpoint) {
        (self.response, self.endpoint)
    }
}

impl<R> Deref for Outcome<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.response
    }
}

/// Client for performing DNS queries over HTTPS against a pool of endpoints.
///
/// Each query is retried on a freshly selected endpoint until it succeeds,
/// is cancelled, or exhausts its retry budget.
#[derive(Debug, Default)]
pub struct DohClient<Transport, Codec, Policy: policy::Policy = policy::Random> {
    transport: Transport,
    codec: Codec,
    policy: Policy,
}

impl<T: Transport + Default, C: DohCodec + Default, P: policy::Policy + Default>
    DohClient<T, C, P>
{
    /// Creates a client from default collaborators.
    pub fn new() -> Self {
        Self::new_with(T::default(), C::default())
    }
}

impl<T: Transport, C: DohCodec, P: policy::Policy + Default> DohClient<T, C, P> {
    /// Creates a client using `transport` and `codec`.
    pub fn new_with(transport: T, codec: C) -> Self {
        Self {
            transport,
            codec,
            policy: Default::default(),
        }
    }
}

impl<T: Transport, C: DohCodec, P: policy::Policy> DohClient<T, C, P> {
    /// Resolves `query`, trying endpoints from `options` (or the whole
    /// registry) until one answers.
    ///
    /// Configuration errors are returned before any request is made. A
    /// failed attempt is retried on a newly selected endpoint while retry
    /// budget remains, except after cancellation; the last failure is
    /// returned otherwise.
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), doh_rs::Error> {
    /// use doh_rs::codec::{HickoryCodec, Query, RecordType};
    /// use doh_rs::{transport::ReqwestTransport, DohClient, QueryOptions};
    ///
    /// let client: DohClient<ReqwestTransport, HickoryCodec> = DohClient::new();
    /// let query = Query::new().question("example.com", RecordType::A);
    /// let outcome = client
    ///     .query(&query, &QueryOptions::new().endpoint("cloudflare"))
    ///     .await?;
    /// println!("{} answered with {} records", outcome.endpoint(), outcome.answers().len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn query(
        &self,
        query: &Query,
        options: &QueryOptions,
    ) -> Result<Outcome<C::Response>, Error> {
        options.validate()?;
        let endpoints = normalize(options.endpoints.iter().cloned())?;

        let mut remaining = options.retries;
        let mut attempt_number: u32 = 1;
        loop {
            let endpoint = &endpoints[self.select(&endpoints, attempt_number)];
            #[cfg(feature = "log")]
            tracing::debug!(
                endpoint = %endpoint,
                attempt = attempt_number,
                retries_left = remaining,
                "starting DoH attempt"
            );

            let result = attempt::attempt(
                &self.transport,
                &self.codec,
                endpoint,
                query,
                options.timeout,
                options.signal.as_ref(),
            )
            .await;

            match result {
                Ok(response) => {
                    #[cfg(feature = "log")]
                    tracing::info!(endpoint = %endpoint, attempt = attempt_number, "DoH attempt succeeded");
                    return Ok(Outcome {
                        response,
                        endpoint: endpoint.clone(),
                    });
                }
                Err(err) => {
                    #[cfg(feature = "log")]
                    tracing::info!(endpoint = %endpoint, attempt = attempt_number, error = %err, "DoH attempt failed");
                    if err.is_abort() || remaining == 0 {
                        return Err(err);
                    }
                    remaining -= 1;
                    attempt_number = attempt_number.saturating_add(1);
                }
            }
        }
    }

    fn select(&self, endpoints: &[Endpoint], attempt_number: u32) -> usize {
        match endpoints.len() {
            1 => 0,
            n => self.policy.select(endpoints, attempt_number).min(n - 1),
        }
    }

    /// Sets the transport of the client.
    pub fn transport<U: Transport>(self, transport: U) -> DohClient<U, C, P> {
        DohClient {
            transport,
            codec: self.codec,
            policy: self.policy,
        }
    }

    /// Sets the codec of the client.
    pub fn codec<D: DohCodec>(self, codec: D) -> DohClient<T, D, P> {
        DohClient {
            codec,
            transport: self.transport,
            policy: self.policy,
        }
    }

    /// Sets the endpoint selection policy of the client.
    pub fn policy<Q: policy::Policy>(self, policy: Q) -> DohClient<T, C, Q> {
        DohClient {
            policy,
            transport: self.transport,
            codec: self.codec,
        }
    }
}
