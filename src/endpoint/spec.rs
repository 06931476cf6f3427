//! Endpoint specifications and their normalization into [`Endpoint`]s.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{registry::registry, Endpoint, Method};
use crate::error::ConfigError;

/// `[http[s]://]host[:port][/path][ [post|get]]`
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://)?([^/:\s]+)(?::(\d+))?(/.*?)?(?:\s+\[(post|get)\])?$")
        .expect("endpoint pattern is valid")
});

/// A user-supplied description of an endpoint.
///
/// Strings convert into [`EndpointSpec::Registry`] when they exactly match a
/// registry key and into [`EndpointSpec::Url`] otherwise.
///
/// ```
/// use doh_rs::EndpointSpec;
/// assert!(matches!(EndpointSpec::from("google"), EndpointSpec::Registry(_)));
/// assert!(matches!(EndpointSpec::from("dns.example"), EndpointSpec::Url(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSpec {
    /// Key of an endpoint in the [registry](super::registry::registry).
    Registry(String),
    /// URL-like string, see [`Endpoint`]'s `FromStr` implementation.
    Url(String),
    /// A fully specified endpoint.
    Endpoint(Endpoint),
}

impl EndpointSpec {
    /// Resolves the specification into an endpoint.
    pub fn resolve(&self) -> Result<Endpoint, ConfigError> {
        match self {
            EndpointSpec::Registry(key) => registry()
                .get(key)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownEndpoint(key.clone())),
            EndpointSpec::Url(url) => parse_url(url),
            EndpointSpec::Endpoint(endpoint) => {
                endpoint.validate()?;
                Ok(endpoint.clone())
            }
        }
    }
}

impl From<&str> for EndpointSpec {
    fn from(spec: &str) -> Self {
        Self::from(spec.to_owned())
    }
}

impl From<String> for EndpointSpec {
    fn from(spec: String) -> Self {
        if registry().contains(&spec) {
            EndpointSpec::Registry(spec)
        } else {
            EndpointSpec::Url(spec)
        }
    }
}

impl From<Endpoint> for EndpointSpec {
    fn from(endpoint: Endpoint) -> Self {
        EndpointSpec::Endpoint(endpoint)
    }
}

impl From<&Endpoint> for EndpointSpec {
    fn from(endpoint: &Endpoint) -> Self {
        EndpointSpec::Endpoint(endpoint.clone())
    }
}

/// Resolves endpoint specifications into the pool of candidate endpoints.
///
/// An empty input yields every endpoint in the registry, so the result is
/// never empty. Malformed specifications are reported immediately.
///
/// ```
/// # fn main() -> Result<(), doh_rs::ConfigError> {
/// use doh_rs::{normalize, registry, Method};
///
/// let pool = normalize(["cloudflare", "https://dns.example:8443/custom [post]"])?;
/// assert_eq!(&pool[0], registry().get("cloudflare").unwrap());
/// assert_eq!(pool[1].port(), 8443);
/// assert_eq!(pool[1].method(), Method::Post);
///
/// let everything = normalize(Vec::<&str>::new())?;
/// assert_eq!(everything.len(), registry().len());
/// # Ok(())
/// # }
/// ```
pub fn normalize<I, S>(specs: I) -> Result<Vec<Endpoint>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<EndpointSpec>,
{
    let endpoints = specs
        .into_iter()
        .map(|spec| spec.into().resolve())
        .collect::<Result<Vec<_>, _>>()?;
    if endpoints.is_empty() {
        Ok(registry().values())
    } else {
        Ok(endpoints)
    }
}

/// Parses the URL-like endpoint form.
pub(crate) fn parse_url(input: &str) -> Result<Endpoint, ConfigError> {
    let captures = URL_PATTERN.captures(input.trim()).ok_or_else(|| {
        ConfigError::invalid_endpoint(input, "expected [http[s]://]host[:port][/path][ [post|get]]")
    })?;

    // Only an explicit plain-http scheme disables TLS
    let https = !captures
        .get(1)
        .is_some_and(|scheme| scheme.as_str().eq_ignore_ascii_case("http://"));
    let mut endpoint = Endpoint::new(&captures[2])?.with_https(https);
    if let Some(port) = captures.get(3) {
        let port = port
            .as_str()
            .parse::<u16>()
            .map_err(|_| ConfigError::invalid_endpoint(input, "port is out of range"))?;
        if port == 0 {
            return Err(ConfigError::invalid_endpoint(input, "port must be positive"));
        }
        endpoint = endpoint.with_port(port);
    }
    if let Some(path) = captures.get(4) {
        endpoint = endpoint.with_path(path.as_str());
    }
    if let Some(method) = captures.get(5) {
        endpoint = endpoint.with_method(method.as_str().parse::<Method>()?);
    }
    Ok(endpoint)
}

#[cfg(feature = "serde")]
mod de {
    use serde::{de::Error as _, Deserialize, Deserializer};

    use super::EndpointSpec;
    use crate::endpoint::{Endpoint, EndpointInfo, Method};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSpec {
        Text(String),
        Object(RawEndpoint),
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct RawEndpoint {
        host: String,
        path: Option<String>,
        port: Option<u16>,
        https: Option<bool>,
        method: Option<String>,
        #[serde(default)]
        cors: bool,
        #[serde(default)]
        log: bool,
        #[serde(default)]
        filter: bool,
        location: Option<String>,
        docs: Option<String>,
    }

    impl RawEndpoint {
        fn into_endpoint(self) -> Result<Endpoint, crate::ConfigError> {
            let mut endpoint = Endpoint::new(self.host)?
                .with_https(self.https.unwrap_or(true))
                .with_info(EndpointInfo {
                    cors: self.cors,
                    log: self.log,
                    filter: self.filter,
                    location: self.location,
                    docs: self.docs,
                });
            if let Some(path) = self.path {
                endpoint = endpoint.with_path(path);
            }
            if let Some(port) = self.port {
                endpoint = endpoint.with_port(port);
            }
            if let Some(method) = self.method {
                endpoint = endpoint.with_method(method.parse::<Method>()?);
            }
            endpoint.validate()?;
            Ok(endpoint)
        }
    }

    impl<'de> Deserialize<'de> for EndpointSpec {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            match RawSpec::deserialize(deserializer)? {
                RawSpec::Text(text) => Ok(text.into()),
                RawSpec::Object(raw) => raw
                    .into_endpoint()
                    .map(EndpointSpec::Endpoint)
                    .map_err(D::Error::custom),
            }
        }
    }
}
