//! DoH endpoints.

use std::{fmt, str::FromStr};

use crate::error::ConfigError;

pub mod registry;
pub mod spec;

/// Path used when an endpoint does not specify one.
pub const DEFAULT_PATH: &str = "/dns-query";

/// HTTP method used to carry a DNS query to an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Query encoded as base64url in the `dns` query parameter.
    #[default]
    Get,
    /// Query sent as an `application/dns-message` body.
    Post,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("get") {
            Ok(Method::Get)
        } else if s.eq_ignore_ascii_case("post") {
            Ok(Method::Post)
        } else {
            Err(ConfigError::invalid_endpoint(s, "method must be GET or POST"))
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
        }
    }
}

/// Descriptive metadata about a provider. Only used to curate the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointInfo {
    /// The endpoint sends CORS headers.
    pub cors: bool,
    /// The provider logs requests.
    pub log: bool,
    /// The provider filters or redirects responses (ad blocking, malware, ...).
    pub filter: bool,
    /// Known geographical location.
    pub location: Option<String>,
    /// Link to the provider's documentation.
    pub docs: Option<String>,
}

/// A DoH server target.
///
/// Endpoints are immutable once built; the `with_*` setters consume and
/// return the endpoint. Equality covers the request target (scheme, host,
/// port, path and method); [`EndpointInfo`] metadata is ignored.
///
/// ```
/// use doh_rs::{Endpoint, Method};
/// let endpoint = Endpoint::new("dns.example")
///     .unwrap()
///     .with_method(Method::Post)
///     .with_https(false);
/// assert_eq!(endpoint.port(), 80);
/// assert_eq!(endpoint.path(), "/dns-query");
/// assert_eq!(endpoint.to_string(), "http://dns.example/dns-query [post]");
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    host: String,
    path: String,
    /// Explicit port. When unset, the port follows `https`.
    port: Option<u16>,
    https: bool,
    method: Method,
    info: EndpointInfo,
}

impl Endpoint {
    /// Creates an HTTPS `GET` endpoint for `host` on the default port and path.
    ///
    /// The host must be non-empty and contain no `/`, `:` or whitespace.
    pub fn new(host: impl Into<String>) -> Result<Self, ConfigError> {
        let host = host.into();
        if let Err(reason) = check_host(&host) {
            return Err(ConfigError::invalid_endpoint(host, reason));
        }
        Ok(Self {
            host,
            path: String::from(DEFAULT_PATH),
            port: None,
            https: true,
            method: Method::Get,
            info: EndpointInfo::default(),
        })
    }

    /// Host name or IP address of the endpoint.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Request path, starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Port to connect to: the explicit port, or 443/80 depending on
    /// [`Endpoint::is_https`].
    pub fn port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None if self.https => 443,
            None => 80,
        }
    }

    /// Whether TLS is used. Plain HTTP is meant for debugging only.
    pub fn is_https(&self) -> bool {
        self.https
    }

    /// URI scheme matching [`Endpoint::is_https`].
    pub fn scheme(&self) -> &'static str {
        if self.https {
            "https"
        } else {
            "http"
        }
    }

    /// HTTP method used for queries.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Provider metadata.
    pub fn info(&self) -> &EndpointInfo {
        &self.info
    }

    /// Sets the request path. An empty path resets it to [`DEFAULT_PATH`];
    /// a missing leading `/` is added.
    pub fn with_path(self, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let path = if path.is_empty() {
            String::from(DEFAULT_PATH)
        } else if path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{}", path)
        };
        Self { path, ..self }
    }

    /// Sets an explicit port.
    pub fn with_port(self, port: u16) -> Self {
        Self {
            port: Some(port),
            ..self
        }
    }

    /// Chooses between HTTPS (`true`) and plain HTTP (`false`).
    pub fn with_https(self, https: bool) -> Self {
        Self { https, ..self }
    }

    /// Sets the HTTP method.
    pub fn with_method(self, method: Method) -> Self {
        Self { method, ..self }
    }

    /// Sets provider metadata.
    pub fn with_info(self, info: EndpointInfo) -> Self {
        Self { info, ..self }
    }

    /// Checks the invariants that the setters cannot enforce on their own.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Err(reason) = check_host(&self.host) {
            return Err(ConfigError::invalid_endpoint(self.host.clone(), reason));
        }
        if self.port == Some(0) {
            return Err(ConfigError::invalid_endpoint(
                self.to_string(),
                "port must be positive",
            ));
        }
        Ok(())
    }
}

fn check_host(host: &str) -> Result<(), &'static str> {
    if host.is_empty() {
        Err("host is empty")
    } else if host.contains(|c: char| c == '/' || c == ':' || c.is_whitespace()) {
        Err("host must not contain '/', ':' or whitespace")
    } else {
        Ok(())
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.path == other.path
            && self.port == other.port
            && self.https == other.https
            && self.method == other.method
    }
}

impl Eq for Endpoint {}

impl fmt::Display for Endpoint {
    /// Formats the endpoint in the string form accepted by [`FromStr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme(), self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        f.write_str(&self.path)?;
        if self.method == Method::Post {
            f.write_str(" [post]")?;
        }
        Ok(())
    }
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    /// Parses `[http[s]://]host[:port][/path][ [post|get]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        spec::parse_url(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let endpoint = Endpoint::new("dns.example").unwrap();
        assert_eq!(endpoint.host(), "dns.example");
        assert_eq!(endpoint.path(), DEFAULT_PATH);
        assert_eq!(endpoint.port(), 443);
        assert!(endpoint.is_https());
        assert_eq!(endpoint.method(), Method::Get);
    }

    #[test]
    fn port_follows_transport_security_until_set() {
        let endpoint = Endpoint::new("dns.example").unwrap().with_https(false);
        assert_eq!(endpoint.port(), 80);
        let endpoint = endpoint.with_port(8053).with_https(true);
        assert_eq!(endpoint.port(), 8053);
    }

    #[test]
    fn malformed_hosts_are_rejected() {
        for host in ["", "  ", "dns.example:8053", "dns.example/x", "dns example", "dns.example\t"] {
            assert!(
                matches!(Endpoint::new(host), Err(ConfigError::InvalidEndpoint { .. })),
                "{:?} should be rejected",
                host
            );
        }
        assert!(Endpoint::new("127.0.0.1").is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let endpoint = Endpoint::new("dns.example").unwrap().with_port(0);
        assert!(endpoint.validate().is_err());
    }

    #[test]
    fn path_normalization() {
        let endpoint = Endpoint::new("dns.example").unwrap();
        assert_eq!(endpoint.clone().with_path("resolve").path(), "/resolve");
        assert_eq!(endpoint.clone().with_path("").path(), DEFAULT_PATH);
        assert_eq!(endpoint.with_path("/q").path(), "/q");
    }

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("Post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert!("put".parse::<Method>().is_err());
        assert_eq!(http::Method::from(Method::Post), http::Method::POST);
    }

    #[test]
    fn display_parses_back() {
        let endpoint = Endpoint::new("dns.example")
            .unwrap()
            .with_path("/custom")
            .with_port(8443)
            .with_method(Method::Post);
        assert_eq!(endpoint.to_string(), "https://dns.example:8443/custom [post]");
        let reparsed: Endpoint = endpoint.to_string().parse().unwrap();
        assert_eq!(reparsed, endpoint);

        let plain = Endpoint::new("dns.example").unwrap().with_https(false);
        assert_eq!(plain.to_string(), "http://dns.example/dns-query");
        assert_eq!(plain.to_string().parse::<Endpoint>().unwrap(), plain);

        for (key, endpoint) in registry::registry().iter() {
            let reparsed: Endpoint = endpoint.to_string().parse().unwrap();
            assert_eq!(&reparsed, endpoint, "{} does not parse back", key);
        }
    }

    #[test]
    fn equality_ignores_metadata() {
        let endpoint = Endpoint::new("dns.example").unwrap();
        let described = endpoint.clone().with_info(EndpointInfo {
            cors: true,
            location: Some(String::from("Zurich, CH")),
            ..Default::default()
        });
        assert_eq!(endpoint, described);
        assert_ne!(endpoint, described.with_method(Method::Post));
    }
}
