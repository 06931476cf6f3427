//! DNS message codecs.

use std::fmt;

#[cfg(feature = "hickory")]
mod hickory;
#[cfg(feature = "hickory")]
pub use self::hickory::{HickoryCodec, HickoryCodecError};

/// Header flag asking the server to resolve recursively.
pub const RECURSION_DESIRED: u16 = 1 << 8;
/// Header flag marking data as authenticated.
pub const AUTHENTIC_DATA: u16 = 1 << 5;
/// Header flag disabling DNSSEC checking on the server.
pub const CHECKING_DISABLED: u16 = 1 << 4;

/// Whether a message is a query or a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PacketKind {
    /// A question sent to a server.
    #[default]
    Query,
    /// An answer sent by a server.
    Response,
}

/// A DNS record type (`A`, `AAAA`, ...).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType(pub u16);

#[allow(missing_docs)]
impl RecordType {
    pub const A: Self = Self(1);
    pub const NS: Self = Self(2);
    pub const CNAME: Self = Self(5);
    pub const SOA: Self = Self(6);
    pub const PTR: Self = Self(12);
    pub const MX: Self = Self(15);
    pub const TXT: Self = Self(16);
    pub const AAAA: Self = Self(28);
    pub const SRV: Self = Self(33);
    pub const HTTPS: Self = Self(65);
    pub const ANY: Self = Self(255);
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::PTR => "PTR",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            Self::HTTPS => "HTTPS",
            Self::ANY => "ANY",
            Self(other) => return write!(f, "TYPE{}", other),
        };
        f.write_str(name)
    }
}

/// The `IN` (Internet) class.
pub const CLASS_IN: u16 = 1;

/// A single question of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Domain name being asked about.
    pub name: String,
    /// Requested record type.
    pub record_type: RecordType,
    /// Query class, usually [`CLASS_IN`].
    pub class: u16,
}

impl Question {
    /// Creates an `IN` class question.
    pub fn new(name: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
            class: CLASS_IN,
        }
    }
}

/// Description of a DNS query, handed to a [`DohCodec`] for encoding.
///
/// `flags` and `kind` are optional; unset values are filled in with
/// [`RECURSION_DESIRED`] and [`PacketKind::Query`] before encoding, while
/// values set by the caller are kept.
///
/// ```
/// use doh_rs::codec::{PacketKind, Query, RecordType, RECURSION_DESIRED};
/// let query = Query::new().question("example.com", RecordType::A);
/// let prepared = query.with_defaults();
/// assert_eq!(prepared.flags, Some(RECURSION_DESIRED));
/// assert_eq!(prepared.kind, Some(PacketKind::Query));
///
/// let no_recursion = Query::new().flags(0).with_defaults();
/// assert_eq!(no_recursion.flags, Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Message id.
    pub id: u16,
    /// Header flags; `None` means "use the defaults".
    pub flags: Option<u16>,
    /// Packet kind; `None` means [`PacketKind::Query`].
    pub kind: Option<PacketKind>,
    /// Questions to ask.
    pub questions: Vec<Question>,
}

impl Query {
    /// Creates an empty query with id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message id.
    pub fn id(self, id: u16) -> Self {
        Self { id, ..self }
    }

    /// Sets explicit header flags.
    pub fn flags(self, flags: u16) -> Self {
        Self {
            flags: Some(flags),
            ..self
        }
    }

    /// Sets the packet kind.
    pub fn kind(self, kind: PacketKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    /// Adds an `IN` class question.
    pub fn question(mut self, name: impl Into<String>, record_type: RecordType) -> Self {
        self.questions.push(Question::new(name, record_type));
        self
    }

    /// Returns a copy with unset fields replaced by the defaults.
    pub fn with_defaults(&self) -> Query {
        Query {
            flags: Some(self.flags.unwrap_or(RECURSION_DESIRED)),
            kind: Some(self.kind.unwrap_or_default()),
            ..self.clone()
        }
    }
}

/// Converts [`Query`]s into DNS wire format and decodes wire-format responses.
pub trait DohCodec: Send + Sync {
    /// Decoded response representation.
    type Response: Send;

    /// Errors encountered while encoding or decoding.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encodes a query. The query already carries its default flags.
    fn encode(&self, query: &Query) -> Result<Vec<u8>, Self::Error>;

    /// Decodes a non-empty response body.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Response, Self::Error>;
}

impl<C: DohCodec + ?Sized> DohCodec for &C {
    type Response = C::Response;
    type Error = C::Error;

    fn encode(&self, query: &Query) -> Result<Vec<u8>, Self::Error> {
        (**self).encode(query)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Self::Response, Self::Error> {
        (**self).decode(bytes)
    }
}
