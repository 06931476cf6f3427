//! Codec backed by [`hickory_proto`].

use super::{DohCodec, PacketKind, Query, AUTHENTIC_DATA, CHECKING_DISABLED, RECURSION_DESIRED};
use hickory_proto::{
    op::{Message, MessageType, OpCode, Query as HickoryQuery},
    rr::{DNSClass, Name, RecordType},
    ProtoError,
};

/// Errors encountered by [`HickoryCodec`].
#[derive(Debug, thiserror::Error)]
pub enum HickoryCodecError {
    /// Wire format errors, including invalid names.
    #[error(transparent)]
    Proto(#[from] ProtoError),
    /// The question uses a class this codec cannot express.
    #[error("unsupported query class {0}")]
    UnsupportedClass(u16),
}

/// DNS codec producing and consuming [`hickory_proto`] messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct HickoryCodec;

impl HickoryCodec {
    fn class(class: u16) -> Result<DNSClass, HickoryCodecError> {
        Ok(match class {
            1 => DNSClass::IN,
            3 => DNSClass::CH,
            4 => DNSClass::HS,
            254 => DNSClass::NONE,
            255 => DNSClass::ANY,
            other => return Err(HickoryCodecError::UnsupportedClass(other)),
        })
    }

    /// Builds the message that [`DohCodec::encode`] serializes.
    pub fn message(query: &Query) -> Result<Message, HickoryCodecError> {
        let flags = query.flags.unwrap_or(RECURSION_DESIRED);
        let mut message = Message::new();
        message
            .set_id(query.id)
            .set_message_type(match query.kind.unwrap_or_default() {
                PacketKind::Query => MessageType::Query,
                PacketKind::Response => MessageType::Response,
            })
            .set_op_code(OpCode::Query)
            .set_recursion_desired(flags & RECURSION_DESIRED != 0)
            .set_authentic_data(flags & AUTHENTIC_DATA != 0)
            .set_checking_disabled(flags & CHECKING_DISABLED != 0);
        for question in &query.questions {
            let name = Name::from_ascii(&question.name)?;
            let mut q = HickoryQuery::query(name, RecordType::from(question.record_type.0));
            q.set_query_class(Self::class(question.class)?);
            message.add_query(q);
        }
        Ok(message)
    }
}

impl DohCodec for HickoryCodec {
    type Response = Message;
    type Error = HickoryCodecError;

    fn encode(&self, query: &Query) -> Result<Vec<u8>, Self::Error> {
        Ok(Self::message(query)?.to_vec()?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Self::Response, Self::Error> {
        Ok(Message::from_vec(bytes)?)
    }
}
