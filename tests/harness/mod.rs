//! Shared fixtures for integration tests: a scriptable in-memory transport
//! and a loopback DoH server, both answering with real DNS messages.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::Mutex;

use async_trait::async_trait;
use doh_rs::{
    hickory_proto::{
        op::{Message, MessageType, OpCode, ResponseCode},
        rr::{rdata::A, RData, Record, RecordType},
        ProtoError,
    },
    transport::{DohRequest, Transport, TransportError},
};
use http::StatusCode;

pub mod doh_server;

/// Address returned for every `A` question.
pub const ANSWER: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 53);

/// TTL of the records returned by [`answer`].
pub const TTL: u32 = 300;

/// Builds the wire-format response to a wire-format query: one `A` record
/// per `A` question, `NXDOMAIN` when nothing matched.
pub fn answer(query: &[u8]) -> Result<Vec<u8>, ProtoError> {
    let query = Message::from_vec(query)?;

    let mut response = Message::new();
    response
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(query.recursion_desired())
        .set_recursion_available(true);

    for question in query.queries() {
        response.add_query(question.clone());
        if question.query_type() == RecordType::A {
            let record = Record::from_rdata(question.name().clone(), TTL, RData::A(A(ANSWER)));
            response.add_answer(record);
        }
    }

    if response.answers().is_empty() {
        response.set_response_code(ResponseCode::NXDomain);
    }

    response.to_vec()
}

/// What [`MockTransport`] does with a request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer the query with [`answer`].
    Answer,
    /// Fail with a non-200 status.
    Status(StatusCode),
    /// Fail like a reset connection.
    Fail,
    /// Succeed with an empty body.
    Empty,
    /// Succeed with a body that is not a DNS message.
    Garbage,
    /// Never respond.
    Hang,
}

/// Transport that records every request and replies from a script.
///
/// Per-host replies take precedence, then scripted replies in call order,
/// then the fallback.
pub struct MockTransport {
    fallback: Reply,
    script: Mutex<VecDeque<Reply>>,
    hosts: HashMap<String, Reply>,
    requests: Mutex<Vec<DohRequest>>,
}

impl MockTransport {
    /// Transport answering every request.
    pub fn answering() -> Self {
        Self::replying(Reply::Answer)
    }

    /// Transport replying `fallback` to anything not otherwise scripted.
    pub fn replying(fallback: Reply) -> Self {
        Self {
            fallback,
            script: Mutex::new(VecDeque::new()),
            hosts: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues replies for the next calls.
    pub fn script(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.script.lock().unwrap().extend(replies);
        self
    }

    /// Always replies `reply` to requests for `host`.
    pub fn host(mut self, host: &str, reply: Reply) -> Self {
        self.hosts.insert(host.to_owned(), reply);
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<DohRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Hosts of the requests received so far, in order.
    pub fn hosts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.host().to_owned())
            .collect()
    }

    fn next_reply(&self, request: &DohRequest) -> Reply {
        if let Some(reply) = self.hosts.get(request.host()) {
            return reply.clone();
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &DohRequest) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.next_reply(request) {
            Reply::Answer => answer(request.body()).map_err(|err| TransportError::Other(err.into())),
            Reply::Status(status) => Err(TransportError::Status(status)),
            Reply::Fail => Err(TransportError::Other("connection reset by peer".into())),
            Reply::Empty => Ok(Vec::new()),
            Reply::Garbage => Ok(b"<html>not dns</html>".to_vec()),
            Reply::Hang => futures::future::pending().await,
        }
    }
}
