//! End-to-end queries through [`ReqwestTransport`] against a loopback server.

#![cfg(all(feature = "reqwest", feature = "hickory"))]

mod harness;

use std::time::Duration;

use doh_rs::{
    codec::{HickoryCodec, Query, RecordType},
    hickory_proto::{
        op::{Message, ResponseCode},
        rr::RecordType as WireType,
    },
    transport::{DohRequest, ReqwestTransport, Transport, TransportError},
    DohClient, Endpoint, Error, Method, QueryOptions,
};
use harness::{
    doh_server::{DohServer, Mode},
    ANSWER, TTL,
};
use http::StatusCode;

fn client() -> DohClient<ReqwestTransport, HickoryCodec> {
    DohClient::new()
}

fn query() -> Query {
    Query::new().id(7).question("example.com", RecordType::A)
}

fn options(endpoint: String) -> QueryOptions {
    QueryOptions::new()
        .endpoint(endpoint)
        .retries(0)
        .timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn get_query_is_answered() {
    let server = DohServer::spawn(Mode::Answer).await.unwrap();
    let outcome = client()
        .query(&query(), &options(server.endpoint("/dns-query")))
        .await
        .unwrap();

    assert_eq!(outcome.id(), 7);
    assert_eq!(outcome.response_code(), ResponseCode::NoError);
    let record = &outcome.answers()[0];
    assert_eq!(record.record_type(), WireType::A);
    assert_eq!(record.ttl(), TTL);
    assert!(record.to_string().contains(&ANSWER.to_string()), "{}", record);
    assert!(!outcome.endpoint().is_https());

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert!(seen[0].target.starts_with("/dns-query?dns="), "{}", seen[0].target);
    assert!(!seen[0].target.ends_with('='), "dns parameter must be unpadded");
    assert_eq!(seen[0].header("accept"), Some("application/dns-message"));
    let sent = Message::from_vec(&seen[0].dns_message()).unwrap();
    assert_eq!(sent.id(), 7);
    assert!(sent.recursion_desired());
}

#[tokio::test]
async fn post_query_sends_the_message_as_body() {
    let server = DohServer::spawn(Mode::Answer).await.unwrap();
    let outcome = client()
        .query(&query(), &options(server.endpoint("/resolve [post]")))
        .await
        .unwrap();

    assert_eq!(outcome.endpoint().method(), Method::Post);
    assert_eq!(outcome.answers().len(), 1);

    let seen = server.seen();
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].target, "/resolve");
    assert_eq!(
        seen[0].header("content-type"),
        Some("application/dns-message")
    );
    let sent = Message::from_vec(&seen[0].body).unwrap();
    assert_eq!(sent.queries()[0].query_type(), WireType::A);
}

#[tokio::test]
async fn error_status_is_reported_with_request_details() {
    let server = DohServer::spawn(Mode::Status(StatusCode::SERVICE_UNAVAILABLE))
        .await
        .unwrap();
    let endpoint = server.endpoint("/dns-query [post]");
    let err = client()
        .query(&query(), &options(endpoint.clone()).retries(1))
        .await
        .unwrap_err();

    assert_eq!(server.seen().len(), 2);
    match err {
        Error::HttpStatus { uri, status, method } => {
            let expected: Endpoint = endpoint.parse().unwrap();
            assert_eq!(
                uri,
                format!("http://{}:{}/dns-query", expected.host(), expected.port())
            );
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(method, Method::Post);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let server = DohServer::spawn(Mode::Empty).await.unwrap();
    let err = client()
        .query(&query(), &options(server.endpoint("")))
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("RESPONSE_ERR"));
    assert_eq!(err.to_string(), "Empty.");
    assert_eq!(server.seen()[0].target.split('?').next(), Some("/dns-query"));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Bind and release a port so nothing is listening on it.
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let endpoint: Endpoint = format!("http://{}", addr).parse().unwrap();
    let request = DohRequest::new(&endpoint, vec![0; 12], Duration::from_secs(5));
    let err = ReqwestTransport::new().send(&request).await.unwrap_err();
    assert!(matches!(err, TransportError::Other(_)), "{:?}", err);
}

#[test]
fn shared_client_works_across_runtimes() {
    let server_runtime = tokio::runtime::Runtime::new().unwrap();
    let server = server_runtime.block_on(DohServer::spawn(Mode::Answer)).unwrap();
    let options = options(server.endpoint("/dns-query"));

    for _ in 0..2 {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let outcome = runtime.block_on(doh_rs::query(&query(), &options)).unwrap();
        assert_eq!(outcome.id(), 7);
        drop(runtime);
    }
    assert_eq!(server.seen().len(), 2);
}
