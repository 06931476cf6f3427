//! Minimal plaintext HTTP/1.1 DoH server for exercising real transports.

use std::collections::HashMap;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use http::StatusCode;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

use crate::harness::answer;

/// How the server responds.
#[derive(Debug, Clone, Copy)]
pub enum Mode {
    /// Answer queries with [`answer`].
    Answer,
    /// Respond with the given status and no body.
    Status(StatusCode),
    /// Respond `200 OK` with an empty body.
    Empty,
}

/// A request as received by the server.
#[derive(Debug, Clone)]
pub struct Seen {
    /// Request method (`GET`, `POST`).
    pub method: String,
    /// Request target, including the query string.
    pub target: String,
    /// Headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Seen {
    /// Value of header `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// DNS message carried by the request, from the `dns` parameter of a
    /// `GET` or the body of a `POST`.
    pub fn dns_message(&self) -> Vec<u8> {
        if self.method != "GET" {
            return self.body.clone();
        }
        self.target
            .split_once('?')
            .and_then(|(_, params)| {
                params
                    .split('&')
                    .find_map(|param| param.strip_prefix("dns="))
            })
            .and_then(|encoded| URL_SAFE_NO_PAD.decode(encoded).ok())
            .unwrap_or_default()
    }
}

/// Loopback DoH server.
pub struct DohServer;

impl DohServer {
    /// Start the server on an ephemeral loopback port.
    pub async fn spawn(mode: Mode) -> io::Result<DohServerHandle> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(Self::run(listener, mode, seen.clone()));
        Ok(DohServerHandle { addr, seen, task })
    }

    async fn run(listener: TcpListener, mode: Mode, seen: Arc<Mutex<Vec<Seen>>>) {
        while let Ok((stream, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                if let Err(err) = Self::serve(stream, mode, &seen).await {
                    eprintln!("mock DoH server: {err}");
                }
            });
        }
    }

    async fn serve(mut stream: TcpStream, mode: Mode, seen: &Mutex<Vec<Seen>>) -> io::Result<()> {
        let request = Self::read_request(&mut stream).await?;
        let message = request.dns_message();
        seen.lock().unwrap().push(request);

        let (status, body) = match mode {
            Mode::Answer => match answer(&message) {
                Ok(body) => (StatusCode::OK, body),
                Err(_) => (StatusCode::BAD_REQUEST, Vec::new()),
            },
            Mode::Status(status) => (status, Vec::new()),
            Mode::Empty => (StatusCode::OK, Vec::new()),
        };

        let head = format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/dns-message\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown"),
            body.len(),
        );
        stream.write_all(head.as_bytes()).await?;
        stream.write_all(&body).await?;
        stream.shutdown().await
    }

    async fn read_request(stream: &mut TcpStream) -> io::Result<Seen> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_len = loop {
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            buf.extend_from_slice(&chunk[..n]);
        };

        let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split(' ');
        let method = request_line.next().unwrap_or_default().to_owned();
        let target = request_line.next().unwrap_or_default().to_owned();
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_owned()))
            .collect::<HashMap<_, _>>();

        let length = headers
            .get("content-length")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = buf[head_len..].to_vec();
        while body.len() < length {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }
            body.extend_from_slice(&chunk[..n]);
        }
        body.truncate(length);

        Ok(Seen {
            method,
            target,
            headers,
            body,
        })
    }
}

/// Handle for the mock DoH server that shuts it down when dropped.
pub struct DohServerHandle {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<Seen>>>,
    task: JoinHandle<()>,
}

impl DohServerHandle {
    /// Endpoint string for this server; `suffix` is appended after the
    /// authority (e.g. `"/dns-query [post]"`).
    pub fn endpoint(&self, suffix: &str) -> String {
        format!("http://{}{}", self.addr, suffix)
    }

    /// Requests received so far.
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for DohServerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
