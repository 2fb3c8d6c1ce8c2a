//! Shared utilities for integration and load testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use symbol_relay::config::{RelayConfig, SecretToken};
use symbol_relay::{HttpServer, Shutdown};

/// How a canned reply frames its body.
#[derive(Clone, Copy, Debug)]
pub enum Framing {
    /// `Content-Length` matches the body.
    Exact,
    /// No `Content-Length`; the body ends when the socket closes.
    UntilClose,
    /// `Content-Length` claims this many bytes, then the socket closes early.
    Declared(u64),
}

/// A canned upstream reply.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
    pub framing: Framing,
}

impl Reply {
    pub fn ok(body: &[u8], etag: &str) -> Self {
        Self {
            status: 200,
            headers: vec![("ETag", etag.to_string())],
            body: body.to_vec(),
            framing: Framing::Exact,
        }
    }

    pub fn framed(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            framing: Framing::Exact,
        }
    }
}

/// Request heads (request line + headers) seen by a mock backend.
pub type Seen = Arc<Mutex<Vec<String>>>;

/// Start a programmable mock backend on an ephemeral port.
///
/// Returns the backend address and the log of received request heads.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, Seen)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = seen.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        log.lock().unwrap().push(head.clone());

                        let reply = f(head).await;
                        let mut response = format!(
                            "HTTP/1.1 {} {}\r\nConnection: close\r\n",
                            reply.status,
                            reason(reply.status)
                        );
                        match reply.framing {
                            Framing::Exact => response
                                .push_str(&format!("Content-Length: {}\r\n", reply.body.len())),
                            Framing::Declared(len) => {
                                response.push_str(&format!("Content-Length: {}\r\n", len))
                            }
                            Framing::UntilClose => {}
                        }
                        for (name, value) in &reply.headers {
                            response.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        response.push_str("\r\n");

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.write_all(&reply.body).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, seen)
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Relay config pointed at `upstream` with a fixed token.
pub fn relay_config(upstream: SocketAddr, token: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.base_url = format!("http://{}/_apis/symbol/symsrv/", upstream);
    config.upstream.token = Some(SecretToken::new(token));
    config
}

/// Start the relay on an ephemeral port. Keep the `Shutdown` alive for the test.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
