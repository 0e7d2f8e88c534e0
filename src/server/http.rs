//! Axum routing for remoting POSTs
//!
//! Remoting clients send one packet per POST, on whatever path the gateway
//! was configured under, and expect an `application/x-amf` reply.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, DefaultBodyLimit, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::gateway::{DiagnosticRecord, Gateway, Responder};
use crate::log::ResultLog;
use crate::server::config::ServerConfig;

/// Content type of remoting packets
pub const AMF_CONTENT_TYPE: &str = "application/x-amf";

/// Shared state behind every remoting route
pub struct GatewayState<R: Responder> {
    gateway: Arc<Gateway<R>>,
    result_log: Option<Arc<ResultLog>>,
    limiter: Option<Arc<Semaphore>>,
    request_timeout: Duration,
    max_request_size: usize,
    server_name: HeaderValue,
}

impl<R: Responder> Clone for GatewayState<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            result_log: self.result_log.clone(),
            limiter: self.limiter.clone(),
            request_timeout: self.request_timeout,
            max_request_size: self.max_request_size,
            server_name: self.server_name.clone(),
        }
    }
}

impl<R: Responder> GatewayState<R> {
    /// Build route state from a validated configuration
    ///
    /// Opens the result log when one is configured.
    pub fn new(config: &ServerConfig, gateway: Gateway<R>) -> Result<Self> {
        let server_name = HeaderValue::from_str(&config.server_name)
            .map_err(|_| Error::Config("server_name is not a valid header value".into()))?;

        let result_log = match &config.result_log {
            Some(path) => Some(Arc::new(ResultLog::open(path)?)),
            None => None,
        };

        let limiter = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Ok(Self {
            gateway: Arc::new(gateway),
            result_log,
            limiter,
            request_timeout: config.read_timeout,
            max_request_size: config.max_request_size,
            server_name,
        })
    }
}

/// Router answering remoting POSTs on every path
///
/// Other methods get 405 and bodies over the configured size get 413.
pub fn router<R: Responder>(state: GatewayState<R>) -> Router {
    let server_name = state.server_name.clone();

    Router::new()
        .route("/", post(handle_packet::<R>))
        .route("/*path", post(handle_packet::<R>))
        .layer(middleware::from_fn_with_state(state.clone(), guard_request::<R>))
        .layer(DefaultBodyLimit::max(state.max_request_size))
        .layer(middleware::map_response(move |mut response: Response| {
            let server_name = server_name.clone();
            async move {
                response.headers_mut().insert(header::SERVER, server_name);
                response
            }
        }))
        .with_state(state)
}

/// Concurrency limit and request deadline
async fn guard_request<R: Responder>(
    State(state): State<GatewayState<R>>,
    request: Request,
    next: Next,
) -> Response {
    let _permit = match &state.limiter {
        Some(limiter) => match Arc::clone(limiter).try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(_) => {
                tracing::warn!(uri = %request.uri(), "Request rejected: limit reached");
                return Error::Overloaded.into_response();
            }
        },
        None => None,
    };

    match timeout(state.request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::debug!(timeout = ?state.request_timeout, "Request timed out");
            Error::Timeout.into_response()
        }
    }
}

async fn handle_packet<R: Responder>(
    State(state): State<GatewayState<R>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> std::result::Result<Response, Error> {
    let remote_port = connect_info.map(|ConnectInfo(addr)| addr.port());

    let dispatch = state.gateway.process(&body, remote_port).map_err(|e| {
        tracing::warn!(error = %e, request_len = body.len(), "Rejected remoting packet");
        e
    })?;

    tracing::debug!(
        bodies = dispatch.summary.bodies,
        replies = dispatch.summary.replies,
        reply_len = dispatch.reply.len(),
        "Dispatched remoting packet"
    );

    if let Some(log) = &state.result_log {
        append_records(Arc::clone(log), &dispatch.records).await;
    }

    Ok(([(header::CONTENT_TYPE, AMF_CONTENT_TYPE)], dispatch.reply).into_response())
}

/// Write one log line per record on the blocking pool
///
/// Failures are logged and never fail the request.
async fn append_records(log: Arc<ResultLog>, records: &[DiagnosticRecord]) {
    let entries: Vec<String> = records.iter().map(DiagnosticRecord::summary).collect();
    let path = log.path().to_path_buf();

    match tokio::task::spawn_blocking(move || log.append(&entries)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write result log")
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Result log writer failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amf::codec::read_counted_string;
    use crate::amf::value::Value;
    use crate::gateway::EchoResponder;
    use crate::packet::framer::build_request_packet;
    use crate::packet::Body;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const HI_ARGS: &[u8] = &[0x0a, 0, 0, 0, 1, 0x02, 0x00, 0x02, b'h', b'i'];

    fn body(method: &str, request_id: &str) -> Body {
        Body {
            method: method.into(),
            request_id: request_id.into(),
            length: HI_ARGS.len() as u32,
            payload: Bytes::from_static(HI_ARGS),
        }
    }

    async fn spawn_app<R: Responder>(config: ServerConfig, responder: R) -> SocketAddr {
        let state = GatewayState::new(&config, Gateway::new(responder)).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn post_bytes(path: &str, body: &[u8]) -> Vec<u8> {
        let mut req = format!(
            "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/x-amf\r\nContent-Length: {}\r\n\r\n",
            path,
            body.len()
        )
        .into_bytes();
        req.extend_from_slice(body);
        req
    }

    struct Reply {
        status: u16,
        /// Lowercased response head
        head: String,
        body: Vec<u8>,
    }

    /// Read one response, sized by its Content-Length
    async fn read_reply(stream: &mut TcpStream) -> Reply {
        let mut buf = Vec::new();
        loop {
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length: "))
                    .map_or(0, |v| v.trim().parse::<usize>().unwrap());
                if buf.len() >= end + 4 + len {
                    let status = head.split_whitespace().nth(1).unwrap().parse().unwrap();
                    let body = buf[end + 4..end + 4 + len].to_vec();
                    return Reply { status, head, body };
                }
            }
            let mut chunk = [0u8; 4096];
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before a full response");
            buf.extend_from_slice(&chunk[..n]);
        }
    }

    async fn send(addr: SocketAddr, raw: &[u8]) -> (u16, Reply) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let local_port = stream.local_addr().unwrap().port();
        stream.write_all(raw).await.unwrap();
        (local_port, read_reply(&mut stream).await)
    }

    #[tokio::test]
    async fn test_post_returns_amf_reply() {
        let addr = spawn_app(ServerConfig::default(), EchoResponder).await;
        let packet = build_request_packet(&[], &[body("echo", "/1")]);

        let (_, reply) = send(addr, &post_bytes("/gateway", &packet)).await;

        assert_eq!(reply.status, 200);
        assert!(reply.head.contains("content-type: application/x-amf"));
        assert!(reply.head.contains("server: amf-gateway/"));
        assert_eq!(&reply.body[..6], &[0, 0, 0, 0, 0, 1]);
        assert_eq!(read_counted_string(&reply.body, 6).unwrap().0, "/1/onResult");
    }

    #[tokio::test]
    async fn test_remote_port_from_peer() {
        let responder = |_: &Bytes, record: &DiagnosticRecord| {
            Value::from(record.remote_port.unwrap_or(0))
        };
        let addr = spawn_app(ServerConfig::default(), responder).await;
        let packet = build_request_packet(&[], &[body("echo", "/1")]);

        let (local_port, reply) = send(addr, &post_bytes("/", &packet)).await;

        assert_eq!(reply.status, 200);
        let (_, next) = read_counted_string(&reply.body, 6).unwrap();
        let (_, next) = read_counted_string(&reply.body, next).unwrap();
        // Skip the unknown-length word and the string tag
        let (port, _) = read_counted_string(&reply.body, next + 5).unwrap();
        assert_eq!(port, local_port.to_string());
    }

    #[tokio::test]
    async fn test_truncated_packet_is_bad_request() {
        let addr = spawn_app(ServerConfig::default(), EchoResponder).await;
        let packet = build_request_packet(&[], &[body("echo", "/1")]);
        let cut = &packet[..packet.len() - 2];

        let (_, reply) = send(addr, &post_bytes("/gateway", cut)).await;

        assert_eq!(reply.status, 400);
        assert!(String::from_utf8_lossy(&reply.body).contains("Truncated packet"));
    }

    #[tokio::test]
    async fn test_rejects_get() {
        let addr = spawn_app(ServerConfig::default(), EchoResponder).await;

        let (_, reply) = send(addr, b"GET /gateway HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

        assert_eq!(reply.status, 405);
        assert!(reply.head.contains("server: amf-gateway/"));
    }

    #[tokio::test]
    async fn test_rejects_oversize_body() {
        let config = ServerConfig::default().max_request_size(8);
        let addr = spawn_app(config, EchoResponder).await;
        let packet = build_request_packet(&[], &[body("echo", "/1")]);

        let (_, reply) = send(addr, &post_bytes("/gateway", &packet)).await;

        assert_eq!(reply.status, 413);
    }

    #[tokio::test]
    async fn test_slow_body_times_out() {
        let config = ServerConfig::default().read_timeout(Duration::from_millis(100));
        let addr = spawn_app(config, EchoResponder).await;

        let (_, reply) = send(
            addr,
            b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10\r\n\r\nabc",
        )
        .await;

        assert_eq!(reply.status, 408);
    }

    #[tokio::test]
    async fn test_concurrency_limit() {
        let config = ServerConfig::default()
            .max_connections(1)
            .read_timeout(Duration::from_secs(2));
        let addr = spawn_app(config, EchoResponder).await;

        // Holds the only permit while its body never completes
        let mut stalled = TcpStream::connect(addr).await.unwrap();
        stalled
            .write_all(b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10\r\n\r\nabc")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let packet = build_request_packet(&[], &[body("echo", "/1")]);
        let (_, reply) = send(addr, &post_bytes("/gateway", &packet)).await;
        assert_eq!(reply.status, 503);
    }

    #[tokio::test]
    async fn test_result_log_written() {
        let path = std::env::temp_dir().join(format!(
            "amf-gateway-{}-http.log",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let config = ServerConfig::default().result_log(&path);
        let addr = spawn_app(config, EchoResponder).await;
        let packet = build_request_packet(&[], &[body("notify", "/"), body("echo", "/1")]);

        let (local_port, reply) = send(addr, &post_bytes("/gateway", &packet)).await;
        assert_eq!(reply.status, 200);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("method=notify request_id=/ arg1_type=STRING"));
        assert!(lines[1].ends_with(&format!("remote_port={} unsent=1", local_port)));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_state_rejects_bad_server_name() {
        let config = ServerConfig::default().server_name("bad\nname");
        assert!(matches!(
            GatewayState::new(&config, Gateway::new(EchoResponder)),
            Err(Error::Config(_))
        ));
    }
}
