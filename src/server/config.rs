//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::error::{Error, Result};

/// Default remoting gateway port (cygnal's CGI port)
pub const DEFAULT_PORT: u16 = 1234;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum requests served at once (0 = unlimited)
    pub max_connections: usize,

    /// Largest request body accepted, in bytes
    pub max_request_size: usize,

    /// Time allowed to receive and answer a request
    pub read_timeout: Duration,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Append one line per dispatched body to this file
    pub result_log: Option<PathBuf>,

    /// Value of the Server header in HTTP replies
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_connections: 0, // Unlimited
            max_request_size: 1024 * 1024, // 1MB
            read_timeout: Duration::from_secs(10),
            tcp_nodelay: true,
            result_log: None,
            server_name: format!("amf-gateway/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the request size limit
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.max_request_size = size;
        self
    }

    /// Set read timeout
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Write a result log entry per dispatched body
    pub fn result_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_log = Some(path.into());
        self
    }

    /// Set the Server header value
    pub fn server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Check the configuration before starting a server
    pub fn validate(&self) -> Result<()> {
        if self.max_request_size == 0 {
            return Err(Error::Config("max_request_size must be non-zero".into()));
        }
        if self.read_timeout.is_zero() {
            return Err(Error::Config("read_timeout must be non-zero".into()));
        }
        if HeaderValue::from_str(&self.server_name).is_err() {
            return Err(Error::Config("server_name is not a valid header value".into()));
        }
        Ok(())
    }
}
