//! HTTP transport for the remoting gateway
//!
//! This module carries remoting packets over HTTP:
//! - TCP listener serving the router
//! - Axum routes, request limits and the result log hook
//! - Server configuration

pub mod config;
pub mod http;
pub mod listener;

pub use config::ServerConfig;
pub use http::{router, GatewayState};
pub use listener::GatewayServer;
