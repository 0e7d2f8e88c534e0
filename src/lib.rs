//! amf-gateway: minimal AMF0 remoting gateway
//!
//! This library answers Flash Remoting (NetConnection) style request
//! packets:
//! - Packet framing: version word, header blocks, bodies, reply assembly
//! - AMF0 encoding of string and ECMA-array replies
//! - Shallow argument inspection for diagnostics, never full decoding
//! - `onResult`/`onStatus` replies, with no-reply notifications folded into
//!   the next addressed call
//! - An HTTP POST front end and an append-only result log
//!
//! # Example: Processing a packet
//!
//! ```
//! use amf_gateway::gateway::{EchoResponder, Gateway};
//!
//! let gateway = Gateway::new(EchoResponder);
//!
//! // version 0, no headers, no bodies
//! let dispatch = gateway.process(&[0, 0, 0, 0, 0, 0], None).unwrap();
//! assert_eq!(&dispatch.reply[..], &[0, 0, 0, 0, 0, 0]);
//! ```
//!
//! # Example: Serving over HTTP
//!
//! ```no_run
//! use amf_gateway::{EchoResponder, GatewayServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = GatewayServer::new(ServerConfig::default(), EchoResponder)?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod amf;
pub mod error;
pub mod gateway;
pub mod log;
pub mod packet;
pub mod server;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use gateway::{DiagnosticRecord, EchoResponder, Gateway, PayloadEcho, Responder};
pub use server::config::ServerConfig;
pub use server::listener::GatewayServer;
