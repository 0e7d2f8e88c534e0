//! Remoting packet framing
//!
//! A request packet carries a version word, a list of header blocks and a
//! list of bodies, one per RPC invocation. The reply packet mirrors it with
//! one reply frame per addressed body.

pub mod framer;
pub mod message;

pub use framer::{build_reply_packet, encode_reply_frame, parse_packet, put_reply_frame};
pub use message::{expects_reply, Body, HeaderBlock, Packet};
