//! Remoting gateway
//!
//! The dispatcher, the responder extension point and the per-body diagnostic
//! record.

pub mod dispatcher;
pub mod record;
pub mod responder;

pub use dispatcher::{reply_target, Dispatch, DispatchSummary, Gateway};
pub use record::DiagnosticRecord;
pub use responder::{EchoResponder, PayloadEcho, Responder};
