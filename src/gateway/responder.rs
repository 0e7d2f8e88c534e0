//! Responder trait
//!
//! The extension point for remote-procedure logic. The gateway hands each
//! body's raw argument payload and its diagnostic record to the responder
//! and encodes whatever value comes back.

use bytes::Bytes;

use super::record::DiagnosticRecord;
use crate::amf::marker::TypeMarker;
use crate::amf::value::Value;

/// Strict-array header: marker plus 32-bit count
const ARGS_HEADER_LEN: usize = 5;

/// Produces the reply value for one body
///
/// # Example
///
/// ```
/// use amf_gateway::gateway::{DiagnosticRecord, Gateway, Responder};
/// use amf_gateway::amf::Value;
/// use bytes::Bytes;
///
/// struct Upper;
///
/// impl Responder for Upper {
///     fn respond(&self, _payload: &Bytes, record: &DiagnosticRecord) -> Value {
///         Value::from(record.method.to_uppercase())
///     }
/// }
///
/// let gateway = Gateway::new(Upper);
/// ```
pub trait Responder: Send + Sync + 'static {
    fn respond(&self, payload: &Bytes, record: &DiagnosticRecord) -> Value;
}

impl<F> Responder for F
where
    F: Fn(&Bytes, &DiagnosticRecord) -> Value + Send + Sync + 'static,
{
    fn respond(&self, payload: &Bytes, record: &DiagnosticRecord) -> Value {
        self(payload, record)
    }
}

/// Echoes the diagnostic record back as an ECMA array
///
/// This is what the remoting test harness checks against: the reply tells
/// the client how the gateway saw its call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder;

impl Responder for EchoResponder {
    fn respond(&self, _payload: &Bytes, record: &DiagnosticRecord) -> Value {
        record.to_value()
    }
}

/// Echoes a single argument back verbatim
///
/// Matches the Red5 echo test: a lone `undefined` argument is answered
/// with `null`. Payloads that are not a one-argument list fall back to the
/// diagnostic record.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadEcho;

impl Responder for PayloadEcho {
    fn respond(&self, payload: &Bytes, record: &DiagnosticRecord) -> Value {
        if record.arg_count != Ok(1) || payload.len() <= ARGS_HEADER_LEN {
            return record.to_value();
        }

        let arg = payload.slice(ARGS_HEADER_LEN..);
        if arg[0] == TypeMarker::Undefined.as_u8() && arg.len() == 1 {
            return Value::Raw(Bytes::from_static(&[TypeMarker::Null as u8]));
        }
        Value::Raw(arg)
    }
}
