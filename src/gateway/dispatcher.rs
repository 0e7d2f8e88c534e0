//! Request dispatcher
//!
//! Turns one request packet into one reply packet:
//!
//! 1. Frame the packet into bodies
//! 2. Inspect each body's arguments into a [`DiagnosticRecord`]
//! 3. Ask the responder for a value
//! 4. Addressed bodies get an `onResult` (or `onStatus` for `fail`) frame;
//!    bodies with a no-reply request id are encoded and held back until the
//!    next addressed body, which carries them in its record
//!
//! Notifications still held when the packet ends have no body to ride on
//! and are dropped. That is the intended best-effort behavior.

use bytes::{Bytes, BytesMut};

use super::record::DiagnosticRecord;
use super::responder::Responder;
use crate::amf::encoder::encode_value;
use crate::error::Result;
use crate::packet::framer::{build_reply_packet, parse_packet, put_reply_frame, NULL_RESPONSE};

/// Method name answered with `onStatus` instead of `onResult`
pub const STATUS_METHOD: &str = "fail";

const ON_RESULT: &str = "/onResult";
const ON_STATUS: &str = "/onStatus";

/// Reply target for an addressed body
pub fn reply_target(method: &str, request_id: &str) -> String {
    let suffix = if method == STATUS_METHOD {
        ON_STATUS
    } else {
        ON_RESULT
    };
    format!("{}{}", request_id, suffix)
}

/// Encoded results of no-reply bodies awaiting the next addressed body
///
/// Local to one packet; never outlives [`Gateway::process`].
#[derive(Debug, Default)]
struct PendingUnsent {
    values: Vec<Bytes>,
}

impl PendingUnsent {
    fn push(&mut self, encoded: Bytes) {
        self.values.push(encoded);
    }

    fn take(&mut self) -> Option<Vec<Bytes>> {
        if self.values.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.values))
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

/// Counters for one processed packet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Bodies framed from the request
    pub bodies: usize,
    /// Reply frames written
    pub replies: u16,
    /// No-reply bodies whose result was held back
    pub deferred: usize,
    /// Held-back results dropped at the end of the packet
    pub dropped_unsent: usize,
}

/// Reply packet plus what it took to build it
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub reply: Bytes,
    pub records: Vec<DiagnosticRecord>,
    pub summary: DispatchSummary,
}

/// Remoting gateway core
///
/// Stateless between packets: `process` is a function of the request bytes
/// and the responder. It performs no I/O; callers that keep a result log
/// write [`Dispatch::records`] themselves.
pub struct Gateway<R: Responder> {
    responder: R,
}

impl<R: Responder> Gateway<R> {
    /// Create a gateway around a responder
    pub fn new(responder: R) -> Self {
        Self { responder }
    }

    /// Process one request packet into its reply packet
    ///
    /// Fails only when the request cannot be framed. Argument inspection
    /// problems are reported in the records and never abort processing.
    pub fn process(&self, request: &[u8], remote_port: Option<u16>) -> Result<Dispatch> {
        let packet = parse_packet(request)?;
        tracing::debug!(
            version = packet.version,
            headers = packet.headers.len(),
            bodies = packet.bodies.len(),
            declared_bodies = packet.declared_bodies,
            "Parsed remoting packet"
        );

        let mut summary = DispatchSummary {
            bodies: packet.bodies.len(),
            ..Default::default()
        };
        let mut pending = PendingUnsent::default();
        let mut replies = BytesMut::new();
        let mut records = Vec::with_capacity(packet.bodies.len());

        for body in &packet.bodies {
            let mut record = DiagnosticRecord::inspect(body, remote_port);

            if !body.expects_reply() {
                let value = self.responder.respond(&body.payload, &record);
                pending.push(encode_value(&value));
                summary.deferred += 1;

                tracing::debug!(
                    method = %body.method,
                    request_id = %body.request_id,
                    arg1_type = record.arg1_type_label(),
                    "Deferred no-reply body"
                );
                records.push(record);
                continue;
            }

            record.unsent = pending.take();
            let value = self.responder.respond(&body.payload, &record);
            let target = reply_target(&body.method, &body.request_id);
            put_reply_frame(&mut replies, &target, NULL_RESPONSE, &value);
            summary.replies += 1;

            tracing::debug!(
                method = %body.method,
                target = %target,
                arg1_type = record.arg1_type_label(),
                arg_count = %record.arg_count_label(),
                unsent = record.unsent.as_ref().map_or(0, |u| u.len()),
                "Replied to body"
            );
            records.push(record);
        }

        summary.dropped_unsent = pending.len();
        if summary.dropped_unsent > 0 {
            tracing::debug!(
                dropped = summary.dropped_unsent,
                "Dropping unsent notifications with no addressed body to carry them"
            );
        }

        Ok(Dispatch {
            reply: build_reply_packet(&replies, summary.replies),
            records,
            summary,
        })
    }
}
