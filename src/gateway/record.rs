//! Per-body diagnostic record
//!
//! Describes one invocation for test reporting. None of it affects framing.

use bytes::Bytes;

use crate::amf::inspect::{arg_count_label, arg_type_label, count_args, first_arg_type, hex_dump};
use crate::amf::value::Value;
use crate::amf::ArgType;
use crate::error::InspectError;
use crate::packet::Body;

/// Descriptive record handed to the responder with each body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub method: String,
    pub request_id: String,
    /// Port of the remote peer, when the transport knows it
    pub remote_port: Option<u16>,
    pub arg1_type: Result<ArgType, InspectError>,
    pub arg_count: Result<u32, InspectError>,
    /// Hex dump of the raw argument payload
    pub hex: String,
    /// Encoded results of earlier no-reply bodies, folded into this one
    pub unsent: Option<Vec<Bytes>>,
}

impl DiagnosticRecord {
    /// Inspect a body's payload
    pub fn inspect(body: &Body, remote_port: Option<u16>) -> Self {
        Self {
            method: body.method.clone(),
            request_id: body.request_id.clone(),
            remote_port,
            arg1_type: first_arg_type(&body.payload),
            arg_count: count_args(&body.payload),
            hex: hex_dump(&body.payload),
            unsent: None,
        }
    }

    pub fn arg1_type_label(&self) -> &'static str {
        arg_type_label(&self.arg1_type)
    }

    pub fn arg_count_label(&self) -> String {
        arg_count_label(&self.arg_count)
    }

    /// Render as an ECMA-array value
    ///
    /// Deferred notifications are nested as an indexed container whose
    /// entries are the pre-encoded results, spliced in verbatim.
    pub fn to_value(&self) -> Value {
        let mut entries = vec![
            ("method".to_string(), Value::from(self.method.as_str())),
            ("request_id".to_string(), Value::from(self.request_id.as_str())),
            (
                "remote_port".to_string(),
                self.remote_port.map(Value::from).unwrap_or_default(),
            ),
            ("arg1_type".to_string(), Value::from(self.arg1_type_label())),
            ("arg_count".to_string(), Value::from(self.arg_count_label())),
            ("hex".to_string(), Value::from(self.hex.as_str())),
        ];
        if let Some(unsent) = &self.unsent {
            entries.push((
                "unsent".to_string(),
                Value::list(unsent.iter().cloned().map(Value::Raw)),
            ));
        }
        Value::Container(entries)
    }

    /// One-line summary for the result log
    pub fn summary(&self) -> String {
        let mut line = format!(
            "method={} request_id={} arg1_type={} arg_count={}",
            self.method,
            self.request_id,
            self.arg1_type_label(),
            self.arg_count_label()
        );
        if let Some(port) = self.remote_port {
            line.push_str(&format!(" remote_port={}", port));
        }
        if let Some(unsent) = &self.unsent {
            line.push_str(&format!(" unsent={}", unsent.len()));
        }
        line
    }
}
