//! Shallow argument list inspection
//!
//! A remoting body's payload is normally a strict array (0x0A) holding the
//! call arguments. The inspector peeks at the array header and the first
//! argument's marker to describe the call; it never decodes values.
//!
//! ```text
//! +------+-----------------+-----------+-----
//! | 0x0A | count (u32, BE) | arg1 tag  | ...
//! +------+-----------------+-----------+-----
//!   0      1..5              5
//! ```

use std::fmt::Write;

use super::codec::read_long;
use super::marker::TypeMarker;
use crate::error::InspectError;

const ARGS_COUNT_OFFSET: usize = 1;
const FIRST_ARG_OFFSET: usize = 5;

/// Label reported when the argument list is empty
pub const NO_ARGS_LABEL: &str = "got 0 args";

/// Coarse type of a body's first argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// First argument carries a known AMF0 marker
    Typed(TypeMarker),
    /// The argument list is present but empty
    NoArgs,
}

impl ArgType {
    pub fn label(&self) -> &'static str {
        match self {
            ArgType::Typed(marker) => marker.name(),
            ArgType::NoArgs => NO_ARGS_LABEL,
        }
    }
}

/// Number of arguments declared by the strict-array header
pub fn count_args(payload: &[u8]) -> Result<u32, InspectError> {
    if payload.first() != Some(&TypeMarker::StrictArray.as_u8()) {
        return Err(InspectError::MalformedArgumentList);
    }
    read_long(payload, ARGS_COUNT_OFFSET).map_err(|_| InspectError::MalformedArgumentList)
}

/// Classify the first argument by its marker byte
pub fn first_arg_type(payload: &[u8]) -> Result<ArgType, InspectError> {
    if count_args(payload)? == 0 {
        return Ok(ArgType::NoArgs);
    }
    let tag = *payload
        .get(FIRST_ARG_OFFSET)
        .ok_or(InspectError::MalformedArgumentList)?;
    TypeMarker::from_u8(tag)
        .map(ArgType::Typed)
        .ok_or(InspectError::UnknownTypeTag(tag))
}

/// Label for a first-argument inspection result
pub fn arg_type_label(result: &Result<ArgType, InspectError>) -> &'static str {
    match result {
        Ok(arg) => arg.label(),
        Err(e) => e.label(),
    }
}

/// Label for an argument count result; failures share the type label
pub fn arg_count_label(result: &Result<u32, InspectError>) -> String {
    match result {
        Ok(n) => n.to_string(),
        Err(e) => e.label().to_string(),
    }
}

/// Colon-separated lowercase hex, e.g. `de:ad:be:ef`
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(':');
        }
        let _ = write!(out, "{:02x}", b);
    }
    out
}
