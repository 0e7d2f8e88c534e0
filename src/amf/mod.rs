//! AMF (Action Message Format) support
//!
//! AMF0 is the binary serialization used by Flash Remoting gateways. The
//! gateway needs only a slice of it: counted strings and big-endian
//! integers for packet framing, an encoder for string and ECMA-array
//! replies, and a shallow inspector that describes incoming argument lists
//! without decoding them.

pub mod codec;
pub mod encoder;
pub mod inspect;
pub mod marker;
pub mod value;

pub use codec::PacketReader;
pub use encoder::{encode_value, ValueEncoder};
pub use inspect::{count_args, first_arg_type, hex_dump, ArgType};
pub use marker::TypeMarker;
pub use value::Value;
