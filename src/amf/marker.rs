//! AMF0 type markers
//!
//! ```text
//! 0x00 - Number (IEEE 754 double)
//! 0x01 - Boolean
//! 0x02 - String (UTF-8, 16-bit length prefix)
//! 0x03 - Object (key-value pairs until 0x000009)
//! 0x04 - MovieClip (reserved)
//! 0x05 - Null
//! 0x06 - Undefined
//! 0x07 - Reference (16-bit index)
//! 0x08 - ECMA Array (associative array)
//! 0x09 - Object End (0x000009 sequence)
//! 0x0A - Strict Array (dense array, used for argument lists)
//! 0x0B - Date (double + timezone)
//! 0x0C - Long String (UTF-8, 32-bit length prefix)
//! 0x0D - Unsupported
//! 0x0E - RecordSet (reserved)
//! 0x0F - XML Document
//! 0x10 - Typed Object (class name + properties)
//! 0x11 - AVM+ (switch to AMF3)
//! ```
//!
//! The gateway only produces strings and ECMA arrays. Every other marker is
//! recognized by tag so argument lists can be described, never decoded.

/// Object end sequence: empty key followed by the object-end marker
pub const OBJECT_END: [u8; 3] = [0x00, 0x00, 0x09];

/// AMF0 type marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeMarker {
    Number = 0x00,
    Boolean = 0x01,
    String = 0x02,
    Object = 0x03,
    MovieClip = 0x04,
    Null = 0x05,
    Undefined = 0x06,
    Reference = 0x07,
    EcmaArray = 0x08,
    ObjectEnd = 0x09,
    StrictArray = 0x0A,
    Date = 0x0B,
    LongString = 0x0C,
    Unsupported = 0x0D,
    RecordSet = 0x0E,
    XmlDocument = 0x0F,
    TypedObject = 0x10,
    Amf3Data = 0x11,
}

impl TypeMarker {
    /// Map a tag byte to its marker
    pub fn from_u8(tag: u8) -> Option<Self> {
        let marker = match tag {
            0x00 => TypeMarker::Number,
            0x01 => TypeMarker::Boolean,
            0x02 => TypeMarker::String,
            0x03 => TypeMarker::Object,
            0x04 => TypeMarker::MovieClip,
            0x05 => TypeMarker::Null,
            0x06 => TypeMarker::Undefined,
            0x07 => TypeMarker::Reference,
            0x08 => TypeMarker::EcmaArray,
            0x09 => TypeMarker::ObjectEnd,
            0x0A => TypeMarker::StrictArray,
            0x0B => TypeMarker::Date,
            0x0C => TypeMarker::LongString,
            0x0D => TypeMarker::Unsupported,
            0x0E => TypeMarker::RecordSet,
            0x0F => TypeMarker::XmlDocument,
            0x10 => TypeMarker::TypedObject,
            0x11 => TypeMarker::Amf3Data,
            _ => return None,
        };
        Some(marker)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Name reported in diagnostic records
    pub fn name(self) -> &'static str {
        match self {
            TypeMarker::Number => "DOUBLE",
            TypeMarker::Boolean => "BOOLEAN",
            TypeMarker::String => "STRING",
            TypeMarker::Object => "OBJECT",
            TypeMarker::MovieClip => "MOVIECLIP",
            TypeMarker::Null => "NULL",
            TypeMarker::Undefined => "UNDEFINED",
            TypeMarker::Reference => "REFERENCE",
            TypeMarker::EcmaArray => "ECMA_ARRAY",
            TypeMarker::ObjectEnd => "OBJECT_END",
            TypeMarker::StrictArray => "STRICT_ARRAY",
            TypeMarker::Date => "DATE",
            TypeMarker::LongString => "LONG_STRING",
            TypeMarker::Unsupported => "UNSUPPORTED",
            TypeMarker::RecordSet => "RECORD_SET",
            TypeMarker::XmlDocument => "XML_OBJECT",
            TypeMarker::TypedObject => "TYPED_OBJECT",
            TypeMarker::Amf3Data => "AMF3_DATA",
        }
    }
}
