//! AMF3 type markers and value classification
//!
//! Type Markers:
//! ```text
//! 0x00 - Undefined
//! 0x01 - Null
//! 0x02 - False
//! 0x03 - True
//! 0x04 - Integer (U29, signed 29-bit)
//! 0x05 - Double (IEEE 754, network order)
//! 0x06 - String (U29 length/reference + UTF-8)
//! 0x07 - XML Document (not supported)
//! 0x08 - Date (U29 reference header + double)
//! 0x09 - Array (associative part, then dense part)
//! 0x0A - Object (traits + dynamic members)
//! 0x0B - XML (not supported)
//! 0x0C - ByteArray (U29 length/reference + raw bytes)
//! 0x0D - Vector<int> (not supported)
//! 0x0E - Vector<uint> (not supported)
//! 0x0F - Vector<Number> (not supported)
//! 0x10 - Vector<Object> (not supported)
//! 0x11 - Dictionary (not supported)
//! ```

use std::fmt;

use crate::error::AmfError;
use super::value::AmfValue;

/// Smallest integer that is written with the Integer marker (-2^28)
pub const MIN_INT: i64 = -0x1000_0000;

/// Largest integer that is written with the Integer marker (2^28 - 1)
pub const MAX_INT: i64 = 0x0FFF_FFFF;

/// Largest payload a U29 header (length or reference) may carry
pub const MAX_U29: u32 = 0x1FFF_FFFF;

/// Low bit of a U29 header: 1 = inline value/length, 0 = reference index
pub const INLINE_BIT: u32 = 0x01;

/// Object trait header: inline, traits inline, not externalizable, dynamic, 0 sealed
pub const DYNAMIC_TRAITS: u32 = 0b1011;

/// AMF3 wire type marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeMarker {
    Undefined = 0x00,
    Null = 0x01,
    False = 0x02,
    True = 0x03,
    Integer = 0x04,
    Double = 0x05,
    String = 0x06,
    XmlDoc = 0x07,
    Date = 0x08,
    Array = 0x09,
    Object = 0x0A,
    Xml = 0x0B,
    ByteArray = 0x0C,
    VectorInt = 0x0D,
    VectorUint = 0x0E,
    VectorDouble = 0x0F,
    VectorObject = 0x10,
    Dictionary = 0x11,
}

impl TypeMarker {
    /// Parse a marker byte; bytes above 0x11 are not AMF3 markers
    pub fn from_byte(b: u8) -> Result<Self, AmfError> {
        Ok(match b {
            0x00 => TypeMarker::Undefined,
            0x01 => TypeMarker::Null,
            0x02 => TypeMarker::False,
            0x03 => TypeMarker::True,
            0x04 => TypeMarker::Integer,
            0x05 => TypeMarker::Double,
            0x06 => TypeMarker::String,
            0x07 => TypeMarker::XmlDoc,
            0x08 => TypeMarker::Date,
            0x09 => TypeMarker::Array,
            0x0A => TypeMarker::Object,
            0x0B => TypeMarker::Xml,
            0x0C => TypeMarker::ByteArray,
            0x0D => TypeMarker::VectorInt,
            0x0E => TypeMarker::VectorUint,
            0x0F => TypeMarker::VectorDouble,
            0x10 => TypeMarker::VectorObject,
            0x11 => TypeMarker::Dictionary,
            other => return Err(AmfError::UnknownType(other)),
        })
    }

    /// Raw marker byte
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this codec can produce and consume the marker
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            TypeMarker::XmlDoc
                | TypeMarker::Xml
                | TypeMarker::VectorInt
                | TypeMarker::VectorUint
                | TypeMarker::VectorDouble
                | TypeMarker::VectorObject
                | TypeMarker::Dictionary
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeMarker::Undefined => "undefined",
            TypeMarker::Null => "null",
            TypeMarker::False => "false",
            TypeMarker::True => "true",
            TypeMarker::Integer => "integer",
            TypeMarker::Double => "double",
            TypeMarker::String => "string",
            TypeMarker::XmlDoc => "xml-doc",
            TypeMarker::Date => "date",
            TypeMarker::Array => "array",
            TypeMarker::Object => "object",
            TypeMarker::Xml => "xml",
            TypeMarker::ByteArray => "byte-array",
            TypeMarker::VectorInt => "vector-int",
            TypeMarker::VectorUint => "vector-uint",
            TypeMarker::VectorDouble => "vector-double",
            TypeMarker::VectorObject => "vector-object",
            TypeMarker::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for TypeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.as_byte())
    }
}

impl TryFrom<u8> for TypeMarker {
    type Error = AmfError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        TypeMarker::from_byte(b)
    }
}

/// Whether an integer is written with the Integer marker rather than Double
pub fn fits_integer(value: i64) -> bool {
    (MIN_INT..=MAX_INT).contains(&value)
}

/// Pick the wire marker for a value
///
/// Integers outside `[MIN_INT, MAX_INT]` are classified as Double.
pub fn classify(value: &AmfValue) -> Result<TypeMarker, AmfError> {
    Ok(match value {
        AmfValue::Undefined => TypeMarker::Undefined,
        AmfValue::Null => TypeMarker::Null,
        AmfValue::Boolean(false) => TypeMarker::False,
        AmfValue::Boolean(true) => TypeMarker::True,
        AmfValue::Integer(i) if fits_integer(*i) => TypeMarker::Integer,
        AmfValue::Integer(_) => TypeMarker::Double,
        AmfValue::Double(_) => TypeMarker::Double,
        AmfValue::String(_) => TypeMarker::String,
        AmfValue::Date(_) => TypeMarker::Date,
        AmfValue::ByteArray(_) => TypeMarker::ByteArray,
        AmfValue::Array(_) => TypeMarker::Array,
        AmfValue::Object(_) => TypeMarker::Object,
        AmfValue::Xml(_) => return Err(AmfError::UnsupportedType(TypeMarker::Xml.to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_bytes() {
        for b in 0x00..=0x11u8 {
            let marker = TypeMarker::from_byte(b).unwrap();
            assert_eq!(marker.as_byte(), b);
        }
        assert_eq!(TypeMarker::from_byte(0x12), Err(AmfError::UnknownType(0x12)));
        assert_eq!(TypeMarker::try_from(0xFF), Err(AmfError::UnknownType(0xFF)));
    }

    #[test]
    fn test_unsupported_markers() {
        for b in [0x07u8, 0x0B, 0x0D, 0x0E, 0x0F, 0x10, 0x11] {
            assert!(!TypeMarker::from_byte(b).unwrap().is_supported());
        }
        assert!(TypeMarker::ByteArray.is_supported());
        assert!(TypeMarker::Object.is_supported());
    }

    #[test]
    fn test_classify_scalars() {
        assert_eq!(classify(&AmfValue::Undefined).unwrap(), TypeMarker::Undefined);
        assert_eq!(classify(&AmfValue::Null).unwrap(), TypeMarker::Null);
        assert_eq!(classify(&AmfValue::Boolean(true)).unwrap(), TypeMarker::True);
        assert_eq!(classify(&AmfValue::Boolean(false)).unwrap(), TypeMarker::False);
        assert_eq!(classify(&AmfValue::Double(1.5)).unwrap(), TypeMarker::Double);
        assert_eq!(classify(&"hi".into()).unwrap(), TypeMarker::String);
        assert_eq!(classify(&AmfValue::Date(0.0)).unwrap(), TypeMarker::Date);
    }

    #[test]
    fn test_classify_integer_boundary() {
        assert_eq!(classify(&AmfValue::Integer(MAX_INT)).unwrap(), TypeMarker::Integer);
        assert_eq!(classify(&AmfValue::Integer(MAX_INT + 1)).unwrap(), TypeMarker::Double);
        assert_eq!(classify(&AmfValue::Integer(MIN_INT)).unwrap(), TypeMarker::Integer);
        assert_eq!(classify(&AmfValue::Integer(MIN_INT - 1)).unwrap(), TypeMarker::Double);
    }

    #[test]
    fn test_classify_xml_fails() {
        let err = classify(&AmfValue::Xml("<a/>".into())).unwrap_err();
        assert!(matches!(err, AmfError::UnsupportedType(_)));
    }
}
