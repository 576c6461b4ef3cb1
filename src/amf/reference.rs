//! Per-call reference tables
//!
//! AMF3 keeps two tables while a value is being encoded or decoded: one for
//! strings and one for complex values (arrays, objects, dates and byte
//! arrays). The first appearance of a value is written inline and takes the
//! next index; later appearances are written as that index. Encoder and
//! decoder must assign indices in exactly the same order.
//!
//! Arrays and objects are matched by identity and registered before their
//! members are visited, so a container reached again from inside itself
//! resolves to its own index instead of recursing.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use crate::error::AmfError;
use super::value::AmfValue;

/// Which table a reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    String,
    Complex,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::String => write!(f, "string"),
            ReferenceKind::Complex => write!(f, "complex"),
        }
    }
}

/// Lookup key for complex values on the encode side
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ComplexKey {
    Container(usize),
    Date(u64),
    Bytes(Bytes),
}

impl ComplexKey {
    fn of(value: &AmfValue) -> Option<Self> {
        match value {
            AmfValue::Array(a) => Some(ComplexKey::Container(a.id())),
            AmfValue::Object(o) => Some(ComplexKey::Container(o.id())),
            AmfValue::Date(ms) => Some(ComplexKey::Date(ms.to_bits())),
            AmfValue::ByteArray(b) => Some(ComplexKey::Bytes(b.clone())),
            _ => None,
        }
    }
}

/// String and complex-value reference tables for one encode or decode call
#[derive(Debug, Default)]
pub struct ReferenceTable {
    strings: Vec<String>,
    string_index: HashMap<String, usize>,
    complex: Vec<AmfValue>,
    complex_index: HashMap<ComplexKey, usize>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of a previously registered equal value, or register
    /// `value` at the next index and return `None`.
    ///
    /// Null, undefined, empty strings and values that do not belong to
    /// `kind` are never registered and never match.
    pub fn get_reference(&mut self, value: &AmfValue, kind: ReferenceKind) -> Option<usize> {
        match (kind, value) {
            (ReferenceKind::String, AmfValue::String(s)) => self.string_reference(s),
            (ReferenceKind::Complex, _) => self.complex_reference(value),
            _ => None,
        }
    }

    /// Encode-side string lookup-or-register
    pub fn string_reference(&mut self, s: &str) -> Option<usize> {
        if s.is_empty() {
            return None;
        }
        if let Some(&index) = self.string_index.get(s) {
            return Some(index);
        }
        self.register_string(s.to_string());
        None
    }

    /// Encode-side complex lookup-or-register
    pub fn complex_reference(&mut self, value: &AmfValue) -> Option<usize> {
        let key = ComplexKey::of(value)?;
        if let Some(&index) = self.complex_index.get(&key) {
            return Some(index);
        }
        let index = self.complex.len();
        self.complex.push(value.clone());
        self.complex_index.insert(key, index);
        None
    }

    /// Decode-side registration of an inline string. Always takes a new
    /// index, even if an equal string is already present.
    pub fn register_string(&mut self, s: String) {
        if s.is_empty() {
            return;
        }
        let index = self.strings.len();
        self.string_index.entry(s.clone()).or_insert(index);
        self.strings.push(s);
    }

    /// Decode-side registration of an inline complex value, returning its index
    pub fn register_complex(&mut self, value: AmfValue) -> Option<usize> {
        let key = ComplexKey::of(&value)?;
        let index = self.complex.len();
        self.complex_index.entry(key).or_insert(index);
        self.complex.push(value);
        Some(index)
    }

    /// Resolve a back-reference read from the wire
    pub fn get_by_reference(&self, index: usize, kind: ReferenceKind) -> Result<AmfValue, AmfError> {
        match kind {
            ReferenceKind::String => self.string_by_reference(index).map(AmfValue::String),
            ReferenceKind::Complex => self
                .complex
                .get(index)
                .cloned()
                .ok_or(AmfError::InvalidReference { kind, index }),
        }
    }

    pub fn string_by_reference(&self, index: usize) -> Result<String, AmfError> {
        self.strings
            .get(index)
            .cloned()
            .ok_or(AmfError::InvalidReference {
                kind: ReferenceKind::String,
                index,
            })
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    pub fn complex_count(&self) -> usize {
        self.complex.len()
    }

    /// Drop every registration (start of a new top-level call)
    pub fn clear(&mut self) {
        self.strings.clear();
        self.string_index.clear();
        self.complex.clear();
        self.complex_index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_dedup_order() {
        let mut table = ReferenceTable::new();
        assert_eq!(table.string_reference("a"), None);
        assert_eq!(table.string_reference("b"), None);
        assert_eq!(table.string_reference("a"), Some(0));
        assert_eq!(table.string_reference("b"), Some(1));
        assert_eq!(table.string_count(), 2);
    }

    #[test]
    fn test_empty_and_null_never_registered() {
        let mut table = ReferenceTable::new();
        assert_eq!(table.string_reference(""), None);
        assert_eq!(table.string_reference(""), None);
        assert_eq!(table.get_reference(&AmfValue::Null, ReferenceKind::Complex), None);
        assert_eq!(table.get_reference(&AmfValue::Undefined, ReferenceKind::String), None);
        assert_eq!(table.get_reference(&AmfValue::Null, ReferenceKind::Complex), None);
        table.register_string(String::new());
        assert_eq!(table.string_count(), 0);
        assert_eq!(table.complex_count(), 0);
    }

    #[test]
    fn test_containers_match_by_identity() {
        let mut table = ReferenceTable::new();
        let a = AmfValue::object([("x", 1)]);
        let b = AmfValue::object([("x", 1)]);

        assert_eq!(table.get_reference(&a, ReferenceKind::Complex), None);
        assert_eq!(table.get_reference(&b, ReferenceKind::Complex), None);
        assert_eq!(table.get_reference(&a.clone(), ReferenceKind::Complex), Some(0));
        assert_eq!(table.get_reference(&b, ReferenceKind::Complex), Some(1));
    }

    #[test]
    fn test_dates_and_bytes_match_by_value() {
        let mut table = ReferenceTable::new();
        let date = AmfValue::Date(1_700_000_000_000.0);
        let bytes = AmfValue::ByteArray(Bytes::from_static(b"\x01\x02"));

        assert_eq!(table.complex_reference(&date), None);
        assert_eq!(table.complex_reference(&bytes), None);
        assert_eq!(table.complex_reference(&AmfValue::Date(1_700_000_000_000.0)), Some(0));
        assert_eq!(
            table.complex_reference(&AmfValue::ByteArray(Bytes::from_static(b"\x01\x02"))),
            Some(1)
        );
    }

    #[test]
    fn test_string_kind_ignores_complex_values() {
        let mut table = ReferenceTable::new();
        let date = AmfValue::Date(5.0);
        assert_eq!(table.get_reference(&date, ReferenceKind::String), None);
        assert_eq!(table.complex_count(), 0);
    }

    #[test]
    fn test_decode_side_registration() {
        let mut table = ReferenceTable::new();
        table.register_string("dup".into());
        table.register_string("dup".into());
        assert_eq!(table.string_count(), 2);
        assert_eq!(table.string_by_reference(1).unwrap(), "dup");

        let index = table.register_complex(AmfValue::Date(1.0)).unwrap();
        assert_eq!(index, 0);
        assert_eq!(table.register_complex(AmfValue::Null), None);
        assert_eq!(
            table.get_by_reference(0, ReferenceKind::Complex).unwrap(),
            AmfValue::Date(1.0)
        );
    }

    #[test]
    fn test_invalid_reference() {
        let table = ReferenceTable::new();
        assert_eq!(
            table.get_by_reference(3, ReferenceKind::String),
            Err(AmfError::InvalidReference {
                kind: ReferenceKind::String,
                index: 3
            })
        );
        assert_eq!(
            table.get_by_reference(0, ReferenceKind::Complex),
            Err(AmfError::InvalidReference {
                kind: ReferenceKind::Complex,
                index: 0
            })
        );
    }

    #[test]
    fn test_clear() {
        let mut table = ReferenceTable::new();
        table.string_reference("x");
        table.complex_reference(&AmfValue::Date(1.0));
        table.clear();
        assert_eq!(table.string_count(), 0);
        assert_eq!(table.complex_count(), 0);
        assert_eq!(table.string_reference("x"), None);
    }
}
