//! AMF3 encoder and decoder
//!
//! AMF3 is the ActionScript 3.0 revision of the Action Message Format. It
//! adds a compact variable-length integer (U29), a real Integer type, and
//! reference tables that let repeated strings and complex values be written
//! once and referred to by index afterwards.
//!
//! Wire layout of the complex types written by this encoder:
//! ```text
//! String    : U29 (len << 1 | 1) + UTF-8 bytes      | U29 (index << 1)
//! Date      : U29 (1) + double (ms since epoch)     | U29 (index << 1)
//! ByteArray : U29 (len << 1 | 1) + raw bytes        | U29 (index << 1)
//! Array     : U29 (dense_len << 1 | 1)
//!             + (key, value)* + empty string
//!             + value{dense_len}                    | U29 (index << 1)
//! Object    : U29 (0b1011) + class name
//!             + (name, value)* + empty string       | U29 (index << 1)
//! ```
//!
//! Keys, member names and class names are written inline and never enter
//! the string table. Only dynamic object members are emitted; the decoder
//! also accepts inline traits carrying sealed members.

use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::config::CodecConfig;
use crate::error::{self, AmfError, Error};
use super::class::{populate, ClassMapper, ClassRegistry, GENERIC_TYPE_NAME};
use super::marker::{classify, fits_integer, TypeMarker, DYNAMIC_TRAITS, INLINE_BIT, MAX_U29};
use super::reference::{ReferenceKind, ReferenceTable};
use super::u29::{read_i29, read_u29, write_i29, write_u29};
use super::value::{AmfArray, AmfObject, AmfValue, FieldMap, Record, Shared};

/// Trait header bit: traits are inline rather than a trait reference
const TRAITS_INLINE: u32 = 0b0010;

/// Trait header bit: object is externalizable
const TRAITS_EXTERNALIZABLE: u32 = 0b0100;

/// Trait header bit: object carries dynamic members
const TRAITS_DYNAMIC: u32 = 0b1000;

/// An empty string, which terminates associative and dynamic sections
const EMPTY_STRING: u8 = 0x01;

/// Largest length or index that fits a U29 header next to its flag bit
const MAX_HEADER_VALUE: usize = (MAX_U29 >> 1) as usize;

/// AMF3 encoder
///
/// Each [`encode`](Amf3Encoder::encode) call starts from empty reference
/// tables; only the values of one [`encode_all`](Amf3Encoder::encode_all)
/// call share them. Output accumulates until
/// [`finish`](Amf3Encoder::finish). Any error resets the encoder,
/// discarding partial output.
pub struct Amf3Encoder {
    buf: BytesMut,
    references: ReferenceTable,
    config: CodecConfig,
    class_mapper: Option<ClassMapper>,
    depth: usize,
}

impl Amf3Encoder {
    /// Create a new encoder with default settings
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create encoder with explicit configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.initial_capacity),
            references: ReferenceTable::new(),
            config,
            class_mapper: None,
            depth: 0,
        }
    }

    /// Install the type name to wire class name mapping
    pub fn with_class_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.class_mapper = Some(Arc::new(mapper));
        self
    }

    pub fn set_class_mapper(&mut self, mapper: Option<ClassMapper>) {
        self.class_mapper = mapper;
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Get the encoded bytes and reset encoder
    pub fn finish(&mut self) -> Bytes {
        self.references.clear();
        self.depth = 0;
        self.buf.split().freeze()
    }

    /// Discard output and reference state
    pub fn reset(&mut self) {
        self.buf.clear();
        self.references.clear();
        self.depth = 0;
    }

    /// Get current encoded length
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if encoder is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Encode a single AMF3 value with its type marker
    pub fn encode(&mut self, value: &AmfValue) -> Result<(), AmfError> {
        self.encode_with(value, true, None)
    }

    /// Encode multiple values as one message sharing a reference table
    pub fn encode_all(&mut self, values: &[AmfValue]) -> Result<(), AmfError> {
        self.session(|encoder| {
            values
                .iter()
                .try_for_each(|value| encoder.encode_value(value, true, None))
        })
    }

    /// Encode a value, optionally forcing its wire type and optionally
    /// leaving out the marker byte
    pub fn encode_with(
        &mut self,
        value: &AmfValue,
        include_marker: bool,
        forced: Option<TypeMarker>,
    ) -> Result<(), AmfError> {
        self.session(|encoder| encoder.encode_value(value, include_marker, forced))
    }

    /// Run one top-level call against fresh reference tables
    fn session<F>(&mut self, f: F) -> Result<(), AmfError>
    where
        F: FnOnce(&mut Self) -> Result<(), AmfError>,
    {
        self.references.clear();
        let result = f(self);
        if result.is_err() {
            self.reset();
        }
        self.references.clear();
        result
    }

    fn encode_value(
        &mut self,
        value: &AmfValue,
        include_marker: bool,
        forced: Option<TypeMarker>,
    ) -> Result<(), AmfError> {
        self.depth += 1;
        let result = if self.depth > self.config.max_depth {
            Err(AmfError::DepthExceeded(self.config.max_depth))
        } else {
            self.write_value(value, include_marker, forced)
        };
        self.depth -= 1;
        result
    }

    fn write_value(
        &mut self,
        value: &AmfValue,
        include_marker: bool,
        forced: Option<TypeMarker>,
    ) -> Result<(), AmfError> {
        let marker = match forced {
            Some(marker) => marker,
            None => classify(value)?,
        };
        if !marker.is_supported() {
            return Err(AmfError::UnsupportedType(marker.to_string()));
        }

        match (marker, value) {
            (TypeMarker::Undefined, AmfValue::Undefined)
            | (TypeMarker::Null, AmfValue::Null)
            | (TypeMarker::False, AmfValue::Boolean(false))
            | (TypeMarker::True, AmfValue::Boolean(true)) => {
                self.put_marker(include_marker, marker);
                Ok(())
            }
            (TypeMarker::Integer, AmfValue::Integer(i)) => self.write_integer(*i, include_marker),
            (TypeMarker::Integer, AmfValue::Double(d)) if d.is_infinite() => {
                Err(AmfError::IntegerOutOfRange(if *d > 0.0 { i64::MAX } else { i64::MIN }))
            }
            (TypeMarker::Integer, AmfValue::Double(d)) if d.fract() == 0.0 && d.is_finite() => {
                if d.abs() > i64::MAX as f64 {
                    return Err(AmfError::IntegerOutOfRange(i64::MAX));
                }
                self.write_integer(*d as i64, include_marker)
            }
            (TypeMarker::Double, AmfValue::Integer(i)) => {
                self.put_marker(include_marker, marker);
                self.buf.put_f64(*i as f64);
                Ok(())
            }
            (TypeMarker::Double, AmfValue::Double(d)) => {
                self.put_marker(include_marker, marker);
                self.buf.put_f64(*d);
                Ok(())
            }
            (TypeMarker::String, AmfValue::String(s)) => {
                self.put_marker(include_marker, marker);
                self.write_string(s)
            }
            (TypeMarker::Date, AmfValue::Date(ms)) => {
                self.put_marker(include_marker, marker);
                self.write_date(value, *ms)
            }
            (TypeMarker::ByteArray, AmfValue::ByteArray(bytes)) => {
                self.put_marker(include_marker, marker);
                self.write_byte_array(value, bytes)
            }
            (TypeMarker::ByteArray, other) => Err(AmfError::InvalidPayload(format!(
                "byte array data required, found {}",
                other.describe()
            ))),
            (TypeMarker::Array, AmfValue::Array(array)) => {
                self.put_marker(include_marker, marker);
                self.write_array(value, array)
            }
            (TypeMarker::Object, AmfValue::Object(object)) => {
                self.put_marker(include_marker, marker);
                self.write_object(value, object)
            }
            (marker, other) => Err(AmfError::UnsupportedType(format!(
                "{} as {}",
                other.describe(),
                marker
            ))),
        }
    }

    fn put_marker(&mut self, include_marker: bool, marker: TypeMarker) {
        if include_marker {
            self.buf.put_u8(marker.as_byte());
        }
    }

    fn write_integer(&mut self, value: i64, include_marker: bool) -> Result<(), AmfError> {
        if !fits_integer(value) {
            return Err(AmfError::IntegerOutOfRange(value));
        }
        self.put_marker(include_marker, TypeMarker::Integer);
        write_i29(&mut self.buf, value)
    }

    /// Length or count header with the inline bit set
    fn write_inline_header(&mut self, len: usize) -> Result<(), AmfError> {
        if len > MAX_HEADER_VALUE {
            return Err(AmfError::IntegerOutOfRange(len as i64));
        }
        write_u29(&mut self.buf, ((len as u32) << 1) | INLINE_BIT)
    }

    fn write_reference(&mut self, index: usize) -> Result<(), AmfError> {
        if index > MAX_HEADER_VALUE {
            return Err(AmfError::IntegerOutOfRange(index as i64));
        }
        write_u29(&mut self.buf, (index as u32) << 1)
    }

    fn write_string(&mut self, s: &str) -> Result<(), AmfError> {
        if let Some(index) = self.references.string_reference(s) {
            return self.write_reference(index);
        }
        self.write_plain_string(s)
    }

    /// Inline string that bypasses the string table (keys, member and class names)
    fn write_plain_string(&mut self, s: &str) -> Result<(), AmfError> {
        self.write_inline_header(s.len())?;
        self.buf.put_slice(s.as_bytes());
        Ok(())
    }

    fn write_member_name(&mut self, name: &str) -> Result<(), AmfError> {
        if name.is_empty() {
            return Err(AmfError::InvalidPayload(
                "empty member name cannot be encoded".into(),
            ));
        }
        self.write_plain_string(name)
    }

    fn write_date(&mut self, value: &AmfValue, ms: f64) -> Result<(), AmfError> {
        if let Some(index) = self.references.complex_reference(value) {
            return self.write_reference(index);
        }
        write_u29(&mut self.buf, INLINE_BIT)?;
        self.buf.put_f64(ms);
        Ok(())
    }

    fn write_byte_array(&mut self, value: &AmfValue, bytes: &Bytes) -> Result<(), AmfError> {
        if let Some(index) = self.references.complex_reference(value) {
            return self.write_reference(index);
        }
        self.write_inline_header(bytes.len())?;
        self.buf.put_slice(bytes);
        Ok(())
    }

    fn write_array(
        &mut self,
        value: &AmfValue,
        array: &Shared<AmfArray>,
    ) -> Result<(), AmfError> {
        // Registered before the elements are visited, so the array can contain itself
        if let Some(index) = self.references.complex_reference(value) {
            return self.write_reference(index);
        }

        let array = array.read();
        self.write_inline_header(array.dense.len())?;

        for (key, element) in array.assoc.iter() {
            self.write_member_name(key)?;
            self.encode_value(element, true, None)?;
        }
        self.buf.put_u8(EMPTY_STRING);

        for element in &array.dense {
            self.encode_value(element, true, None)?;
        }
        Ok(())
    }

    fn write_object(
        &mut self,
        value: &AmfValue,
        object: &Shared<AmfObject>,
    ) -> Result<(), AmfError> {
        if let Some(index) = self.references.complex_reference(value) {
            return self.write_reference(index);
        }

        let (class_name, members) = {
            let object = object.read();
            (self.wire_class_name(&object), object.members())
        };

        write_u29(&mut self.buf, DYNAMIC_TRAITS)?;
        self.write_plain_string(&class_name)?;

        for (name, member) in members.iter() {
            self.write_member_name(name)?;
            self.encode_value(member, true, None)?;
        }
        self.buf.put_u8(EMPTY_STRING);
        Ok(())
    }

    /// Class name written for an object; empty unless class mapping is on
    fn wire_class_name(&self, object: &AmfObject) -> String {
        if !self.config.class_mapping {
            return String::new();
        }

        let name = match object {
            AmfObject::Record(record) => record.class_name.clone(),
            AmfObject::Typed(typed) => match &self.class_mapper {
                Some(mapper) => mapper(typed.type_name()),
                None => typed.type_name().to_string(),
            },
        };

        if name == GENERIC_TYPE_NAME {
            String::new()
        } else {
            name
        }
    }
}

impl Default for Amf3Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// AMF3 decoder
///
/// Each `decode` call resolves references against its own tables, which
/// are emptied again when the call returns; only the values of one
/// [`decode_all`](Amf3Decoder::decode_all) call share them.
pub struct Amf3Decoder {
    references: ReferenceTable,
    config: CodecConfig,
    registry: ClassRegistry,
    depth: usize,
}

impl Amf3Decoder {
    /// Create a new decoder with default settings
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Create decoder with explicit configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            references: ReferenceTable::new(),
            config,
            registry: ClassRegistry::new(),
            depth: 0,
        }
    }

    /// Use `registry` to resolve wire class names
    pub fn with_registry(mut self, registry: ClassRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Reset decoder state
    pub fn reset(&mut self) {
        self.references.clear();
        self.depth = 0;
    }

    /// Decode a single AMF3 value from the buffer
    pub fn decode(&mut self, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        self.session(|decoder| decoder.read_value(buf))
    }

    /// Decode the payload of a value whose marker is known out of band
    pub fn decode_payload(
        &mut self,
        marker: TypeMarker,
        buf: &mut Bytes,
    ) -> Result<AmfValue, AmfError> {
        self.session(|decoder| decoder.decode_marked(marker.as_byte(), buf))
    }

    /// Decode all values from buffer until exhausted, as one message
    /// sharing a reference table
    pub fn decode_all(&mut self, buf: &mut Bytes) -> Result<Vec<AmfValue>, AmfError> {
        self.session(|decoder| {
            let mut values = Vec::new();
            while buf.has_remaining() {
                values.push(decoder.read_value(buf)?);
            }
            Ok(values)
        })
    }

    /// Run one top-level call against fresh reference tables
    fn session<T, F>(&mut self, f: F) -> Result<T, AmfError>
    where
        F: FnOnce(&mut Self) -> Result<T, AmfError>,
    {
        self.reset();
        let result = f(self);
        self.reset();
        result
    }

    /// Read a marker and its value against the current tables
    fn read_value(&mut self, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        if buf.is_empty() {
            return Err(AmfError::BufferUnderrun);
        }
        let marker = buf.get_u8();
        self.decode_marked(marker, buf)
    }

    fn decode_marked(&mut self, marker: u8, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        self.depth += 1;
        let result = if self.depth > self.config.max_depth {
            Err(AmfError::DepthExceeded(self.config.max_depth))
        } else {
            self.decode_value(marker, buf)
        };
        self.depth -= 1;
        result
    }

    fn decode_value(&mut self, marker: u8, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        let marker = TypeMarker::from_byte(marker)?;

        match marker {
            TypeMarker::Undefined => Ok(AmfValue::Undefined),
            TypeMarker::Null => Ok(AmfValue::Null),
            TypeMarker::False => Ok(AmfValue::Boolean(false)),
            TypeMarker::True => Ok(AmfValue::Boolean(true)),
            TypeMarker::Integer => Ok(AmfValue::Integer(read_i29(buf)? as i64)),
            TypeMarker::Double => Ok(AmfValue::Double(self.read_double(buf)?)),
            TypeMarker::String => Ok(AmfValue::String(self.read_string(buf)?)),
            TypeMarker::Date => self.decode_date(buf),
            TypeMarker::ByteArray => self.decode_byte_array(buf),
            TypeMarker::Array => self.decode_array(buf),
            TypeMarker::Object => self.decode_object(buf),
            unsupported => {
                tracing::debug!(marker = %unsupported, "Rejected unsupported AMF3 marker");
                Err(AmfError::UnsupportedType(unsupported.to_string()))
            }
        }
    }

    fn read_double(&mut self, buf: &mut Bytes) -> Result<f64, AmfError> {
        if buf.remaining() < 8 {
            return Err(AmfError::BufferUnderrun);
        }
        Ok(buf.get_f64())
    }

    /// Read a string value, registering inline strings
    fn read_string(&mut self, buf: &mut Bytes) -> Result<String, AmfError> {
        let header = read_u29(buf)?;
        if header & INLINE_BIT == 0 {
            return self.references.string_by_reference((header >> 1) as usize);
        }

        let s = self.read_utf8(buf, (header >> 1) as usize)?;
        self.references.register_string(s.clone());
        Ok(s)
    }

    /// Read a key, member or class name; inline names are not registered
    fn read_plain_string(&mut self, buf: &mut Bytes) -> Result<String, AmfError> {
        let header = read_u29(buf)?;
        if header & INLINE_BIT == 0 {
            return self.references.string_by_reference((header >> 1) as usize);
        }
        self.read_utf8(buf, (header >> 1) as usize)
    }

    fn read_utf8(&mut self, buf: &mut Bytes, len: usize) -> Result<String, AmfError> {
        if buf.remaining() < len {
            return Err(AmfError::BufferUnderrun);
        }

        let bytes = buf.copy_to_bytes(len);
        String::from_utf8(bytes.to_vec()).map_err(|_| AmfError::InvalidUtf8)
    }

    /// Resolve a complex back-reference, checking it points at the expected kind
    fn resolve_complex(&self, header: u32, expected: TypeMarker) -> Result<AmfValue, AmfError> {
        let index = (header >> 1) as usize;
        let value = self.references.get_by_reference(index, ReferenceKind::Complex)?;

        let matches = matches!(
            (expected, &value),
            (TypeMarker::Date, AmfValue::Date(_))
                | (TypeMarker::ByteArray, AmfValue::ByteArray(_))
                | (TypeMarker::Array, AmfValue::Array(_))
                | (TypeMarker::Object, AmfValue::Object(_))
        );
        if !matches {
            return Err(AmfError::InvalidReference {
                kind: ReferenceKind::Complex,
                index,
            });
        }
        Ok(value)
    }

    fn decode_date(&mut self, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        let header = read_u29(buf)?;
        if header & INLINE_BIT == 0 {
            return self.resolve_complex(header, TypeMarker::Date);
        }

        let date = AmfValue::Date(self.read_double(buf)?);
        self.references.register_complex(date.clone());
        Ok(date)
    }

    fn decode_byte_array(&mut self, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        let header = read_u29(buf)?;
        if header & INLINE_BIT == 0 {
            return self.resolve_complex(header, TypeMarker::ByteArray);
        }

        let len = (header >> 1) as usize;
        if buf.remaining() < len {
            return Err(AmfError::BufferUnderrun);
        }

        let bytes = AmfValue::ByteArray(buf.copy_to_bytes(len));
        self.references.register_complex(bytes.clone());
        Ok(bytes)
    }

    fn decode_array(&mut self, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        let header = read_u29(buf)?;
        if header & INLINE_BIT == 0 {
            return self.resolve_complex(header, TypeMarker::Array);
        }
        let dense_len = (header >> 1) as usize;

        // Register the empty container before any element can refer to it.
        // Contents are filled in only on success, so a failed decode never
        // leaves a self-referencing container behind.
        let handle = Shared::new(AmfArray::new());
        let array = AmfValue::Array(handle.clone());
        self.references.register_complex(array.clone());

        let mut contents = AmfArray::new();
        loop {
            let key = self.read_plain_string(buf)?;
            if key.is_empty() {
                break;
            }
            let element = self.read_value(buf)?;
            contents.insert(key, element);
        }

        // Every element takes at least its marker byte
        if buf.remaining() < dense_len {
            return Err(AmfError::BufferUnderrun);
        }
        contents.dense.reserve(dense_len.min(1024));
        for _ in 0..dense_len {
            contents.dense.push(self.read_value(buf)?);
        }

        handle.replace(contents);
        Ok(array)
    }

    fn decode_object(&mut self, buf: &mut Bytes) -> Result<AmfValue, AmfError> {
        let header = read_u29(buf)?;
        if header & INLINE_BIT == 0 {
            return self.resolve_complex(header, TypeMarker::Object);
        }
        if header & TRAITS_INLINE == 0 {
            return Err(AmfError::UnsupportedType("object trait reference".into()));
        }
        if header & TRAITS_EXTERNALIZABLE != 0 {
            return Err(AmfError::UnsupportedType("externalizable object".into()));
        }
        let dynamic = header & TRAITS_DYNAMIC != 0;
        let sealed_count = (header >> 4) as usize;

        let class_name = self.read_plain_string(buf)?;

        // Placeholder, replaced by the real instance once all fields are read
        let handle = Shared::new(AmfObject::Record(Record::new(class_name.clone())));
        let object = AmfValue::Object(handle.clone());
        self.references.register_complex(object.clone());

        if buf.remaining() < sealed_count {
            return Err(AmfError::BufferUnderrun);
        }
        let mut sealed_names = Vec::with_capacity(sealed_count.min(1024));
        for _ in 0..sealed_count {
            sealed_names.push(self.read_plain_string(buf)?);
        }

        let mut fields = FieldMap::new();
        for name in sealed_names {
            let value = self.read_value(buf)?;
            fields.insert(name, value);
        }

        if dynamic {
            loop {
                let name = self.read_plain_string(buf)?;
                if name.is_empty() {
                    break;
                }
                let value = self.read_value(buf)?;
                fields.insert(name, value);
            }
        }

        let instance = self.instantiate(&class_name, fields)?;
        handle.replace(instance);
        Ok(object)
    }

    /// Build the target object for a decoded class name and field map
    fn instantiate(&self, class_name: &str, fields: FieldMap) -> Result<AmfObject, AmfError> {
        if class_name.is_empty() {
            return Ok(AmfObject::Record(Record::with_fields("", fields)));
        }

        match self.registry.create(class_name) {
            Some(mut instance) => {
                populate(instance.as_mut(), class_name, fields)?;
                Ok(AmfObject::Typed(instance))
            }
            None if self.config.allow_unregistered_classes => {
                tracing::debug!(class_name = %class_name, "Unregistered class, decoding as record");
                Ok(AmfObject::Record(Record::with_fields(class_name, fields)))
            }
            None => Err(AmfError::ClassNotFound(class_name.to_string())),
        }
    }
}

impl Default for Amf3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to encode a single value
pub fn encode(value: &AmfValue) -> error::Result<Bytes> {
    let mut encoder = Amf3Encoder::new();
    encoder.encode(value).map_err(|source| encode_error(source, value))?;
    let out = encoder.finish();
    tracing::trace!(bytes = out.len(), "Encoded AMF3 value");
    Ok(out)
}

/// Convenience function to encode a single value with a forced wire type
pub fn encode_as(value: &AmfValue, marker: TypeMarker) -> error::Result<Bytes> {
    let mut encoder = Amf3Encoder::new();
    encoder
        .encode_with(value, true, Some(marker))
        .map_err(|source| encode_error(source, value))?;
    Ok(encoder.finish())
}

/// Convenience function to encode multiple values sharing one reference table
pub fn encode_all(values: &[AmfValue]) -> error::Result<Bytes> {
    let mut encoder = Amf3Encoder::new();
    encoder
        .encode_all(values)
        .map_err(|source| encode_error(source, &AmfValue::array(values.to_vec())))?;
    let out = encoder.finish();
    tracing::trace!(bytes = out.len(), count = values.len(), "Encoded AMF3 values");
    Ok(out)
}

/// Convenience function to decode a single value
pub fn decode(data: &[u8]) -> error::Result<AmfValue> {
    let input = Bytes::copy_from_slice(data);
    let mut buf = input.clone();
    let mut decoder = Amf3Decoder::new();
    decoder
        .decode(&mut buf)
        .map_err(|source| decode_error(source, &input, &buf))
}

/// Convenience function to decode all values
pub fn decode_all(data: &[u8]) -> error::Result<Vec<AmfValue>> {
    let input = Bytes::copy_from_slice(data);
    let mut buf = input.clone();
    let mut decoder = Amf3Decoder::new();
    decoder
        .decode_all(&mut buf)
        .map_err(|source| decode_error(source, &input, &buf))
}

pub(crate) fn encode_error(source: AmfError, value: &AmfValue) -> Error {
    tracing::debug!(error = %source, value = %value.describe(), "AMF3 encode failed");
    Error::Encode {
        source,
        value: Box::new(value.clone()),
    }
}

pub(crate) fn decode_error(source: AmfError, input: &Bytes, rest: &Bytes) -> Error {
    let position = input.len() - rest.remaining();
    tracing::debug!(error = %source, position = position, "AMF3 decode failed");
    Error::Decode {
        source,
        position,
        input: input.clone(),
    }
}
