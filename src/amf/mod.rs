//! AMF3 (Action Message Format 3) implementation
//!
//! AMF3 is Adobe's binary serialization format for ActionScript 3.0
//! values. This module provides the value model, the U29 integer codec,
//! the per-call reference tables, and the encoder/decoder pair.
//!
//! Arrays and objects are shared handles, so a value graph may contain
//! cycles. The reference tables write each container once and refer back
//! to it afterwards, which keeps cyclic graphs finite on the wire.

pub mod amf3;
pub mod class;
pub mod marker;
pub mod reference;
pub mod u29;
pub mod value;

pub use amf3::{decode, decode_all, encode, encode_all, encode_as, Amf3Decoder, Amf3Encoder};
pub use class::{
    ClassFactory, ClassMapper, ClassObject, ClassRegistry, Exportable, Reconstructible,
    GENERIC_TYPE_NAME,
};
pub use marker::{TypeMarker, MAX_INT, MIN_INT};
pub use reference::{ReferenceKind, ReferenceTable};
pub use value::{AmfArray, AmfObject, AmfValue, ArrayRef, FieldMap, ObjectRef, Record, Shared};
