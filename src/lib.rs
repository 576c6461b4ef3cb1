//! amf3-rs: AMF3 encoder and decoder
//!
//! This library provides an AMF3 (Action Message Format 3) codec supporting:
//! - Every AMF3 value type except XML, dictionaries and vectors
//! - String and complex-value reference tables, including cyclic graphs
//! - Typed objects through a class registry and class name mapping
//! - Lenient decoding of unknown classes as named records
//! - A small async TCP gateway for AMF3 request/response exchanges
//!
//! # Example: Round Trip
//!
//! ```
//! use amf3_rs::amf::AmfValue;
//!
//! let value = AmfValue::object([("name", AmfValue::from("alice")), ("age", AmfValue::from(30))]);
//! let bytes = amf3_rs::encode(&value).unwrap();
//! let decoded = amf3_rs::decode(&bytes).unwrap();
//! assert_eq!(decoded, value);
//! ```
//!
//! # Example: Self-Referencing Object
//!
//! ```
//! use amf3_rs::amf::AmfValue;
//!
//! let node = AmfValue::object([("name", AmfValue::from("root"))]);
//! if let AmfValue::Object(obj) = &node {
//!     obj.write().set_field("self", node.clone()).unwrap();
//! }
//!
//! let decoded = amf3_rs::decode(&amf3_rs::encode(&node).unwrap()).unwrap();
//! let inner = decoded.get("self").unwrap();
//! assert!(inner.same_ref(&decoded));
//! ```

pub mod amf;
pub mod config;
pub mod error;
pub mod gateway;

// Re-export main types for convenience
pub use amf::{decode, decode_all, encode, encode_all, encode_as, Amf3Decoder, Amf3Encoder, AmfValue};
pub use config::CodecConfig;
pub use error::{AmfError, Error, Result};
pub use gateway::{AmfHandler, EchoHandler, Gateway, GatewayConfig};
