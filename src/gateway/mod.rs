//! TCP gateway serving AMF3 request/response exchanges
//!
//! Each connection carries one request body of type
//! [`CONTENT_TYPE`](config::CONTENT_TYPE). The body is decoded, passed to
//! an [`AmfHandler`], and the handler's return value is encoded back.

pub mod config;
pub mod handler;
pub mod server;

pub use config::{GatewayConfig, CONTENT_TYPE, DEFAULT_PORT};
pub use handler::{AmfHandler, EchoHandler};
pub use server::Gateway;
