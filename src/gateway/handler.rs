//! Gateway handler trait
//!
//! The extension point for applications serving AMF3 requests. A request
//! body is decoded into one value, handed to the handler, and whatever the
//! handler returns is encoded as the reply.

use async_trait::async_trait;

use crate::amf::AmfValue;
use crate::error::Result;

/// Handler trait for AMF3 request/response exchanges
///
/// Arrays and objects in the request and reply are emptied once the reply
/// is written. Copy out anything that must outlive the call.
///
/// # Example
///
/// ```
/// use amf3_rs::amf::AmfValue;
/// use amf3_rs::gateway::AmfHandler;
/// use async_trait::async_trait;
///
/// struct Greeter;
///
/// #[async_trait]
/// impl AmfHandler for Greeter {
///     async fn handle(&self, request: AmfValue) -> amf3_rs::Result<AmfValue> {
///         let name = request.get_string("name").unwrap_or_default();
///         Ok(AmfValue::object([("greeting", format!("hello {}", name))]))
///     }
/// }
/// ```
#[async_trait]
pub trait AmfHandler: Send + Sync + 'static {
    /// Produce the reply value for a decoded request value
    async fn handle(&self, request: AmfValue) -> Result<AmfValue>;
}

/// Replies with the request unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl AmfHandler for EchoHandler {
    async fn handle(&self, request: AmfValue) -> Result<AmfValue> {
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_handler() {
        let request = AmfValue::object([("a", 1)]);
        let reply = EchoHandler.handle(request.clone()).await.unwrap();
        assert!(reply.same_ref(&request));
    }
}
