//! AMF gateway
//!
//! Serves one AMF3 request per connection: the peer writes the request
//! body and shuts down its write half, the gateway decodes it, runs the
//! handler, writes the encoded reply and closes the connection.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::{Buf, Bytes};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::amf::amf3::{decode_error, encode_error};
use crate::amf::{Amf3Decoder, Amf3Encoder, AmfValue, ClassMapper, ClassRegistry};
use crate::error::{AmfError, Error, Result};
use super::config::GatewayConfig;
use super::handler::AmfHandler;

/// AMF3 request/response gateway
pub struct Gateway<H: AmfHandler> {
    config: GatewayConfig,
    handler: Arc<H>,
    registry: Arc<ClassRegistry>,
    class_mapper: Option<ClassMapper>,
}

impl<H: AmfHandler> Gateway<H> {
    /// Create a new gateway with the given configuration and handler
    pub fn new(config: GatewayConfig, handler: H) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
            registry: Arc::new(ClassRegistry::new()),
            class_mapper: None,
        }
    }

    /// Classes available when decoding requests
    pub fn with_registry(mut self, registry: ClassRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Class name mapping used when encoding replies
    pub fn with_class_mapper(mut self, mapper: ClassMapper) -> Self {
        self.class_mapper = Some(mapper);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Decode a request body, run the handler and encode its reply
    ///
    /// The body must hold exactly one value. Once the reply is encoded, the
    /// request and reply graphs are torn down with
    /// [`break_cycles`](AmfValue::break_cycles), so cyclic input cannot
    /// outlive the exchange.
    pub async fn process(&self, body: &[u8]) -> Result<Bytes> {
        let input = Bytes::copy_from_slice(body);
        let mut buf = input.clone();

        let mut decoder =
            Amf3Decoder::with_config(self.config.codec.clone()).with_registry((*self.registry).clone());
        let request = decoder
            .decode(&mut buf)
            .map_err(|source| decode_error(source, &input, &buf))?;

        if buf.has_remaining() {
            request.break_cycles();
            let source =
                AmfError::InvalidPayload(format!("{} trailing bytes after request", buf.remaining()));
            return Err(decode_error(source, &input, &buf));
        }

        let retained = request.clone();
        let result = match self.handler.handle(request).await {
            Ok(reply) => {
                let encoded = self.encode_reply(&reply);
                reply.break_cycles();
                encoded
            }
            Err(e) => Err(e),
        };
        retained.break_cycles();
        result
    }

    fn encode_reply(&self, reply: &AmfValue) -> Result<Bytes> {
        let mut encoder = Amf3Encoder::with_config(self.config.codec.clone());
        encoder.set_class_mapper(self.class_mapper.clone());
        encoder
            .encode(reply)
            .map_err(|source| encode_error(source, reply))?;
        Ok(encoder.finish())
    }

    /// Read a whole request body from `reader`, process it and write the
    /// reply to `writer`. Returns the number of reply bytes written.
    pub async fn serve_stream<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<usize>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let limit = self.config.max_body_size;
        let mut body = Vec::new();
        (&mut *reader)
            .take(limit as u64 + 1)
            .read_to_end(&mut body)
            .await?;

        if body.len() > limit {
            return Err(Error::Amf(AmfError::InvalidPayload(format!(
                "request body exceeds {} bytes",
                limit
            ))));
        }

        let reply = self.process(&body).await?;
        writer.write_all(&reply).await?;
        writer.flush().await?;
        Ok(reply.len())
    }

    /// Run the gateway
    ///
    /// This method blocks until the gateway is shut down.
    pub async fn run(&self) -> Result<()> {
        self.config.validate()?;
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "AMF gateway listening");
        self.serve(listener).await
    }

    /// Run the gateway with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        self.config.validate()?;
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "AMF gateway listening");

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.serve(listener) => result,
        }
    }

    /// Accept connections from an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => self.handle_connection(socket, peer_addr),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        tracing::debug!(peer = %peer_addr, "New connection");

        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::error!(error = %e, "Failed to configure socket");
                return;
            }
        }

        let gateway = self.clone();
        tokio::spawn(async move {
            let (mut reader, mut writer) = socket.into_split();
            match gateway.serve_stream(&mut reader, &mut writer).await {
                Ok(written) => {
                    tracing::debug!(peer = %peer_addr, bytes = written, "Reply sent");
                }
                Err(e) => {
                    tracing::warn!(peer = %peer_addr, error = %e, "AMF request failed");
                }
            }
            let _ = writer.shutdown().await;
        });
    }
}

impl<H: AmfHandler> Clone for Gateway<H> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            handler: Arc::clone(&self.handler),
            registry: Arc::clone(&self.registry),
            class_mapper: self.class_mapper.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, RwLock, Weak};

    use async_trait::async_trait;
    use tokio::io::duplex;

    use crate::amf::{self, AmfObject};
    use crate::gateway::EchoHandler;

    /// Keeps a non-owning handle to the last request object it saw
    #[derive(Default)]
    struct Watcher {
        seen: Mutex<Option<Weak<RwLock<AmfObject>>>>,
    }

    #[async_trait]
    impl AmfHandler for Watcher {
        async fn handle(&self, request: AmfValue) -> Result<AmfValue> {
            if let Some(object) = request.as_object() {
                *self.seen.lock().unwrap() = Some(object.downgrade());
            }
            Ok(request)
        }
    }

    struct Doubler;

    #[async_trait]
    impl AmfHandler for Doubler {
        async fn handle(&self, request: AmfValue) -> Result<AmfValue> {
            match request.as_i64() {
                Some(n) => Ok(AmfValue::Integer(n * 2)),
                None => Err(Error::Handler("expected a number".into())),
            }
        }
    }

    #[tokio::test]
    async fn test_process_echo() {
        let gateway = Gateway::new(GatewayConfig::default(), EchoHandler);
        let request = amf::encode(&AmfValue::object([("msg", "hello"), ("again", "hello")])).unwrap();

        let reply = gateway.process(&request).await.unwrap();
        assert_eq!(reply, request);
    }

    #[tokio::test]
    async fn test_process_errors() {
        let gateway = Gateway::new(GatewayConfig::default(), Doubler);

        let reply = gateway.process(&[0x04, 0x05]).await.unwrap();
        assert_eq!(&reply[..], &[0x04, 0x0A]);

        let err = gateway.process(&[0x06]).await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));

        let err = gateway.process(&[0x01]).await.unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
    }

    #[tokio::test]
    async fn test_cyclic_request_released() {
        let gateway = Gateway::new(GatewayConfig::default(), Watcher::default());
        // anonymous object whose "self" member refers back to it
        let body = [0x0A, 0x0B, 0x01, 0x09, b's', b'e', b'l', b'f', 0x0A, 0x00, 0x01];

        let reply = gateway.process(&body).await.unwrap();
        assert_eq!(&reply[..], &body[..]);

        let seen = gateway.handler.seen.lock().unwrap().take().unwrap();
        assert_eq!(seen.strong_count(), 0);
    }

    #[tokio::test]
    async fn test_trailing_bytes_rejected() {
        let gateway = Gateway::new(GatewayConfig::default(), EchoHandler);

        let err = gateway.process(&[0x04, 0x01, 0x01]).await.unwrap_err();
        assert!(matches!(err.amf(), Some(AmfError::InvalidPayload(_))));
        if let Error::Decode { position, .. } = err {
            assert_eq!(position, 2);
        } else {
            panic!("Expected decode error");
        }
    }

    #[tokio::test]
    async fn test_serve_stream() {
        let gateway = Gateway::new(GatewayConfig::default(), Doubler);
        let (mut client, mut server) = duplex(1024);

        client.write_all(&[0x04, 0x15]).await.unwrap();
        client.shutdown().await.unwrap();

        let (mut reader, mut writer) = tokio::io::split(&mut server);
        let written = gateway.serve_stream(&mut reader, &mut writer).await.unwrap();
        assert_eq!(written, 2);
        drop((reader, writer));
        drop(server);

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert_eq!(reply, vec![0x04, 0x2A]);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let gateway = Gateway::new(GatewayConfig::default().max_body_size(4), EchoHandler);
        let mut body: &[u8] = &[0x06, 0x0B, b'h', b'e', b'l', b'l', b'o'];
        let mut sink = Vec::new();

        let err = gateway.serve_stream(&mut body, &mut sink).await.unwrap_err();
        assert!(matches!(err.amf(), Some(AmfError::InvalidPayload(_))));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_tcp_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let gateway = Gateway::new(GatewayConfig::with_addr(addr), EchoHandler);
        tokio::spawn(async move {
            let _ = gateway.serve(listener).await;
        });

        let request = amf::encode(&AmfValue::array(vec![1, 2, 3])).unwrap();
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(&request).await.unwrap();
        stream.shutdown().await.unwrap();

        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.unwrap();
        assert_eq!(amf::decode(&reply).unwrap(), AmfValue::array(vec![1, 2, 3]));
    }
}
