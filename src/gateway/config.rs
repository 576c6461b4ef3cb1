//! Gateway configuration

use std::net::SocketAddr;

use crate::config::CodecConfig;
use crate::error::{Error, Result};

/// MIME type of AMF request and reply bodies
pub const CONTENT_TYPE: &str = "application/x-amf";

/// Default port for the TCP gateway
pub const DEFAULT_PORT: u16 = 8088;

/// Gateway configuration options
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Largest request body accepted, in bytes
    pub max_body_size: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Codec settings used for every request and reply
    pub codec: CodecConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_body_size: 16 * 1024 * 1024, // 16MB
            tcp_nodelay: true,
            codec: CodecConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set codec configuration
    pub fn codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_body_size == 0 {
            return Err(Error::Config("max_body_size must be positive".into()));
        }
        self.codec.validate()
    }
}
