//! AMF3 echo gateway
//!
//! Run with: cargo run --example echo_server
//!
//! Every connection sends one AMF3 value and shuts down its write half.
//! The server replies with the same value, re-encoded, then closes.

use async_trait::async_trait;
use amf3_rs::amf::AmfValue;
use amf3_rs::{AmfHandler, CodecConfig, Gateway, GatewayConfig};

/// Echoes requests back and logs a short description of each
struct LoggingEcho;

#[async_trait]
impl AmfHandler for LoggingEcho {
    async fn handle(&self, request: AmfValue) -> amf3_rs::Result<AmfValue> {
        tracing::info!(request = %request.describe(), "Echoing request");
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("amf3_rs=debug".parse()?)
                .add_directive("echo_server=debug".parse()?),
        )
        .init();

    let config = GatewayConfig::default().codec(CodecConfig::lenient().class_mapping(true));
    println!("Starting AMF3 echo gateway on {}", config.bind_addr);

    let gateway = Gateway::new(config, LoggingEcho);

    // Run with Ctrl+C handling
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        println!("\nShutting down...");
    };
    if let Err(e) = gateway.run_until(shutdown).await {
        eprintln!("Gateway error: {}", e);
    }

    Ok(())
}
