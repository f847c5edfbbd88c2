//! Function router binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                  FUNCTION ROUTER                      │
//!                  │                                                       │
//!   HTTP request   │  ┌──────────┐   ┌───────────┐   ┌─────────────────┐  │
//!  ────────────────┼─▶│  server  │──▶│  routing  │──▶│ completion      │  │
//!                  │  │ (layers) │   │ noise 404 │   │ tracker (http)  │  │
//!                  │  └──────────┘   │ catch-all │   └────────┬────────┘  │
//!                  │                 └───────────┘            ▼           │
//!                  │                                 ┌─────────────────┐  │
//!                  │                                 │    executor     │  │
//!                  │                                 │ timing policy + │  │
//!                  │                                 │   log sink      │  │
//!                  │                                 └────────┬────────┘  │
//!                  │                                          ▼           │
//!   HTTP response  │                                 ┌─────────────────┐  │
//!  ◀───────────────┼─────────────────────────────────│ normalized      │  │
//!                  │                                 │ handler         │  │
//!                  │                                 │ http | event |  │  │
//!                  │                                 │ cloudevent      │  │
//!                  │                                 └─────────────────┘  │
//!                  └──────────────────────────────────────────────────────┘
//! ```
//!
//! The binary serves a built-in echo function for the configured signature
//! type. Applications embed the library and pass their own `UserFunction`.

use std::path::PathBuf;

use axum::extract::Request;
use clap::Parser;
use serde_json::json;
use tower::BoxError;

use function_router::config::{load_config, FunctionConfig};
use function_router::lifecycle::{wait_for_signal, Shutdown};
use function_router::observability::{logging, metrics};
use function_router::{FunctionServer, SignatureType, UserFunction};

#[derive(Parser)]
#[command(name = "function-router")]
#[command(about = "Serve a function over HTTP with execution instrumentation", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides listener.bind_address port).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Signature type of the served function: http, event or cloudevent.
    #[arg(short, long)]
    signature_type: Option<SignatureType>,
}

fn echo_function(signature: SignatureType) -> UserFunction {
    match signature {
        SignatureType::Http => UserFunction::http(|request: Request| async move {
            let method = request.method().to_string();
            let path = request.uri().path().to_string();
            let body = axum::body::to_bytes(request.into_body(), usize::MAX).await?;
            Ok::<_, BoxError>(axum::Json(json!({
                "method": method,
                "path": path,
                "body": String::from_utf8_lossy(&body),
            })))
        }),
        SignatureType::Event => UserFunction::event(|data, context| async move {
            Ok::<_, BoxError>(Some(json!({ "data": data, "context": context })))
        }),
        SignatureType::CloudEvent => UserFunction::cloud_event(|event| async move {
            Ok::<_, BoxError>(Some(serde_json::to_value(event)?))
        }),
    }
}

fn apply_overrides(mut config: FunctionConfig, cli: &Cli) -> FunctionConfig {
    if let Some(port) = cli.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }
    if let Some(signature) = cli.signature_type {
        config.signature_type = signature;
    }
    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FunctionConfig::default(),
    };
    let config = apply_overrides(config, &cli);

    logging::init_logging(&config.observability);
    tracing::info!("function-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        signature_type = %config.signature_type,
        timing_enabled = config.timing.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let function = echo_function(config.signature_type);
    let server = FunctionServer::new(config, function);
    let listener = server.bind().await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
