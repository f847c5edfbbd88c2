//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the route table for the user function
//! - Wire up middleware (tracing, request ID, body limit)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::FunctionConfig;
use crate::execution::{timing, ExecutionLog, Instrumentation, TracingExecutionLog};
use crate::function::UserFunction;
use crate::http::request::MakeExecutionId;
use crate::routing::register_routes;

/// Errors from binding or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// HTTP server for one user function.
pub struct FunctionServer {
    router: Router,
    config: FunctionConfig,
}

impl FunctionServer {
    /// Create a server logging executions through `tracing`.
    pub fn new(config: FunctionConfig, function: UserFunction) -> Self {
        Self::with_log(config, function, Arc::new(TracingExecutionLog))
    }

    /// Create a server with a custom execution log sink.
    pub fn with_log(
        config: FunctionConfig,
        function: UserFunction,
        log: Arc<dyn ExecutionLog>,
    ) -> Self {
        let instrumentation =
            Instrumentation::new(timing::policy_from_config(&config.timing), log);
        let routes = register_routes(
            Router::new(),
            function,
            config.signature_type,
            instrumentation,
        );
        let router = Self::apply_layers(&config, routes);
        Self { router, config }
    }

    /// Layers run outermost-last: request ID is assigned before tracing sees the request.
    fn apply_layers(config: &FunctionConfig, routes: Router) -> Router {
        routes
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeExecutionId))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = &self.config.listener.bind_address;
        TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            signature_type = %self.config.signature_type,
            "Function server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("Function server stopped");
        Ok(())
    }
}
