//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use function_router::execution::ExecutionLog;
use function_router::{FunctionConfig, FunctionServer, Shutdown, UserFunction};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One call into the execution log.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Logged {
    Started,
    Finished { elapsed_ms: u64, status: u16 },
}

/// Execution log that remembers every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    events: Arc<Mutex<Vec<Logged>>>,
}

impl RecordingLog {
    pub fn events(&self) -> Vec<Logged> {
        self.events.lock().unwrap().clone()
    }
}

impl ExecutionLog for RecordingLog {
    fn execution_started(&self) {
        self.events.lock().unwrap().push(Logged::Started);
    }

    fn execution_finished(&self, elapsed_ms: u64, status: StatusCode) {
        self.events.lock().unwrap().push(Logged::Finished {
            elapsed_ms,
            status: status.as_u16(),
        });
    }
}

/// A function server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub log: RecordingLog,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub handle: JoinHandle<Result<(), function_router::http::ServerError>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server for `function` with the given config.
pub async fn start_server(config: FunctionConfig, function: UserFunction) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let log = RecordingLog::default();
    let server = FunctionServer::with_log(config, function, Arc::new(log.clone()));
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    // Listener is already bound; give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(20)).await;

    TestServer {
        addr,
        log,
        shutdown,
        handle,
    }
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
