//! Route table construction.
//!
//! # Responsibilities
//! - Answer crawler noise paths with an empty 404 before user code (HTTP only)
//! - Bind the catch-all route to the instrumented executor
//! - Layer the completion tracker onto the catch-all (HTTP only)
//!
//! # Design Decisions
//! - HTTP functions accept every method; event functions accept only POST
//! - Static noise paths outrank the `/{*path}` wildcard in axum's matcher,
//!   so they are intercepted whatever the catch-all accepts
//! - The route table is built once and never mutated while serving

use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    routing::{any, post, MethodRouter},
    Router,
};

use crate::execution::{track_completion, Executor, Instrumentation};
use crate::function::{normalize, SignatureType, UserFunction};

/// Paths browsers and crawlers request on their own.
pub const SUPPRESSED_PATHS: [&str; 2] = ["/favicon.ico", "/robots.txt"];

/// Register the function's routes on `app`.
///
/// Call once per application, before serving. `app` must not already bind
/// `/` or `/{*path}`.
///
/// Event and cloud-event routes read the whole request body without a cap
/// of their own. `FunctionServer` adds a `RequestBodyLimitLayer`; apps that
/// mount these routes directly must layer their own limit.
pub fn register_routes(
    app: Router,
    function: UserFunction,
    signature: SignatureType,
    instrumentation: Instrumentation,
) -> Router {
    let executor = Arc::new(Executor::new(normalize(function, signature), instrumentation));
    let invoke = move |request: Request| {
        let executor = Arc::clone(&executor);
        async move { executor.execute(request).await }
    };

    tracing::debug!(signature_type = %signature, "Registering function routes");

    match signature {
        SignatureType::Http => {
            let catch_all = catch_all(any(invoke))
                .route_layer(middleware::from_fn(track_completion));

            SUPPRESSED_PATHS
                .iter()
                .fold(app, |app, path| app.route(path, any(not_found)))
                .merge(catch_all)
        }
        SignatureType::Event | SignatureType::CloudEvent => app.merge(catch_all(post(invoke))),
    }
}

fn catch_all(method_router: MethodRouter) -> Router {
    Router::new()
        .route("/", method_router.clone())
        .route("/{*path}", method_router)
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::log::testing::{LogEvent, RecordingLog};
    use crate::execution::{ExecutionState, HostSuppression};
    use axum::body::Body;
    use axum::http::Method;
    use axum::response::IntoResponse;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::{BoxError, ServiceExt};

    fn instrumentation(log: &RecordingLog) -> Instrumentation {
        Instrumentation::new(
            Arc::new(HostSuppression::managed_platform()),
            Arc::new(log.clone()),
        )
    }

    fn counting_http(calls: Arc<AtomicUsize>) -> UserFunction {
        UserFunction::http(move |request: Request| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let tracked = request.extensions().get::<ExecutionState>().is_some();
                Ok::<_, BoxError>(format!("{} {} tracked={}", request.method(), request.uri().path(), tracked))
            }
        })
    }

    fn counting_event(calls: Arc<AtomicUsize>) -> UserFunction {
        UserFunction::event(move |data, _ctx| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(Some(data))
            }
        })
    }

    fn counting_cloud_event(calls: Arc<AtomicUsize>) -> UserFunction {
        UserFunction::cloud_event(move |_event| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<Option<Value>, BoxError>(None)
            }
        })
    }

    fn request(method: Method, path: &str, body: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost")
            .header("ce-id", "1")
            .header("ce-source", "/test")
            .header("ce-type", "test.event")
            .header("ce-specversion", "1.0")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_http_suppresses_noise_paths() {
        let calls = Arc::new(AtomicUsize::new(0));
        let log = RecordingLog::default();
        let app = register_routes(
            Router::new(),
            counting_http(calls.clone()),
            SignatureType::Http,
            instrumentation(&log),
        );

        for path in SUPPRESSED_PATHS {
            for method in [Method::GET, Method::POST] {
                let response = app.clone().oneshot(request(method, path, "")).await.unwrap();
                assert_eq!(response.status(), StatusCode::NOT_FOUND);
                assert!(body_string(response).await.is_empty());
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(log.events().is_empty(), "noise paths are not executions");
    }

    #[tokio::test]
    async fn test_http_accepts_every_method_and_path() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = register_routes(
            Router::new(),
            counting_http(calls.clone()),
            SignatureType::Http,
            instrumentation(&RecordingLog::default()),
        );

        let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH];
        for method in methods.clone() {
            for path in ["/", "/orders/17", "/favicon.ico.bak", "/static/robots.txt"] {
                let response = app
                    .clone()
                    .oneshot(request(method.clone(), path, ""))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                let body = body_string(response).await;
                assert_eq!(body, format!("{} {} tracked=true", method, path));
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), methods.len() * 4);
    }

    #[tokio::test]
    async fn test_event_types_accept_post_only() {
        for signature in [SignatureType::Event, SignatureType::CloudEvent] {
            let calls = Arc::new(AtomicUsize::new(0));
            let function = match signature {
                SignatureType::Event => counting_event(calls.clone()),
                _ => counting_cloud_event(calls.clone()),
            };
            let app = register_routes(
                Router::new(),
                function,
                signature,
                instrumentation(&RecordingLog::default()),
            );

            for method in [Method::GET, Method::PUT, Method::DELETE] {
                let response = app
                    .clone()
                    .oneshot(request(method, "/topic", r#"{"data": 1}"#))
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            }
            assert_eq!(calls.load(Ordering::SeqCst), 0);

            let response = app
                .clone()
                .oneshot(request(Method::POST, "/topic", r#"{"data": 1}"#))
                .await
                .unwrap();
            assert!(response.status().is_success(), "{}: {}", signature, response.status());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_event_types_do_not_suppress_noise_paths() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = register_routes(
            Router::new(),
            counting_event(calls.clone()),
            SignatureType::Event,
            instrumentation(&RecordingLog::default()),
        );

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/favicon.ico", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = app
            .oneshot(request(Method::POST, "/robots.txt", r#"{"data": null}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_event_routes_are_not_completion_tracked() {
        let app = register_routes(
            Router::new(),
            counting_event(Arc::new(AtomicUsize::new(0))),
            SignatureType::Event,
            instrumentation(&RecordingLog::default()),
        );
        let response = app
            .oneshot(request(Method::POST, "/", r#"{"data": 2}"#))
            .await
            .unwrap();
        assert!(response.extensions().get::<ExecutionState>().is_none());
    }

    #[tokio::test]
    async fn test_independent_route_tables() {
        let first_log = RecordingLog::default();
        let second_log = RecordingLog::default();
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));

        let first = register_routes(
            Router::new(),
            counting_http(first_calls.clone()),
            SignatureType::Http,
            instrumentation(&first_log),
        );
        let _second = register_routes(
            Router::new(),
            counting_http(second_calls.clone()),
            SignatureType::Http,
            instrumentation(&second_log),
        );

        first.oneshot(request(Method::GET, "/", "")).await.unwrap();

        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(first_log.events().len(), 2);
        assert!(second_log.events().is_empty());
    }

    #[tokio::test]
    async fn test_existing_routes_are_kept() {
        let app = Router::new().route(
            "/healthz",
            axum::routing::get(|| async { "ok".into_response() }),
        );
        let app = register_routes(
            app,
            counting_http(Arc::new(AtomicUsize::new(0))),
            SignatureType::Http,
            instrumentation(&RecordingLog::default()),
        );
        let response = app.oneshot(request(Method::GET, "/healthz", "")).await.unwrap();
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_finished_log_carries_status() {
        let log = RecordingLog::default();
        let function = UserFunction::http(|_request: Request| async {
            Ok::<_, BoxError>(StatusCode::CREATED)
        });
        let app = register_routes(Router::new(), function, SignatureType::Http, instrumentation(&log));
        app.oneshot(request(Method::POST, "/", "")).await.unwrap();

        match log.events().as_slice() {
            [LogEvent::Started, LogEvent::Finished { status, .. }] => {
                assert_eq!(*status, StatusCode::CREATED)
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_event_routes_honor_outer_body_limit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = register_routes(
            Router::new(),
            counting_event(calls.clone()),
            SignatureType::Event,
            instrumentation(&RecordingLog::default()),
        )
        .layer(tower_http::limit::RequestBodyLimitLayer::new(8));

        let response = app
            .oneshot(request(Method::POST, "/", r#"{"data": "well past eight bytes"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
