//! User function variants.
//!
//! A served function is one of a small closed set of calling conventions.
//! Constructors erase the concrete closure type once, at registration, so
//! nothing about the function is inspected again per request.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::sync::oneshot;
use tower::BoxError;

use crate::adapters::cloud_event::CloudEvent;
use crate::adapters::event::EventContext;

/// Outcome of an event-style function: an optional JSON result or an error.
pub type FunctionResult = Result<Option<Value>, BoxError>;

/// Type-erased HTTP function.
pub type HttpFunction =
    Arc<dyn Fn(Request) -> BoxFuture<'static, Result<Response, BoxError>> + Send + Sync>;

/// Type-erased two-argument event function.
pub type EventFunction =
    Arc<dyn Fn(Value, EventContext) -> BoxFuture<'static, FunctionResult> + Send + Sync>;

/// Type-erased three-argument event function.
pub type CallbackEventFunction = Arc<dyn Fn(Value, EventContext, EventCallback) + Send + Sync>;

/// Type-erased cloud-event function.
pub type CloudEventFunction =
    Arc<dyn Fn(CloudEvent) -> BoxFuture<'static, FunctionResult> + Send + Sync>;

/// A user-supplied function in one of the supported calling conventions.
#[derive(Clone)]
pub enum UserFunction {
    /// `(request) -> response`
    Http(HttpFunction),
    /// `(data, context) -> result`
    Event(EventFunction),
    /// `(data, context, callback)`, completing through the callback.
    EventWithCallback(CallbackEventFunction),
    /// `(cloud_event) -> result`
    CloudEvent(CloudEventFunction),
}

impl UserFunction {
    /// Wrap an async HTTP handler.
    pub fn http<F, Fut, R, E>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: IntoResponse,
        E: Into<BoxError>,
    {
        UserFunction::Http(Arc::new(move |request: Request| {
            let fut = f(request);
            Box::pin(async move {
                fut.await
                    .map(IntoResponse::into_response)
                    .map_err(Into::into)
            })
        }))
    }

    /// Wrap a two-argument event handler.
    pub fn event<F, Fut, E>(f: F) -> Self
    where
        F: Fn(Value, EventContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        UserFunction::Event(Arc::new(move |data, context| {
            let fut = f(data, context);
            Box::pin(async move { fut.await.map_err(Into::into) })
        }))
    }

    /// Wrap a three-argument event handler that reports completion via callback.
    pub fn event_with_callback<F>(f: F) -> Self
    where
        F: Fn(Value, EventContext, EventCallback) + Send + Sync + 'static,
    {
        UserFunction::EventWithCallback(Arc::new(f))
    }

    /// Wrap a cloud-event handler.
    pub fn cloud_event<F, Fut, E>(f: F) -> Self
    where
        F: Fn(CloudEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        UserFunction::CloudEvent(Arc::new(move |event| {
            let fut = f(event);
            Box::pin(async move { fut.await.map_err(Into::into) })
        }))
    }

    /// Short name of the calling convention, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            UserFunction::Http(_) => "http",
            UserFunction::Event(_) => "event",
            UserFunction::EventWithCallback(_) => "event-callback",
            UserFunction::CloudEvent(_) => "cloudevent",
        }
    }
}

impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserFunction").field(&self.kind()).finish()
    }
}

/// Completion callback handed to three-argument event functions.
///
/// Consumed on use, so a function can complete at most once. Dropping it
/// without calling it fails the invocation.
pub struct EventCallback {
    tx: oneshot::Sender<FunctionResult>,
}

impl EventCallback {
    pub(crate) fn new() -> (Self, oneshot::Receiver<FunctionResult>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Complete the invocation with the given outcome.
    pub fn done(self, result: FunctionResult) {
        // Receiver is gone only if the request was aborted.
        let _ = self.tx.send(result);
    }

    /// Complete successfully, optionally with a JSON result.
    pub fn succeed(self, value: Option<Value>) {
        self.done(Ok(value));
    }

    /// Complete with an error.
    pub fn fail(self, error: impl Into<BoxError>) {
        self.done(Err(error.into()));
    }
}

impl fmt::Debug for EventCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCallback").finish_non_exhaustive()
    }
}
