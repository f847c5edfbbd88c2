//! Handler normalization.
//!
//! Every calling convention is reduced to one shape: an async function from
//! an axum request to a response or an [`InvocationError`]. The normalized
//! handler is built once per route table and cloned into each route.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::adapters::{cloud_event, event};
use crate::error::InvocationError;
use crate::function::{SignatureType, UserFunction};

type BoxedHandler =
    Arc<dyn Fn(Request) -> BoxFuture<'static, Result<Response, InvocationError>> + Send + Sync>;

/// A handler in the canonical request → response shape.
#[derive(Clone)]
pub struct NormalizedHandler {
    inner: BoxedHandler,
}

impl NormalizedHandler {
    /// Build a normalized handler from any async request handler.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, InvocationError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |request| Box::pin(f(request))),
        }
    }

    /// Invoke the handler for one request.
    pub fn call(&self, request: Request) -> BoxFuture<'static, Result<Response, InvocationError>> {
        (self.inner)(request)
    }
}

impl fmt::Debug for NormalizedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedHandler").finish_non_exhaustive()
    }
}

/// Reduce a user function to the canonical handler shape for `signature`.
///
/// No validation happens here. A function whose calling convention does not
/// belong to the declared signature type yields a handler that fails every
/// invocation with [`InvocationError::SignatureMismatch`].
pub fn normalize(function: UserFunction, signature: SignatureType) -> NormalizedHandler {
    match (signature, function) {
        (SignatureType::Http, UserFunction::Http(f)) => NormalizedHandler::new(move |request| {
            let fut = f(request);
            async move { fut.await.map_err(InvocationError::Function) }
        }),
        (SignatureType::Event, UserFunction::Event(f)) => event::adapt(f),
        (SignatureType::Event, UserFunction::EventWithCallback(f)) => event::adapt_callback(f),
        (SignatureType::CloudEvent, UserFunction::CloudEvent(f)) => cloud_event::adapt(f),
        (declared, other) => {
            let provided = other.kind();
            tracing::warn!(
                signature_type = %declared,
                function_kind = provided,
                "Function does not match declared signature type; invocations will fail"
            );
            NormalizedHandler::new(move |_request| async move {
                Err(InvocationError::SignatureMismatch { declared, provided })
            })
        }
    }
}
