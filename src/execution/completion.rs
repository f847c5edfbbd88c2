//! Completion tracking.
//!
//! A drop guard is created before the handler runs and travels with the
//! response body. Whichever way the exchange ends (body fully written,
//! client gone mid-body, or the request future dropped before a response
//! exists) the guard is dropped exactly once and marks the execution
//! finished.

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::Next,
    response::Response,
};
use http_body::{Body as HttpBody, Frame, SizeHint};

/// Request-scoped "execution finished" flag.
///
/// Available from request extensions while the handler runs and from
/// response extensions afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExecutionState {
    finished: Arc<AtomicBool>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Returns true only for the call that flipped the flag.
    fn mark_finished(&self) -> bool {
        !self.finished.swap(true, Ordering::AcqRel)
    }
}

struct CompletionGuard {
    state: ExecutionState,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.state.mark_finished() {
            tracing::debug!("Response finished");
        }
    }
}

/// Response body that carries the completion guard.
struct TrackedBody {
    inner: Body,
    _guard: CompletionGuard,
}

impl HttpBody for TrackedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().inner).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Middleware attaching a completion observer to every request.
pub async fn track_completion(mut request: Request, next: Next) -> Response {
    let state = ExecutionState::new();
    let guard = CompletionGuard {
        state: state.clone(),
    };
    request.extensions_mut().insert(state.clone());

    // If this future is dropped here, `guard` goes with it.
    let mut response = next.run(request).await;

    response.extensions_mut().insert(state);
    response.map(|inner| {
        Body::new(TrackedBody {
            inner,
            _guard: guard,
        })
    })
}
