//! Error reporting for writer failures that are logged rather than returned

use http::HeaderMap;
use tracing::Span;

use crate::error::WriteError;

/// Receives writer failures that cannot be returned to the caller.
pub trait ErrorReporter {
    fn report(&self, err: &WriteError);
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for &R {
    fn report(&self, err: &WriteError) {
        (**self).report(err);
    }
}

/// Logs through the process-global `tracing` dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalReporter;

impl ErrorReporter for GlobalReporter {
    fn report(&self, err: &WriteError) {
        tracing::error!(error = %err, "failed to write response");
    }
}

/// Per-request logging context.
///
/// Failures reported through it are emitted as children of the request
/// span and tagged with the request's trace id when one is known.
#[derive(Debug, Clone)]
pub struct RequestContext {
    span: Span,
    trace_id: Option<String>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(Span::none())
    }
}

impl RequestContext {
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            span,
            trace_id: None,
        }
    }

    /// Bind to the span the caller is currently in.
    #[must_use]
    pub fn current() -> Self {
        Self::new(Span::current())
    }

    /// Bind to the current span and pick up the trace id from the request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            span: Span::current(),
            trace_id: extract_trace_id(headers),
        }
    }

    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn span(&self) -> &Span {
        &self.span
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl ErrorReporter for RequestContext {
    fn report(&self, err: &WriteError) {
        if self.span.is_disabled() {
            tracing::error!(trace_id = self.trace_id(), error = %err, "failed to write response");
        } else {
            tracing::error!(
                parent: &self.span,
                trace_id = self.trace_id(),
                error = %err,
                "failed to write response"
            );
        }
    }
}

/// Extract a trace id from the common tracing headers, first match wins:
/// `x-trace-id`, `x-request-id`, `traceparent`.
#[must_use]
pub fn extract_trace_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-trace-id")
        .or_else(|| headers.get("x-request-id"))
        .or_else(|| headers.get("traceparent"))
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn trace_id_header_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert("traceparent", HeaderValue::from_static("00-abc-def-01"));
        assert_eq!(extract_trace_id(&headers).as_deref(), Some("00-abc-def-01"));

        headers.insert("x-request-id", HeaderValue::from_static("req-1"));
        assert_eq!(extract_trace_id(&headers).as_deref(), Some("req-1"));

        headers.insert("x-trace-id", HeaderValue::from_static("trace-1"));
        assert_eq!(extract_trace_id(&headers).as_deref(), Some("trace-1"));
    }

    #[test]
    fn no_trace_headers() {
        let ctx = RequestContext::from_headers(&HeaderMap::new());
        assert_eq!(ctx.trace_id(), None);
    }

    #[test]
    fn explicit_trace_id() {
        let ctx = RequestContext::default().with_trace_id("t-42");
        assert_eq!(ctx.trace_id(), Some("t-42"));
        assert!(ctx.span().is_disabled());
    }
}
