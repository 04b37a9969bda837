#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::SubscriberExt;
use xkit_http::{ErrorReporter, ResponseWriter, SinkError, WriteError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "data")]
pub struct Message {
    pub name: String,
}

pub fn anyone() -> Message {
    Message {
        name: "anyone".to_owned(),
    }
}

/// Sink that records what the writers did and can be told to misbehave.
#[derive(Default)]
pub struct TracedResponseWriter {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub code: Option<StatusCode>,
    pub less_written: bool,
    pub timeout: bool,
    pub fail_with: Option<String>,
}

impl TracedResponseWriter {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_owned()),
            ..Self::default()
        }
    }

    pub fn timing_out() -> Self {
        Self {
            timeout: true,
            ..Self::default()
        }
    }

    pub fn less_written() -> Self {
        Self {
            less_written: true,
            ..Self::default()
        }
    }

    pub fn body_string(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

impl ResponseWriter for TracedResponseWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.code.is_none() {
            self.code = Some(status);
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, SinkError> {
        if self.timeout {
            return Err(SinkError::HandlerTimeout);
        }
        if let Some(msg) = &self.fail_with {
            return Err(SinkError::Io(std::io::Error::other(msg.clone())));
        }

        self.body.extend_from_slice(buf);
        if self.less_written {
            Ok(buf.len() - 1)
        } else {
            Ok(buf.len())
        }
    }
}

/// Reporter that keeps every reported failure.
#[derive(Default)]
pub struct RecordingReporter(RefCell<Vec<String>>);

impl RecordingReporter {
    pub fn reported(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, err: &WriteError) {
        self.0.borrow_mut().push(err.to_string());
    }
}

/// Layer capturing `error`-level events as `"<message> | <error field>"`.
#[derive(Clone, Default)]
pub struct ErrorCapture {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl ErrorCapture {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            let mut visitor = EventVisitor::default();
            event.record(&mut visitor);
            self.events
                .lock()
                .unwrap()
                .push(format!("{} | {}", visitor.message, visitor.error));
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    error: String,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "error" => self.error = format!("{value:?}"),
            _ => {}
        }
    }
}

/// Run `f` under a subscriber that captures error events.
pub fn capture_errors(f: impl FnOnce()) -> Vec<String> {
    let capture = ErrorCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture.events()
}
