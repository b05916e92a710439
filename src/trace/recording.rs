//! In-memory tracer backend.
//!
//! [`RecordingTracerProvider`] keeps every ended span in memory so tests and
//! debugging tools can inspect exactly what the middleware produced. It does
//! no export and no sampling.

use super::{Span, TraceError, Tracer, TracerProvider};
use crate::core::{Attributes, Outcome};
use crate::span::keys;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Name and version a tracer was requested under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentationScope {
    pub name: String,
    pub version: String,
}

/// An ended span, frozen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinishedSpan {
    /// Unique span identifier
    pub id: Uuid,
    /// Span name
    pub name: String,
    /// Tracer scope the span was opened under
    pub scope: InstrumentationScope,
    /// When the span was opened
    pub started_at: DateTime<Utc>,
    /// When the span was ended
    pub ended_at: DateTime<Utc>,
    /// Monotonic time between start and end
    pub duration: Duration,
    /// Attributes as passed at start
    pub initial_attributes: Attributes,
    /// Attributes at end
    pub attributes: Attributes,
}

impl FinishedSpan {
    /// Outcome recorded at end.
    pub fn outcome(&self) -> Option<Outcome> {
        self.attributes
            .get_str(keys::OUTCOME)
            .and_then(Outcome::parse)
    }

    /// Outcome recorded at start.
    pub fn initial_outcome(&self) -> Option<Outcome> {
        self.initial_attributes
            .get_str(keys::OUTCOME)
            .and_then(Outcome::parse)
    }
}

#[derive(Default)]
struct Sink {
    spans: Mutex<Vec<FinishedSpan>>,
    requests: Mutex<Vec<InstrumentationScope>>,
    shut_down: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Tracer provider that records ended spans in memory.
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use dispatch_trace::core::Attributes;
/// use dispatch_trace::trace::recording::RecordingTracerProvider;
/// use dispatch_trace::trace::TracerProvider;
///
/// let provider = RecordingTracerProvider::new();
/// let tracer = provider.tracer("demo", "0.1.0");
///
/// let mut span = tracer.start_span("work", Attributes::new()).unwrap();
/// span.end();
///
/// assert_eq!(provider.finished_spans().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RecordingTracerProvider {
    sink: Arc<Sink>,
}

impl RecordingTracerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all spans ended so far, in end order.
    pub fn finished_spans(&self) -> Vec<FinishedSpan> {
        lock(&self.sink.spans).clone()
    }

    /// Every scope a tracer was requested under, in request order.
    pub fn tracer_requests(&self) -> Vec<InstrumentationScope> {
        lock(&self.sink.requests).clone()
    }

    /// Forget all recorded spans.
    pub fn reset(&self) {
        lock(&self.sink.spans).clear();
    }

    /// Refuse new spans from now on. Spans already open still record.
    pub fn shutdown(&self) {
        self.sink.shut_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.sink.shut_down.load(Ordering::SeqCst)
    }
}

impl TracerProvider for RecordingTracerProvider {
    fn tracer(&self, name: &str, version: &str) -> Arc<dyn Tracer> {
        let scope = InstrumentationScope {
            name: name.to_owned(),
            version: version.to_owned(),
        };
        lock(&self.sink.requests).push(scope.clone());

        Arc::new(RecordingTracer {
            scope,
            sink: Arc::clone(&self.sink),
        })
    }
}

struct RecordingTracer {
    scope: InstrumentationScope,
    sink: Arc<Sink>,
}

impl Tracer for RecordingTracer {
    fn start_span(&self, name: &str, attributes: Attributes) -> Result<Box<dyn Span>, TraceError> {
        if self.sink.shut_down.load(Ordering::SeqCst) {
            return Err(TraceError::ProviderShutdown);
        }

        Ok(Box::new(RecordingSpan {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            scope: self.scope.clone(),
            started_at: Utc::now(),
            started: Instant::now(),
            initial_attributes: attributes.clone(),
            attributes,
            sink: Arc::clone(&self.sink),
            ended: false,
        }))
    }
}

struct RecordingSpan {
    id: Uuid,
    name: String,
    scope: InstrumentationScope,
    started_at: DateTime<Utc>,
    started: Instant,
    initial_attributes: Attributes,
    attributes: Attributes,
    sink: Arc<Sink>,
    ended: bool,
}

impl Span for RecordingSpan {
    fn set_attributes(&mut self, attributes: Attributes) {
        if self.ended {
            return;
        }
        self.attributes.merge(attributes);
    }

    fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        let finished = FinishedSpan {
            id: self.id,
            name: self.name.clone(),
            scope: self.scope.clone(),
            started_at: self.started_at,
            ended_at: Utc::now(),
            duration: self.started.elapsed(),
            initial_attributes: self.initial_attributes.clone(),
            attributes: self.attributes.clone(),
        };
        lock(&self.sink.spans).push(finished);
    }

    fn is_recording(&self) -> bool {
        !self.ended
    }
}
