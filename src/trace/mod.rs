//! The tracer capability consumed by the middleware.
//!
//! The middleware never stores or exports spans itself. It asks a
//! [`Tracer`] to open a span, writes attributes onto it and ends it. What
//! happens to the span afterwards (batching, sampling, export) is up to the
//! backend behind the trait.
//!
//! # Key Concepts
//!
//! - **TracerProvider**: hands out named, versioned tracers
//! - **Tracer**: opens spans
//! - **Span**: a mutable record that becomes immutable once ended
//! - **Global registry**: a process-wide default provider, see [`global`]
//!
//! Two backends ship with the crate: the in-memory
//! [`RecordingTracerProvider`](recording::RecordingTracerProvider), and with
//! the `opentelemetry` feature (on by default) an adapter over any
//! OpenTelemetry tracer provider in `otel`.

pub mod global;
#[cfg(feature = "opentelemetry")]
pub mod otel;
pub mod recording;

use crate::core::Attributes;
use std::sync::Arc;
use thiserror::Error;

/// Errors a tracer backend may report when opening a span.
///
/// These never reach callers of the middleware; the span helper swallows
/// them and continues without a span.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TraceError {
    #[error("Tracer provider has been shut down")]
    ProviderShutdown,

    #[error("Failed to start span: {0}")]
    SpanStart(String),
}

/// A single unit of traced work.
///
/// Implementations must ignore attribute writes after [`end`](Span::end)
/// and treat a repeated `end` as a no-op.
pub trait Span: Send {
    /// Merge `attributes` into the span. Later writes win.
    fn set_attributes(&mut self, attributes: Attributes);

    /// Close the span and hand it to the backend.
    fn end(&mut self);

    /// Whether the span still accepts attributes.
    fn is_recording(&self) -> bool;
}

/// Opens spans.
pub trait Tracer: Send + Sync {
    fn start_span(&self, name: &str, attributes: Attributes) -> Result<Box<dyn Span>, TraceError>;
}

/// Hands out tracers scoped to an instrumentation name and version.
pub trait TracerProvider: Send + Sync {
    fn tracer(&self, name: &str, version: &str) -> Arc<dyn Tracer>;
}

/// Instrumentation name reported when requesting a tracer.
pub const INSTRUMENTATION_NAME: &str = env!("CARGO_PKG_NAME");

/// Instrumentation version reported when requesting a tracer.
pub const INSTRUMENTATION_VERSION: &str = env!("CARGO_PKG_VERSION");
