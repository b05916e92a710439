//! OpenTelemetry backend.
//!
//! [`OtelTracerProvider`] wraps any [`opentelemetry::trace::TracerProvider`]
//! (an SDK provider, or the OpenTelemetry global one) so the middleware's
//! spans flow into the regular OpenTelemetry export pipeline.
//!
//! # Example
//!
//! ```rust
//! use dispatch_trace::tracing_middleware;
//! use dispatch_trace::trace::otel::OtelTracerProvider;
//! use std::sync::Arc;
//!
//! let sdk = opentelemetry::global::tracer_provider();
//! let middleware = tracing_middleware(Some(Arc::new(OtelTracerProvider::new(sdk))), None);
//! assert!(!middleware.is_activated());
//! ```

use super::{Span, TraceError, Tracer, TracerProvider};
use crate::core::{AttributeValue, Attributes};
use opentelemetry::trace::{
    Span as OtelSpanApi, Tracer as OtelTracerApi, TracerProvider as OtelTracerProviderApi,
};
use opentelemetry::{InstrumentationScope, KeyValue, Value};
use std::sync::Arc;

/// Adapts an OpenTelemetry tracer provider.
#[derive(Clone, Debug)]
pub struct OtelTracerProvider<P> {
    provider: P,
}

impl<P> OtelTracerProvider<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn inner(&self) -> &P {
        &self.provider
    }
}

impl<P> TracerProvider for OtelTracerProvider<P>
where
    P: OtelTracerProviderApi + Send + Sync,
    P::Tracer: Send + Sync + 'static,
    <P::Tracer as OtelTracerApi>::Span: Send + 'static,
{
    fn tracer(&self, name: &str, version: &str) -> Arc<dyn Tracer> {
        let scope = InstrumentationScope::builder(name.to_owned())
            .with_version(version.to_owned())
            .build();

        Arc::new(OtelTracer {
            tracer: self.provider.tracer_with_scope(scope),
        })
    }
}

/// Tracer backed by the OpenTelemetry global provider.
pub fn global_tracer(name: &str, version: &str) -> Arc<dyn Tracer> {
    OtelTracerProvider::new(opentelemetry::global::tracer_provider()).tracer(name, version)
}

struct OtelTracer<T> {
    tracer: T,
}

impl<T> Tracer for OtelTracer<T>
where
    T: OtelTracerApi + Send + Sync,
    T::Span: Send + 'static,
{
    fn start_span(&self, name: &str, attributes: Attributes) -> Result<Box<dyn Span>, TraceError> {
        let span = self
            .tracer
            .span_builder(name.to_owned())
            .with_attributes(key_values(attributes))
            .start(&self.tracer);

        Ok(Box::new(OtelSpan { span }))
    }
}

struct OtelSpan<S> {
    span: S,
}

impl<S> Span for OtelSpan<S>
where
    S: OtelSpanApi + Send,
{
    fn set_attributes(&mut self, attributes: Attributes) {
        self.span.set_attributes(key_values(attributes));
    }

    fn end(&mut self) {
        self.span.end();
    }

    fn is_recording(&self) -> bool {
        self.span.is_recording()
    }
}

fn key_values(attributes: Attributes) -> Vec<KeyValue> {
    attributes
        .into_iter()
        .map(|(key, value)| KeyValue::new(key, to_value(value)))
        .collect()
}

fn to_value(value: AttributeValue) -> Value {
    match value {
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Int(i) => Value::I64(i),
        AttributeValue::Float(f) => Value::F64(f),
        AttributeValue::String(s) => Value::String(s.into()),
    }
}
