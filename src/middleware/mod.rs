//! The action-tracing middleware.
//!
//! [`tracing_middleware`] builds a [`TracingMiddleware`] from an optional
//! tracer provider and an optional configuration. Nothing happens at
//! construction time. The first time the middleware is attached to a store
//! (or [`activated`](TracingMiddleware::activate) by hand) it resolves its
//! tracer, logs which provider it picked when `debug` is set, and from then
//! on hands out [`ActionTracer`]s that share that tracer.
//!
//! # Example
//!
//! ```rust
//! use dispatch_trace::middleware::tracing_middleware;
//! use dispatch_trace::store::Store;
//! use dispatch_trace::trace::recording::RecordingTracerProvider;
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! let provider = RecordingTracerProvider::new();
//! let middleware = tracing_middleware(Some(Arc::new(provider.clone())), None);
//!
//! let store = Store::builder()
//!     .initial(0_i64)
//!     .reducer(|count: &i64, action: &Value| -> Result<i64, String> {
//!         Ok(count + action["count"].as_i64().unwrap_or(0))
//!     })
//!     .middleware(middleware)
//!     .build()
//!     .unwrap();
//!
//! store.dispatch(json!({"type": "COUNTER_INCREASE", "count": 3})).unwrap();
//!
//! let spans = provider.finished_spans();
//! assert_eq!(store.get_state(), 3);
//! assert_eq!(spans.len(), 1);
//! assert_eq!(spans[0].attributes.get_str("action.outcome"), Some("success"));
//! ```

mod interceptor;

pub use interceptor::ActionTracer;

use crate::config::TracingConfig;
use crate::store::{Dispatch, Layer, Middleware, StoreApi};
use crate::trace::{global, Tracer, TracerProvider, INSTRUMENTATION_NAME, INSTRUMENTATION_VERSION};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Where the middleware gets its tracer from.
///
/// Chosen once at construction; resolved once on first activation.
#[derive(Clone)]
pub enum TracerSource {
    /// A provider handed to the factory.
    Injected(Arc<dyn TracerProvider>),
    /// Whatever [`global::default_tracer`] returns at activation time.
    Global,
}

impl TracerSource {
    fn resolve(&self) -> Option<Arc<dyn Tracer>> {
        match self {
            Self::Injected(provider) => {
                Some(provider.tracer(INSTRUMENTATION_NAME, INSTRUMENTATION_VERSION))
            }
            Self::Global => global::default_tracer(INSTRUMENTATION_NAME, INSTRUMENTATION_VERSION),
        }
    }
}

impl fmt::Debug for TracerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Injected(_) => f.write_str("Injected"),
            Self::Global => f.write_str("Global"),
        }
    }
}

/// Create the tracing middleware.
///
/// Without a provider, the tracer comes from the global registry at first
/// activation, so a provider registered after this call but before the
/// middleware is attached to a store is still picked up. The lookup happens
/// only once: if nothing is registered at that point the middleware stays
/// untraced for its whole lifetime, even if a provider is registered later.
/// With the `opentelemetry` feature, an empty registry falls back to the
/// OpenTelemetry global provider instead. Without a configuration,
/// [`TracingConfig::default`] applies.
pub fn tracing_middleware(
    provider: Option<Arc<dyn TracerProvider>>,
    config: Option<TracingConfig>,
) -> TracingMiddleware {
    let source = match provider {
        Some(provider) => TracerSource::Injected(provider),
        None => TracerSource::Global,
    };

    TracingMiddleware {
        source,
        config: Arc::new(config.unwrap_or_default()),
        resolved: Arc::new(OnceLock::new()),
    }
}

/// Configured tracing middleware.
///
/// Clones share the resolved tracer.
#[derive(Clone)]
pub struct TracingMiddleware {
    source: TracerSource,
    config: Arc<TracingConfig>,
    resolved: Arc<OnceLock<ActionTracer>>,
}

impl TracingMiddleware {
    /// Middleware that uses the global tracer provider.
    pub fn new(config: TracingConfig) -> Self {
        tracing_middleware(None, Some(config))
    }

    /// Middleware that uses `provider`.
    pub fn with_provider(provider: Arc<dyn TracerProvider>, config: TracingConfig) -> Self {
        tracing_middleware(Some(provider), Some(config))
    }

    pub fn config(&self) -> &TracingConfig {
        &self.config
    }

    pub fn source(&self) -> &TracerSource {
        &self.source
    }

    /// Whether the tracer has been resolved yet.
    pub fn is_activated(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Resolve the tracer on first call and return the interceptor.
    pub fn activate(&self) -> ActionTracer {
        self.resolved
            .get_or_init(|| {
                if self.config.debug() {
                    match self.source {
                        TracerSource::Injected(_) => {
                            tracing::info!("Tracer provider supplied. Using custom tracer.")
                        }
                        TracerSource::Global => {
                            tracing::info!("No tracer provider supplied. Using global tracer instead.")
                        }
                    }
                }

                ActionTracer::new(self.source.resolve(), Arc::clone(&self.config))
            })
            .clone()
    }
}

impl fmt::Debug for TracingMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingMiddleware")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("activated", &self.is_activated())
            .finish()
    }
}

impl<S, A, E> Middleware<S, A, E> for TracingMiddleware
where
    A: Serialize + 'static,
    E: 'static,
{
    fn attach(&self, _store: &StoreApi<S>) -> Layer<A, E> {
        let tracer = self.activate();

        Box::new(move |next: Dispatch<A, E>| -> Dispatch<A, E> {
            Arc::new(move |action: A| tracer.intercept(action, |action| next(action)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreBuilder;
    use crate::trace::recording::RecordingTracerProvider;
    use std::io;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn debug_config() -> TracingConfig {
        TracingConfig::builder().debug(true).build().unwrap()
    }

    #[test]
    fn construction_does_not_resolve() {
        let provider = RecordingTracerProvider::new();
        let middleware = tracing_middleware(Some(Arc::new(provider.clone())), None);

        assert!(!middleware.is_activated());
        assert!(provider.tracer_requests().is_empty());
    }

    #[test]
    fn tracer_is_resolved_once() {
        let provider = RecordingTracerProvider::new();
        let middleware = tracing_middleware(Some(Arc::new(provider.clone())), None);

        let first = middleware.activate();
        let _second = middleware.clone().activate();

        assert!(first.is_enabled());
        assert!(middleware.is_activated());

        let requests = provider.tracer_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, INSTRUMENTATION_NAME);
        assert_eq!(requests[0].version, INSTRUMENTATION_VERSION);
    }

    #[test]
    fn debug_logs_custom_provider_once() {
        let provider = RecordingTracerProvider::new();
        let middleware = tracing_middleware(Some(Arc::new(provider)), Some(debug_config()));

        let logs = capture_logs(|| {
            middleware.activate();
            middleware.activate();
        });

        assert_eq!(logs.matches("Using custom tracer").count(), 1);
        assert!(!logs.contains("global tracer"));
    }

    #[test]
    fn debug_logs_global_fallback() {
        let middleware = tracing_middleware(None, Some(debug_config()));

        let logs = capture_logs(|| {
            middleware.activate();
        });

        assert!(logs.contains("No tracer provider supplied. Using global tracer instead."));
    }

    #[test]
    fn no_logs_without_debug() {
        let provider = RecordingTracerProvider::new();
        let middleware = tracing_middleware(Some(Arc::new(provider)), None);

        let logs = capture_logs(|| {
            middleware.activate();
        });

        assert!(logs.is_empty());
    }

    #[test]
    fn attaching_to_two_stores_shares_one_tracer() {
        let provider = RecordingTracerProvider::new();
        let middleware = tracing_middleware(Some(Arc::new(provider.clone())), None);

        let build = || {
            StoreBuilder::<i64, serde_json::Value, ()>::new()
                .initial(0)
                .reducer(|s, _| Ok(*s))
                .middleware(middleware.clone())
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();

        a.dispatch(serde_json::json!({"type": "A"})).unwrap();
        b.dispatch(serde_json::json!({"type": "B"})).unwrap();

        assert_eq!(provider.tracer_requests().len(), 1);
        assert_eq!(provider.finished_spans().len(), 2);
    }

    #[test]
    fn refused_span_is_logged_once_with_debug() {
        let provider = RecordingTracerProvider::new();
        let middleware =
            TracingMiddleware::with_provider(Arc::new(provider.clone()), debug_config());
        provider.shutdown();

        let logs = capture_logs(|| {
            let tracer = middleware.activate();
            let result = tracer.intercept(serde_json::json!({"type": "A"}), |a| Ok::<_, ()>(a));
            assert!(result.is_ok());
        });

        assert_eq!(logs.matches("Tracer refused to start a span").count(), 1);
        assert!(logs.contains("WARN"));
    }

    #[test]
    fn refused_span_is_silent_without_debug() {
        let provider = RecordingTracerProvider::new();
        let middleware =
            TracingMiddleware::with_provider(Arc::new(provider.clone()), TracingConfig::default());
        provider.shutdown();

        let logs = capture_logs(|| {
            let tracer = middleware.activate();
            let _ = tracer.intercept(serde_json::json!({"type": "A"}), |a| Ok::<_, ()>(a));
        });

        assert!(logs.is_empty());
    }

    #[test]
    fn with_provider_injects_provider_and_config() {
        let provider = RecordingTracerProvider::new();
        let config = TracingConfig::builder().name("redux-action").build().unwrap();
        let middleware = TracingMiddleware::with_provider(Arc::new(provider.clone()), config);

        assert!(matches!(middleware.source(), TracerSource::Injected(_)));
        assert_eq!(middleware.config().span_name(), "redux-action");

        let tracer = middleware.activate();
        tracer
            .intercept(serde_json::json!({"type": "A"}), |a| Ok::<_, ()>(a))
            .unwrap();

        assert_eq!(provider.finished_spans()[0].name, "redux-action");
    }

    #[test]
    fn source_reflects_provider_choice() {
        let injected = tracing_middleware(Some(Arc::new(RecordingTracerProvider::new())), None);
        let global = TracingMiddleware::new(TracingConfig::default());

        assert!(matches!(injected.source(), TracerSource::Injected(_)));
        assert!(matches!(global.source(), TracerSource::Global));
    }
}
