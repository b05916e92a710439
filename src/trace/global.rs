//! Process-wide default tracer provider.
//!
//! Applications register one provider at startup; instrumentation that was
//! not handed a provider explicitly falls back to it. An empty registry is a
//! normal state and simply means "no tracing".

use super::{Tracer, TracerProvider};
use std::sync::{Arc, RwLock};

static GLOBAL_PROVIDER: RwLock<Option<Arc<dyn TracerProvider>>> = RwLock::new(None);

/// Register `provider` as the global default, returning the previous one.
pub fn set_tracer_provider(provider: Arc<dyn TracerProvider>) -> Option<Arc<dyn TracerProvider>> {
    let mut slot = GLOBAL_PROVIDER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    slot.replace(provider)
}

/// The registered provider, if any.
///
/// A poisoned registry reads as empty.
pub fn tracer_provider() -> Option<Arc<dyn TracerProvider>> {
    GLOBAL_PROVIDER.read().ok()?.clone()
}

/// Get a tracer from the global provider.
pub fn tracer(name: &str, version: &str) -> Option<Arc<dyn Tracer>> {
    tracer_provider().map(|provider| provider.tracer(name, version))
}

/// Tracer for instrumentation that was not handed a provider.
///
/// Uses the registered provider. With the `opentelemetry` feature an empty
/// registry falls back to the OpenTelemetry global tracer provider, which is
/// a no-op until the application installs one.
pub fn default_tracer(name: &str, version: &str) -> Option<Arc<dyn Tracer>> {
    tracer(name, version).or_else(|| fallback_tracer(name, version))
}

#[cfg(feature = "opentelemetry")]
fn fallback_tracer(name: &str, version: &str) -> Option<Arc<dyn Tracer>> {
    Some(super::otel::global_tracer(name, version))
}

#[cfg(not(feature = "opentelemetry"))]
fn fallback_tracer(_name: &str, _version: &str) -> Option<Arc<dyn Tracer>> {
    None
}

/// Unregister the global provider, returning it.
pub fn shutdown_tracer_provider() -> Option<Arc<dyn TracerProvider>> {
    let mut slot = GLOBAL_PROVIDER
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    slot.take()
}
