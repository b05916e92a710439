//! Per-action interception: the hot path of the middleware.

use crate::config::TracingConfig;
use crate::core::{ActionRecord, Attributes, Outcome};
use crate::span::{self, keys, SpanHandle};
use crate::trace::Tracer;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// Traces individual dispatches.
///
/// Obtained from [`TracingMiddleware::activate`](super::TracingMiddleware::activate).
/// Cheap to clone; holds no per-dispatch state, so any number of nested or
/// overlapping dispatches may run through the same value.
#[derive(Clone)]
pub struct ActionTracer {
    tracer: Option<Arc<dyn Tracer>>,
    config: Arc<TracingConfig>,
}

impl ActionTracer {
    pub(crate) fn new(tracer: Option<Arc<dyn Tracer>>, config: Arc<TracingConfig>) -> Self {
        Self { tracer, config }
    }

    /// Whether a tracer was resolved. Without one every dispatch runs
    /// untraced.
    pub fn is_enabled(&self) -> bool {
        self.tracer.is_some()
    }

    pub fn config(&self) -> &TracingConfig {
        &self.config
    }

    /// Run `next(action)` inside a span.
    ///
    /// The span opens with outcome `incomplete` and ends with `success` or
    /// `fail` once `next` has returned. Its result, `Ok` or `Err`, is
    /// returned untouched. Actions without a `type` are forwarded without a
    /// span.
    pub fn intercept<A, R, E, F>(&self, action: A, next: F) -> Result<R, E>
    where
        A: Serialize,
        F: FnOnce(A) -> Result<R, E>,
    {
        let Some(scope) = self.open(&action) else {
            return next(action);
        };

        let result = next(action);
        scope.finish(outcome_of(&result));
        result
    }

    /// Like [`intercept`](Self::intercept), for dispatchers that complete
    /// asynchronously. The span ends only after the returned future
    /// resolves. Dropping the future before then ends the span as `fail`.
    pub async fn intercept_async<A, R, E, F, Fut>(&self, action: A, next: F) -> Result<R, E>
    where
        A: Serialize,
        F: FnOnce(A) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let Some(scope) = self.open(&action) else {
            return next(action).await;
        };

        let result = next(action).await;
        scope.finish(outcome_of(&result));
        result
    }

    /// Wrap `next` into a traced dispatcher.
    pub fn bind<A, R, E, F>(&self, next: F) -> impl Fn(A) -> Result<R, E>
    where
        A: Serialize,
        F: Fn(A) -> Result<R, E>,
    {
        let tracer = self.clone();
        move |action| tracer.intercept(action, &next)
    }

    fn open<A: Serialize>(&self, action: &A) -> Option<DispatchScope<'_>> {
        let tracer = self.tracer.as_deref()?;
        let record = ActionRecord::from_action(action)?;

        let mut attributes = span::action_attributes(&record);
        attributes.merge(self.config.attributes().clone());
        attributes.insert(keys::OUTCOME, Outcome::Incomplete);
        let attributes = self.config.transform(attributes);

        let name = self.config.span_name();
        let handle = span::start(Some(tracer), name, attributes);
        if handle.is_none() && self.config.debug() {
            tracing::warn!(span = name, "Tracer refused to start a span; dispatching untraced");
        }

        Some(DispatchScope {
            handle,
            outcome: Outcome::Fail,
            config: &self.config,
        })
    }
}

fn outcome_of<R, E>(result: &Result<R, E>) -> Outcome {
    match result {
        Ok(_) => Outcome::Success,
        Err(_) => Outcome::Fail,
    }
}

/// Owns the span of one dispatch and guarantees it ends.
///
/// Dropped without [`finish`](Self::finish), it ends the span with the last
/// known outcome and skips the attribute transform. That outcome is `fail`
/// while `next` is still running (it unwound or the async dispatch was
/// cancelled) and the real result once `next` has returned.
struct DispatchScope<'a> {
    handle: Option<SpanHandle>,
    outcome: Outcome,
    config: &'a TracingConfig,
}

impl DispatchScope<'_> {
    fn finish(mut self, outcome: Outcome) {
        self.outcome = outcome;
        if self.handle.is_none() {
            return;
        }

        let completion = self
            .config
            .transform(Attributes::new().with(keys::OUTCOME, outcome));
        span::end(self.handle.take(), completion);
    }
}

impl Drop for DispatchScope<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            span::end(
                Some(handle),
                Attributes::new().with(keys::OUTCOME, self.outcome),
            );
        }
    }
}
