//! Span lifecycle helper.
//!
//! All tracer calls made on behalf of a dispatch go through [`start`] and
//! [`end`]. A span moves through three states:
//!
//! ```text
//! uncreated --start--> started (attributes mutable) --end--> ended (frozen)
//! ```
//!
//! When no tracer is available, or the tracer refuses to open a span,
//! [`start`] returns `None` and the dispatch simply runs untraced; [`end`]
//! accepts that `None` and does nothing.

use crate::core::{ActionRecord, Attributes, Outcome};
use crate::environment;
use crate::trace::{Span, Tracer};

/// Span name used when the configuration does not override it.
pub const DEFAULT_SPAN_NAME: &str = "action";

/// Attribute keys written by the middleware.
///
/// Downstream consumers query spans by these keys; they must not change.
pub mod keys {
    /// The action's `type` discriminant.
    pub const TYPE: &str = "action.type";
    /// JSON text of the action minus its `type`.
    pub const PAYLOAD: &str = "action.payload";
    /// Application state when the span ended.
    pub const STATE: &str = "action.state";
    /// `incomplete`, `success` or `fail`.
    pub const OUTCOME: &str = "action.outcome";
}

/// Keys owned by the middleware. Static configuration may not set them.
pub const RESERVED_KEYS: [&str; 4] = [keys::TYPE, keys::PAYLOAD, keys::STATE, keys::OUTCOME];

/// An open span.
///
/// Ending consumes the handle, so an ended span cannot be written to or
/// ended again.
pub struct SpanHandle {
    span: Box<dyn Span>,
}

impl SpanHandle {
    /// Merge attributes into the open span.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.span.set_attributes(attributes);
    }

    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.span
            .set_attributes(Attributes::new().with(keys::OUTCOME, outcome));
    }

    pub fn is_recording(&self) -> bool {
        self.span.is_recording()
    }
}

impl std::fmt::Debug for SpanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanHandle")
            .field("recording", &self.span.is_recording())
            .finish()
    }
}

/// Open a span named `name` carrying `attributes`.
///
/// Returns `None` when `tracer` is absent or fails to open the span. The
/// failure is swallowed: tracing problems never reach the caller.
pub fn start(tracer: Option<&dyn Tracer>, name: &str, attributes: Attributes) -> Option<SpanHandle> {
    let tracer = tracer?;

    tracer
        .start_span(name, attributes)
        .ok()
        .map(|span| SpanHandle { span })
}

/// Finish a span.
///
/// Tags the span with the current application state, merges `extra` on top
/// (so `extra` may override the state) and ends it. `None` is a no-op.
pub fn end(handle: Option<SpanHandle>, extra: Attributes) {
    let Some(mut handle) = handle else {
        return;
    };

    let mut attributes =
        Attributes::new().with(keys::STATE, environment::current_app_state());
    attributes.merge(extra);

    handle.span.set_attributes(attributes);
    handle.span.end();
}

/// The type and payload attributes of an action.
pub fn action_attributes(record: &ActionRecord) -> Attributes {
    Attributes::new()
        .with(keys::TYPE, record.action_type())
        .with(keys::PAYLOAD, record.payload_json())
}
