//! Dispatch Trace: action-tracing middleware for unidirectional-dataflow stores
//!
//! Every action dispatched through the middleware becomes a span: a timed
//! record carrying the action's type, its serialized payload, the
//! application state and whether the dispatch succeeded. The middleware
//! never changes what the store does. Malformed actions, a missing tracer or
//! a backend that refuses spans all degrade to plain, untraced dispatch, and
//! errors from the wrapped dispatcher come back unchanged.
//!
//! # Core Concepts
//!
//! - **Middleware**: [`tracing_middleware`] configures once, resolves its
//!   tracer on first attachment and intercepts every action afterwards
//! - **Span helper**: [`span::start`] / [`span::end`] isolate every tracer call
//! - **Tracer**: the [`trace::Tracer`] capability, injected or taken from
//!   [`trace::global`]
//! - **Configuration**: [`TracingConfig`] with span name, static attributes
//!   and an attribute transform
//!
//! # Span attributes
//!
//! | key | value |
//! |---|---|
//! | `action.type` | the action's `type` |
//! | `action.payload` | JSON of the action minus `type` |
//! | `action.outcome` | `incomplete`, then `success` or `fail` |
//! | `action.state` | application state when the span ended |
//!
//! # Example
//!
//! ```rust
//! use dispatch_trace::{tracing_middleware, Store, TracingConfig};
//! use dispatch_trace::trace::recording::RecordingTracerProvider;
//! use serde::Serialize;
//! use std::sync::Arc;
//!
//! #[derive(Serialize)]
//! #[serde(tag = "type")]
//! enum CounterAction {
//!     #[serde(rename = "COUNTER_INCREASE")]
//!     Increase { count: i64 },
//! }
//!
//! let provider = RecordingTracerProvider::new();
//! let config = TracingConfig::builder().name("redux-action").build().unwrap();
//!
//! let store = Store::builder()
//!     .initial(0_i64)
//!     .reducer(|count: &i64, action: &CounterAction| -> Result<i64, String> {
//!         match action {
//!             CounterAction::Increase { count: n } => Ok(count + n),
//!         }
//!     })
//!     .middleware(tracing_middleware(Some(Arc::new(provider.clone())), Some(config)))
//!     .build()
//!     .unwrap();
//!
//! store.dispatch(CounterAction::Increase { count: 3 }).unwrap();
//!
//! let span = &provider.finished_spans()[0];
//! assert_eq!(span.name, "redux-action");
//! assert_eq!(span.attributes.get_str("action.payload"), Some(r#"{"count":3}"#));
//! ```

pub mod config;
pub mod core;
pub mod environment;
pub mod macros;
pub mod middleware;
pub mod span;
pub mod store;
pub mod trace;

// Re-export commonly used types
pub use crate::config::{TracingConfig, TracingConfigBuilder};
pub use crate::core::{ActionRecord, AppState, AttributeValue, Attributes, Outcome};
pub use middleware::{tracing_middleware, ActionTracer, TracingMiddleware};
pub use store::{Middleware, Store, StoreBuilder};
