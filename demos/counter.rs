//! Counter store with action tracing.
//!
//! Run with `cargo run --example counter`.

use dispatch_trace::environment::{self, FixedAppState};
use dispatch_trace::trace::global;
use dispatch_trace::trace::recording::RecordingTracerProvider;
use dispatch_trace::{tracing_middleware, AppState, Store, TracingConfig};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
enum CounterAction {
    #[serde(rename = "COUNTER_INCREASE")]
    Increase { count: i64 },
    #[serde(rename = "COUNTER_DECREASE")]
    Decrease { count: i64 },
    #[serde(rename = "LOGIN")]
    Login { user: String, password: String },
}

#[derive(Debug, thiserror::Error)]
enum CounterError {
    #[error("counter would go negative")]
    Negative,
}

fn reducer(count: &i64, action: &CounterAction) -> Result<i64, CounterError> {
    match action {
        CounterAction::Increase { count: n } => Ok(count + n),
        CounterAction::Decrease { count: n } if count - n < 0 => Err(CounterError::Negative),
        CounterAction::Decrease { count: n } => Ok(count - n),
        CounterAction::Login { .. } => Ok(*count),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = TracingConfig::builder()
        .debug(true)
        .name("counter-action")
        .attribute("service", "counter-demo")
        .attribute_transform(|mut attrs| {
            if attrs.get_str("action.type") == Some("LOGIN") {
                attrs.remove("action.payload");
            }
            attrs
        })
        .build()
        .expect("valid configuration");

    // Created before any provider exists; resolved when the store attaches it.
    let middleware = tracing_middleware(None, Some(config));

    let provider = RecordingTracerProvider::new();
    global::set_tracer_provider(Arc::new(provider.clone()));
    environment::set_app_state_source(Arc::new(FixedAppState(AppState::Active)));

    let store = Store::builder()
        .initial(0_i64)
        .reducer(reducer)
        .middleware(middleware)
        .build()
        .expect("store builds");

    let actions = [
        CounterAction::Increase { count: 3 },
        CounterAction::Decrease { count: 1 },
        CounterAction::Decrease { count: 10 },
        CounterAction::Login {
            user: "ada".into(),
            password: "hunter2".into(),
        },
    ];

    for action in actions {
        match store.dispatch(action) {
            Ok(action) => tracing::info!(?action, state = store.get_state(), "dispatched"),
            Err(error) => tracing::warn!(%error, state = store.get_state(), "dispatch failed"),
        }
    }

    for span in provider.finished_spans() {
        println!(
            "{} {:>8?} {}",
            span.name,
            span.duration,
            serde_json::to_string(&span.attributes).unwrap_or_default()
        );
    }
}
