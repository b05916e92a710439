//! Foreground/background signal of the host application.
//!
//! Spans are tagged with the application state at the moment they end. The
//! host registers an [`AppStateSource`] once; until it does, or whenever the
//! source cannot answer, spans report [`AppState::Active`].

use crate::core::AppState;
use std::sync::{Arc, RwLock};

/// Something that can report the current application state.
pub trait AppStateSource: Send + Sync {
    /// Current state, or `None` if the host cannot tell right now.
    fn current_state(&self) -> Option<AppState>;
}

impl<F> AppStateSource for F
where
    F: Fn() -> Option<AppState> + Send + Sync,
{
    fn current_state(&self) -> Option<AppState> {
        self()
    }
}

/// A source that always reports the same state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedAppState(pub AppState);

impl AppStateSource for FixedAppState {
    fn current_state(&self) -> Option<AppState> {
        Some(self.0)
    }
}

static SOURCE: RwLock<Option<Arc<dyn AppStateSource>>> = RwLock::new(None);

/// Register the process-wide application state source.
pub fn set_app_state_source(source: Arc<dyn AppStateSource>) {
    let mut slot = SOURCE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(source);
}

/// Remove the registered source; spans fall back to `active`.
pub fn clear_app_state_source() {
    let mut slot = SOURCE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = None;
}

/// Current application state, defaulting to [`AppState::Active`].
pub fn current_app_state() -> AppState {
    let source = match SOURCE.read() {
        Ok(slot) => slot.clone(),
        Err(_) => None,
    };

    source
        .and_then(|source| source.current_state())
        .unwrap_or_default()
}
