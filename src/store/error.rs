//! Build errors for stores.

use thiserror::Error;

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Reducer not specified. Call .reducer(f) before .build()")]
    MissingReducer,
}
