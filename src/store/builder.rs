//! Builder for constructing stores.

use crate::store::error::BuildError;
use crate::store::{reducer_dispatch, Dispatch, Middleware, Reducer, Store, StoreApi};
use std::sync::{Arc, RwLock};

/// Builder for constructing stores with a fluent API.
pub struct StoreBuilder<S, A, E> {
    initial: Option<S>,
    reducer: Option<Reducer<S, A, E>>,
    middleware: Vec<Box<dyn Middleware<S, A, E>>>,
}

impl<S, A, E> StoreBuilder<S, A, E>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
    E: 'static,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            reducer: None,
            middleware: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the reducer (required).
    pub fn reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&S, &A) -> Result<S, E> + Send + Sync + 'static,
    {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    /// Append a middleware. The first one added sees actions first.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, A, E> + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Build the store, attaching every middleware once.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Store<S, A, E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;

        let api = StoreApi {
            state: Arc::new(RwLock::new(initial)),
        };

        let layers: Vec<_> = self
            .middleware
            .iter()
            .map(|middleware| middleware.attach(&api))
            .collect();

        let base: Dispatch<A, E> = reducer_dispatch(Arc::clone(&api.state), reducer);
        let dispatch = layers
            .into_iter()
            .rev()
            .fold(base, |next, layer| layer(next));

        Ok(Store { api, dispatch })
    }
}

impl<S, A, E> Default for StoreBuilder<S, A, E>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_required_fields() {
        let result = StoreBuilder::<i64, i64, ()>::new().build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_reducer() {
        let result = StoreBuilder::<i64, i64, ()>::new().initial(0).build();

        assert!(matches!(result, Err(BuildError::MissingReducer)));
    }

    #[test]
    fn fluent_api_builds_store() {
        let store = StoreBuilder::<i64, i64, ()>::new()
            .initial(10)
            .reducer(|s, a| Ok(s * a))
            .build()
            .unwrap();

        store.dispatch(3).unwrap();
        assert_eq!(store.get_state(), 30);
    }
}
