//! Minimal host store and its middleware protocol.
//!
//! The tracing middleware plugs into a unidirectional-dataflow store. This
//! module provides that store and the protocol in its smallest useful form:
//! a reducer, a state cell and an ordered middleware chain.
//!
//! # Protocol
//!
//! A middleware is set up in three stages, each run once:
//!
//! 1. construct and configure the middleware value
//! 2. [`Middleware::attach`] it to a store, yielding a [`Layer`]
//! 3. apply the layer to the next dispatcher, yielding a [`Dispatch`]
//!
//! Only the resulting dispatcher runs per action.

mod builder;
mod error;

pub use builder::StoreBuilder;
pub use error::BuildError;

use std::sync::{Arc, PoisonError, RwLock};

/// A dispatcher: takes an action, returns it back or the reducer's error.
pub type Dispatch<A, E> = Arc<dyn Fn(A) -> Result<A, E> + Send + Sync>;

/// Wraps the next dispatcher in the chain.
pub type Layer<A, E> = Box<dyn FnOnce(Dispatch<A, E>) -> Dispatch<A, E> + Send>;

/// Pure state transition. An `Err` leaves the state unchanged.
pub type Reducer<S, A, E> = Arc<dyn Fn(&S, &A) -> Result<S, E> + Send + Sync>;

/// Interceptor in a store's dispatch chain.
pub trait Middleware<S, A, E>: Send + Sync {
    /// Attach to `store`. Runs once per store; the returned layer is applied
    /// once to the next dispatcher.
    fn attach(&self, store: &StoreApi<S>) -> Layer<A, E>;
}

/// The view of a store handed to middleware.
pub struct StoreApi<S> {
    state: Arc<RwLock<S>>,
}

impl<S> Clone for StoreApi<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Clone> StoreApi<S> {
    /// Snapshot of the current state.
    pub fn get_state(&self) -> S {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Middleware that forwards every action untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMiddleware;

impl<S, A: 'static, E: 'static> Middleware<S, A, E> for NoopMiddleware {
    fn attach(&self, _store: &StoreApi<S>) -> Layer<A, E> {
        Box::new(|next: Dispatch<A, E>| next)
    }
}

/// Middleware built from a closure returning a [`Layer`].
pub struct FnMiddleware<F>(F);

/// Wrap a closure as middleware.
pub fn from_fn<S, A, E, F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&StoreApi<S>) -> Layer<A, E> + Send + Sync,
{
    FnMiddleware(f)
}

impl<S, A, E, F> Middleware<S, A, E> for FnMiddleware<F>
where
    F: Fn(&StoreApi<S>) -> Layer<A, E> + Send + Sync,
{
    fn attach(&self, store: &StoreApi<S>) -> Layer<A, E> {
        (self.0)(store)
    }
}

/// A state container with a middleware chain.
pub struct Store<S, A, E> {
    api: StoreApi<S>,
    dispatch: Dispatch<A, E>,
}

impl<S, A, E> Store<S, A, E>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
    E: 'static,
{
    pub fn builder() -> StoreBuilder<S, A, E> {
        StoreBuilder::new()
    }

    /// Send `action` through the middleware chain into the reducer.
    pub fn dispatch(&self, action: A) -> Result<A, E> {
        (self.dispatch)(action)
    }

    pub fn get_state(&self) -> S {
        self.api.get_state()
    }

    pub fn api(&self) -> &StoreApi<S> {
        &self.api
    }
}

fn reducer_dispatch<S, A, E>(state: Arc<RwLock<S>>, reducer: Reducer<S, A, E>) -> Dispatch<A, E>
where
    S: Send + Sync + 'static,
    A: 'static,
    E: 'static,
{
    Arc::new(move |action: A| {
        let mut current = state.write().unwrap_or_else(PoisonError::into_inner);
        let next = reducer(&current, &action)?;
        *current = next;
        Ok(action)
    })
}
