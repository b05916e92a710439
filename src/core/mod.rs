//! Core value types for action tracing.
//!
//! This module contains the pure data the rest of the crate moves around:
//! - Span attributes and their scalar values
//! - The type/payload split of a dispatched action
//! - Outcome and application-state markers
//!
//! Nothing in this module talks to a tracer or reads global state.

mod action;
mod attributes;
mod outcome;

pub use action::{ActionRecord, TYPE_FIELD};
pub use attributes::{AttributeValue, Attributes};
pub use outcome::{AppState, Outcome};
