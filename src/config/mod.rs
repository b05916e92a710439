//! Middleware configuration.
//!
//! A [`TracingConfig`] is captured once when the middleware is created and
//! never changes afterwards. Every option is optional; the default
//! configuration traces every action under the span name `action` with no
//! extra attributes.
//!
//! | option | effect |
//! |---|---|
//! | `debug` | log which tracer provider is used |
//! | `name` | span name for all actions |
//! | `attributes` | static attributes merged into every span |
//! | `attribute_transform` | rewrite attributes before they are applied |
//!
//! # Example
//!
//! ```rust
//! use dispatch_trace::config::TracingConfig;
//!
//! let config = TracingConfig::builder()
//!     .debug(true)
//!     .name("redux-action")
//!     .attribute("service", "checkout")
//!     .attribute_transform(|mut attrs| {
//!         attrs.remove("action.payload");
//!         attrs
//!     })
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(config.span_name(), "redux-action");
//! ```

pub mod builder;
pub mod error;

pub use builder::TracingConfigBuilder;
pub use error::{ConfigError, ConfigViolation};

use crate::core::Attributes;
use crate::span::DEFAULT_SPAN_NAME;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Pure function applied to attributes before they reach a span.
pub type AttributeTransform = Arc<dyn Fn(Attributes) -> Attributes + Send + Sync>;

/// Immutable middleware configuration.
#[derive(Clone, Default)]
pub struct TracingConfig {
    pub(crate) debug: bool,
    pub(crate) name: Option<String>,
    pub(crate) attributes: Attributes,
    pub(crate) attribute_transform: Option<AttributeTransform>,
}

impl TracingConfig {
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::new()
    }

    /// Build a configuration from serialized options.
    pub fn from_options(options: TracingOptions) -> Result<Self, ConfigError> {
        let mut builder = TracingConfigBuilder::new()
            .debug(options.debug)
            .attributes(options.attributes);
        if let Some(name) = options.name {
            builder = builder.name(name);
        }
        builder.build()
    }

    /// Parse [`TracingOptions`] from JSON and build a configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: TracingOptions = serde_json::from_str(json)?;
        Self::from_options(options)
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Configured span name, or [`DEFAULT_SPAN_NAME`].
    pub fn span_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_SPAN_NAME)
    }

    /// Static attributes merged into every span.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Apply the attribute transform, or return `attributes` unchanged.
    pub fn transform(&self, attributes: Attributes) -> Attributes {
        match &self.attribute_transform {
            Some(transform) => transform(attributes),
            None => attributes,
        }
    }
}

impl fmt::Debug for TracingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingConfig")
            .field("debug", &self.debug)
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("attribute_transform", &self.attribute_transform.is_some())
            .finish()
    }
}

/// Serializable subset of [`TracingConfig`].
///
/// Transforms are code and cannot be loaded from a file; everything else
/// can.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TracingOptions {
    pub debug: bool,
    pub name: Option<String>,
    pub attributes: Attributes,
}
