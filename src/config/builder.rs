//! Builder for tracing configurations.

use crate::config::error::{ConfigError, ConfigViolation};
use crate::config::{AttributeTransform, TracingConfig};
use crate::core::{AttributeValue, Attributes};
use crate::span::RESERVED_KEYS;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for [`TracingConfig`] with a fluent API.
///
/// `build` validates the whole configuration and reports every violation
/// at once.
#[derive(Default)]
pub struct TracingConfigBuilder {
    debug: bool,
    name: Option<String>,
    attributes: Attributes,
    attribute_transform: Option<AttributeTransform>,
}

impl TracingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log tracer-provider selection.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Override the span name used for every action.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add one static attribute.
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Add several static attributes.
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes.merge(attributes);
        self
    }

    /// Rewrite attributes right before they are applied to a span.
    ///
    /// The transform sees the fully merged set and returns the set to apply.
    /// It is called once when the span starts and once with the completion
    /// attributes. A panicking transform propagates to the dispatcher.
    pub fn attribute_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Attributes) -> Attributes + Send + Sync + 'static,
    {
        self.attribute_transform = Some(Arc::new(transform));
        self
    }

    /// Check the configuration, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                checks.push(Validation::fail(ConfigViolation::BlankSpanName));
            }
        }

        for key in self.attributes.keys() {
            if key.is_empty() {
                checks.push(Validation::fail(ConfigViolation::EmptyAttributeKey));
            } else if RESERVED_KEYS.contains(&key) {
                checks.push(Validation::fail(ConfigViolation::ReservedAttributeKey {
                    key: key.to_string(),
                }));
            }
        }

        if checks.is_empty() {
            return Validation::success(());
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the configuration.
    /// Returns every violation if validation fails.
    pub fn build(self) -> Result<TracingConfig, ConfigError> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(ConfigError::Invalid {
                violations: errors.iter().cloned().collect(),
            });
        }

        Ok(TracingConfig {
            debug: self.debug,
            name: self.name,
            attributes: self.attributes,
            attribute_transform: self.attribute_transform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::keys;

    #[test]
    fn empty_builder_is_valid() {
        let config = TracingConfigBuilder::new().build().unwrap();

        assert!(!config.debug());
        assert_eq!(config.span_name(), "action");
        assert!(config.attributes().is_empty());
    }

    #[test]
    fn fluent_api_sets_fields() {
        let config = TracingConfigBuilder::new()
            .debug(true)
            .name("redux-action")
            .attribute("service", "checkout")
            .attributes(Attributes::new().with("build", 42))
            .build()
            .unwrap();

        assert!(config.debug());
        assert_eq!(config.span_name(), "redux-action");
        assert_eq!(config.attributes().get_str("service"), Some("checkout"));
        assert_eq!(config.attributes().len(), 2);
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = TracingConfigBuilder::new().name("   ").validate();

        assert!(result.is_failure());
        if let Validation::Failure(errors) = result {
            assert!(errors
                .iter()
                .any(|e| matches!(e, ConfigViolation::BlankSpanName)));
        }
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let result = TracingConfigBuilder::new()
            .name("")
            .attribute("", "x")
            .attribute(keys::OUTCOME, "success")
            .build();

        match result {
            Err(ConfigError::Invalid { violations }) => {
                assert_eq!(violations.len(), 3);
                assert!(violations.contains(&ConfigViolation::BlankSpanName));
                assert!(violations.contains(&ConfigViolation::EmptyAttributeKey));
                assert!(violations.contains(&ConfigViolation::ReservedAttributeKey {
                    key: keys::OUTCOME.to_string(),
                }));
            }
            Err(other) => panic!("Expected Invalid, got {other}"),
            Ok(_) => panic!("Expected validation failure"),
        }
    }

    #[test]
    fn transform_is_stored() {
        let config = TracingConfigBuilder::new()
            .attribute_transform(|attrs| attrs.with("version", "1.1.1"))
            .build()
            .unwrap();

        let out = config.transform(Attributes::new());
        assert_eq!(out.get_str("version"), Some("1.1.1"));
    }
}
