//! Outcome and application-state markers recorded on spans.

use super::attributes::AttributeValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a traced dispatch currently stands.
///
/// Every span starts as [`Outcome::Incomplete`] and moves to exactly one of
/// the terminal variants before it ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Incomplete,
    Success,
    Fail,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }

    /// Parse the wire form back into an outcome.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "incomplete" => Some(Self::Incomplete),
            "success" => Some(Self::Success),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Incomplete)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Outcome> for AttributeValue {
    fn from(outcome: Outcome) -> Self {
        AttributeValue::String(outcome.as_str().to_owned())
    }
}

/// Foreground/background state of the host application.
///
/// `Active` is the default and the value reported whenever the host cannot
/// tell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    #[default]
    Active,
    Background,
    Inactive,
    Unknown,
    Extension,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Background => "background",
            Self::Inactive => "inactive",
            Self::Unknown => "unknown",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AppState> for AttributeValue {
    fn from(state: AppState) -> Self {
        AttributeValue::String(state.as_str().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_wire_names_are_stable() {
        assert_eq!(Outcome::Incomplete.as_str(), "incomplete");
        assert_eq!(Outcome::Success.as_str(), "success");
        assert_eq!(Outcome::Fail.as_str(), "fail");
    }

    #[test]
    fn outcome_parses_its_own_output() {
        for outcome in [Outcome::Incomplete, Outcome::Success, Outcome::Fail] {
            assert_eq!(Outcome::parse(outcome.as_str()), Some(outcome));
        }
        assert_eq!(Outcome::parse("done"), None);
    }

    #[test]
    fn only_incomplete_is_non_terminal() {
        assert!(!Outcome::Incomplete.is_terminal());
        assert!(Outcome::Success.is_terminal());
        assert!(Outcome::Fail.is_terminal());
    }

    #[test]
    fn app_state_defaults_to_active() {
        assert_eq!(AppState::default(), AppState::Active);
        assert_eq!(AppState::default().to_string(), "active");
    }

    #[test]
    fn app_state_serializes_lowercase() {
        let json = serde_json::to_string(&AppState::Background).unwrap();
        assert_eq!(json, r#""background""#);
    }
}
