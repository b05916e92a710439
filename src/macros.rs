//! Macros for ergonomic attribute construction.

/// Build an [`Attributes`](crate::core::Attributes) map from literal pairs.
///
/// # Example
///
/// ```
/// use dispatch_trace::attributes;
///
/// let attrs = attributes! {
///     "service" => "checkout",
///     "shard" => 3,
///     "canary" => false,
/// };
///
/// assert_eq!(attrs.len(), 3);
/// assert_eq!(attrs.get_str("service"), Some("checkout"));
/// ```
#[macro_export]
macro_rules! attributes {
    () => {
        $crate::core::Attributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::core::Attributes::new();
        $(attrs.insert($key, $value);)+
        attrs
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::AttributeValue;

    #[test]
    fn empty_macro_is_empty() {
        let attrs = attributes! {};
        assert!(attrs.is_empty());
    }

    #[test]
    fn macro_converts_values() {
        let attrs = attributes! {
            "flag" => true,
            "count" => 2,
            "name" => String::from("x"),
        };

        assert_eq!(attrs.get("flag"), Some(&AttributeValue::Bool(true)));
        assert_eq!(attrs.get("count"), Some(&AttributeValue::Int(2)));
        assert_eq!(attrs.get_str("name"), Some("x"));
    }
}
