//! Property-based tests for action tracing.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated actions.

use dispatch_trace::core::{ActionRecord, Outcome};
use dispatch_trace::span::keys;
use dispatch_trace::trace::recording::RecordingTracerProvider;
use dispatch_trace::tracing_middleware;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;

fn arbitrary_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _:-]{0,16}".prop_map(Value::String),
    ]
}

fn arbitrary_payload_value() -> impl Strategy<Value = Value> {
    arbitrary_scalar().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

prop_compose! {
    fn arbitrary_action()(
        action_type in "[A-Z_]{1,12}(:[a-z]{1,6})?",
        fields in prop::collection::btree_map("[a-z]{1,8}", arbitrary_payload_value(), 0..5),
    ) -> Value {
        let mut object: Map<String, Value> = fields
            .into_iter()
            .filter(|(key, _)| key != "type")
            .collect();
        object.insert("type".to_string(), Value::String(action_type));
        Value::Object(object)
    }
}

fn without_type(action: &Value) -> Value {
    let mut object = action.as_object().cloned().unwrap_or_default();
    object.remove("type");
    Value::Object(object)
}

proptest! {
    #[test]
    fn payload_round_trips(action in arbitrary_action()) {
        let record = ActionRecord::from_action(&action).unwrap();
        let parsed: Value = serde_json::from_str(&record.payload_json()).unwrap();

        prop_assert_eq!(parsed, without_type(&action));
    }

    #[test]
    fn typed_actions_produce_exactly_one_span(action in arbitrary_action()) {
        let provider = RecordingTracerProvider::new();
        let tracer = tracing_middleware(Some(Arc::new(provider.clone())), None).activate();

        let returned = tracer.intercept(action.clone(), |a| Ok::<_, ()>(a)).unwrap();
        prop_assert_eq!(&returned, &action);

        let spans = provider.finished_spans();
        prop_assert_eq!(spans.len(), 1);
        prop_assert_eq!(spans[0].initial_outcome(), Some(Outcome::Incomplete));
        prop_assert_eq!(spans[0].outcome(), Some(Outcome::Success));
        prop_assert_eq!(spans[0].attributes.get_str(keys::TYPE), action["type"].as_str());

        let payload: Value =
            serde_json::from_str(spans[0].attributes.get_str(keys::PAYLOAD).unwrap()).unwrap();
        prop_assert_eq!(payload, without_type(&action));
    }

    #[test]
    fn failed_dispatch_is_always_fail(action in arbitrary_action(), code in any::<u32>()) {
        let provider = RecordingTracerProvider::new();
        let tracer = tracing_middleware(Some(Arc::new(provider.clone())), None).activate();

        let result: Result<(), u32> = tracer.intercept(action, |_| Err(code));

        prop_assert_eq!(result, Err(code));
        let spans = provider.finished_spans();
        prop_assert_eq!(spans.len(), 1);
        prop_assert_eq!(spans[0].outcome(), Some(Outcome::Fail));
    }

    #[test]
    fn untyped_values_never_produce_spans(
        fields in prop::collection::btree_map("[a-z]{1,8}", arbitrary_scalar(), 0..5)
    ) {
        let object: Map<String, Value> = fields
            .into_iter()
            .filter(|(key, _)| key != "type")
            .collect();
        let value = Value::Object(object);

        let provider = RecordingTracerProvider::new();
        let tracer = tracing_middleware(Some(Arc::new(provider.clone())), None).activate();

        let returned = tracer.intercept(value.clone(), |v| Ok::<_, ()>(v)).unwrap();

        prop_assert_eq!(returned, value);
        prop_assert!(provider.finished_spans().is_empty());
    }
}
