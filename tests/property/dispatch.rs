//! Property-based tests for routing determinism, validation totality, and
//! coercion round-trips.

use herald::command::CommandNode;
use herald::context::Context;
use herald::registry::CommandRegistry;
use herald::response::Response;
use herald::validation::{validate_params, Parameter};
use indexmap::IndexMap;
use proptest::prelude::*;
use serde_json::{json, Value};

fn sample_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    let mut weather = CommandNode::new("Weather lookups.");
    weather.register_child(
        "today",
        CommandNode::new("Today's weather for a location.")
            .with_parameters(vec![Parameter::new("location", "string").required()])
            .with_handler(|ctx| {
                let location = ctx.param_str("location").unwrap_or("somewhere");
                Ok(Response::text(format!("Weather for {}: sunny", location)))
            }),
    );
    weather.register_child(
        "forecast",
        CommandNode::new("Five-day forecast.")
            .with_handler(|_| Ok(Response::text("Forecast: more sun"))),
    );
    registry.register("weather", weather).unwrap();

    registry
        .register(
            "echo",
            CommandNode::new("Echo the arguments back.")
                .with_handler(|ctx| Ok(Response::text(ctx.tokens.join(" ")))),
        )
        .unwrap();

    registry
}

/// Routing the same string against the same static tree always yields the
/// same response.
#[test]
fn test_routing_is_deterministic_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let registry = sample_registry();

    let token = prop::sample::select(vec![
        "weather", "today", "forecast", "echo", "help", "bogus", "Seattle", "HELP", "WEATHER", "",
    ]);

    runner
        .run(&prop::collection::vec(token, 0..6), |tokens| {
            let raw = tokens.join(" ");
            let first = registry.route(&raw, &Context::new());
            let second = registry.route(&raw, &Context::new());
            assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}

/// Every schema lands in exactly one of `validated_params` or `errors`,
/// except optional absent parameters without a default, which are omitted.
#[test]
fn test_validation_totality_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    let schemas = vec![
        Parameter::new("count", "integer").required(),
        Parameter::new("label", "string").default_value(json!("unset")),
        Parameter::new("flag", "boolean"),
        Parameter::new("owner", "string").required(),
    ];

    let token = prop::sample::select(vec![
        "42", "abc", "true", "no", "", "  ", "hello", "-7", "3.5",
    ]);

    runner
        .run(&prop::collection::vec(token, 0..6), |tokens| {
            let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
            let result = validate_params(&schemas, &tokens, &IndexMap::new());

            for (i, schema) in schemas.iter().enumerate() {
                let provided = tokens
                    .get(i)
                    .map(|t| !t.trim().is_empty())
                    .unwrap_or(false);
                let in_errors = result.errors.contains_key(&schema.name);
                let in_validated = result.validated_params.contains_key(&schema.name);

                if provided {
                    assert!(
                        in_errors ^ in_validated,
                        "provided parameter '{}' must be validated or rejected",
                        schema.name
                    );
                } else if schema.required {
                    assert!(in_errors, "absent required '{}' must error", schema.name);
                    assert!(!in_validated);
                } else if schema.default.is_some() {
                    assert!(in_validated, "absent defaulted '{}' must resolve", schema.name);
                    assert!(!in_errors);
                } else {
                    assert!(
                        !in_errors && !in_validated,
                        "absent optional '{}' must be omitted",
                        schema.name
                    );
                }
            }

            assert_eq!(result.valid, result.errors.is_empty());
            Ok(())
        })
        .unwrap();
}

/// Rendering a typed value as a string and re-validating it yields an equal
/// coerced value.
#[test]
fn test_integer_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let schemas = vec![Parameter::new("n", "integer").required()];

    runner
        .run(&any::<i64>(), |n| {
            let tokens = vec![n.to_string()];
            let result = validate_params(&schemas, &tokens, &IndexMap::new());
            assert!(result.valid);
            assert_eq!(result.validated_params.get("n"), Some(&Value::from(n)));
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_float_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let schemas = vec![Parameter::new("x", "float").required()];

    runner
        .run(&any::<f64>(), |x| {
            prop_assume!(x.is_finite());
            let tokens = vec![x.to_string()];
            let result = validate_params(&schemas, &tokens, &IndexMap::new());
            assert!(result.valid);
            let coerced = result
                .validated_params
                .get("x")
                .and_then(Value::as_f64)
                .expect("float coercion must produce a number");
            assert_eq!(coerced, x);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_boolean_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let schemas = vec![Parameter::new("b", "boolean").required()];

    runner
        .run(&any::<bool>(), |b| {
            let tokens = vec![b.to_string()];
            let result = validate_params(&schemas, &tokens, &IndexMap::new());
            assert!(result.valid);
            assert_eq!(result.validated_params.get("b"), Some(&Value::Bool(b)));
            Ok(())
        })
        .unwrap();
}

/// String coercion is the identity on any non-blank token.
#[test]
fn test_string_identity_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let schemas = vec![Parameter::new("s", "string").required()];

    runner
        .run(&"[a-zA-Z0-9_.-]{1,24}", |s| {
            let tokens = vec![s.clone()];
            let result = validate_params(&schemas, &tokens, &IndexMap::new());
            assert!(result.valid);
            assert_eq!(
                result.validated_params.get("s"),
                Some(&Value::String(s.clone()))
            );
            Ok(())
        })
        .unwrap();
}
