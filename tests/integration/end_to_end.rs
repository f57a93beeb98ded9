//! End-to-end scenarios exercising the full dispatch path: routing,
//! validation, execution, and response payload rendering.

use crate::integration::sample_registry;
use herald::command::CommandNode;
use herald::context::Context;
use herald::registry::CommandRegistry;
use herald::response::Response;
use herald::validation::{min_value, Parameter};

#[test]
fn test_weather_scenario() {
    let registry = sample_registry();

    // Missing required argument.
    let response = registry.route("weather today", &Context::new());
    assert!(!response.success);
    assert!(response
        .text_content()
        .unwrap()
        .contains("location: Required parameter missing"));

    // Argument supplied.
    let response = registry.route("weather today Seattle", &Context::new());
    assert!(response.success);
    assert!(response.text_content().unwrap().contains("Seattle"));

    // Unknown subcommand under a router node.
    let response = registry.route("weather bogus", &Context::new());
    assert!(!response.success);
    assert!(response
        .text_content()
        .unwrap()
        .contains("not a valid subcommand"));

    // Help instead of argument parsing.
    let response = registry.route("weather forecast help", &Context::new());
    assert!(response
        .text_content()
        .unwrap()
        .contains("Help: weather forecast"));

    // Empty input lists everything.
    let response = registry.route("", &Context::new());
    assert!(response.success);
    assert!(response
        .text_content()
        .unwrap()
        .contains("*Available Commands:*"));
}

#[test]
fn test_age_gate_scenario() {
    let mut registry = CommandRegistry::new();
    registry
        .register(
            "signup",
            CommandNode::new("Sign up for the beta.")
                .with_parameters(vec![Parameter::new("age", "integer")
                    .required()
                    .validator(min_value(18.0))])
                .with_handler(|_| Ok(Response::success("Signed up"))),
        )
        .unwrap();

    let response = registry.route("signup 16", &Context::new());
    assert!(response
        .text_content()
        .unwrap()
        .contains("age: Value must be at least 18"));

    // Coercion failure wins; min_value never sees the token.
    let response = registry.route("signup abc", &Context::new());
    assert!(response
        .text_content()
        .unwrap()
        .contains("age: Invalid value for integer: abc"));
    assert!(!response.text_content().unwrap().contains("at least 18"));

    let response = registry.route("signup 21", &Context::new());
    assert!(response.success);
}

#[test]
fn test_handler_failure_never_escapes_routing() {
    let mut registry = CommandRegistry::new();
    registry
        .register(
            "flaky",
            CommandNode::new("Always fails.")
                .with_handler(|_| Err(anyhow::anyhow!("backend unreachable"))),
        )
        .unwrap();

    let response = registry.route("flaky", &Context::new());
    assert!(!response.success);
    assert!(response
        .text_content()
        .unwrap()
        .contains("An unexpected error occurred: backend unreachable"));
}

#[test]
fn test_payload_rendering_for_transport() {
    let registry = sample_registry();

    let payload = registry
        .route("user status set busy", &Context::new())
        .as_payload();
    assert_eq!(payload["response_type"], "ephemeral");
    assert!(payload["text"]
        .as_str()
        .unwrap()
        .contains("Status updated to 'busy'"));

    let mut registry = CommandRegistry::new();
    registry
        .register(
            "announce",
            CommandNode::new("Broadcast to the channel.").with_handler(|ctx| {
                Ok(Response::text(ctx.tokens.join(" ")).in_channel())
            }),
        )
        .unwrap();
    let payload = registry
        .route("announce ship it", &Context::new())
        .as_payload();
    assert_eq!(payload["response_type"], "in_channel");
    assert_eq!(payload["text"], "ship it");
}

#[test]
fn test_routing_is_stateless_across_invocations() {
    let registry = sample_registry();

    // A failing invocation leaves no trace in the next one.
    let first = registry.route("weather today", &Context::new());
    assert!(!first.success);

    let second = registry.route("weather today Kyoto", &Context::new());
    assert!(second.success);
    assert!(second.text_content().unwrap().contains("Kyoto"));

    let third = registry.route("weather today", &Context::new());
    assert_eq!(first, third);
}
