//! Integration tests for the extension points: custom parameter types,
//! named validators, and registration-time rejection of bad schemas.

use herald::command::CommandNode;
use herald::context::Context;
use herald::error::RegistryError;
use herald::registry::CommandRegistry;
use herald::response::Response;
use herald::validation::{register_parameter_type, register_validator, Parameter};
use serde_json::Value;

#[test]
fn test_custom_parameter_type_end_to_end() {
    register_parameter_type(
        "phone_number",
        "A phone number (10-15 digits, optionally starting with +)",
        |value, _| {
            let digits = value.strip_prefix('+').unwrap_or(value);
            if digits.len() >= 10
                && digits.len() <= 15
                && digits.bytes().all(|b| b.is_ascii_digit())
            {
                Ok(Value::String(value.to_string()))
            } else {
                Err(format!(
                    "Invalid phone number: {}. Expected format: +1234567890",
                    value
                ))
            }
        },
    );

    let mut registry = CommandRegistry::new();
    registry
        .register(
            "page",
            CommandNode::new("Page the on-call phone.")
                .with_parameters(vec![Parameter::new("phone", "phone_number").required()])
                .with_handler(|ctx| {
                    Ok(Response::success(format!(
                        "paging {}",
                        ctx.param_str("phone").unwrap_or("?")
                    )))
                }),
        )
        .unwrap();

    let response = registry.route("page +12065551234", &Context::new());
    assert!(response.success);

    let response = registry.route("page 555", &Context::new());
    assert!(!response.success);
    assert!(response
        .text_content()
        .unwrap()
        .contains("phone: Invalid phone number: 555"));
}

#[test]
fn test_named_validator_end_to_end() {
    register_validator("lowercase_only", |value| {
        if value.chars().any(|c| c.is_ascii_uppercase()) {
            Some("Value must be lowercase".to_string())
        } else {
            None
        }
    });

    let mut registry = CommandRegistry::new();
    registry
        .register(
            "tagname",
            CommandNode::new("Create a tag.")
                .with_parameters(vec![Parameter::new("name", "string")
                    .required()
                    .named_validator("lowercase_only")])
                .with_handler(|ctx| {
                    Ok(Response::success(format!(
                        "tag {} created",
                        ctx.param_str("name").unwrap_or("?")
                    )))
                }),
        )
        .unwrap();

    let response = registry.route("tagname infra", &Context::new());
    assert!(response.success);

    let response = registry.route("tagname Infra", &Context::new());
    assert!(!response.success);
    assert!(response
        .text_content()
        .unwrap()
        .contains("name: Value must be lowercase"));
}

#[test]
fn test_registration_rejects_choice_without_choices() {
    let mut registry = CommandRegistry::new();
    let node =
        CommandNode::new("Pick a mode.").with_parameters(vec![Parameter::new("mode", "choice")]);
    let err = registry.register("pick", node).unwrap_err();
    assert!(matches!(err, RegistryError::ChoiceWithoutChoices { .. }));
}

#[test]
fn test_registration_rejects_unknown_type() {
    let mut registry = CommandRegistry::new();
    let node = CommandNode::new("Odd command.")
        .with_parameters(vec![Parameter::new("thing", "quaternion")]);
    let err = registry.register("odd", node).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::UnknownParameterType { ref type_name, .. } if type_name == "quaternion"
    ));
}

#[test]
fn test_registration_rejects_unknown_validator() {
    let mut registry = CommandRegistry::new();
    let node = CommandNode::new("Odd command.").with_parameters(vec![Parameter::new(
        "thing", "string",
    )
    .named_validator("definitely_not_registered")]);
    let err = registry.register("odd2", node).unwrap_err();
    assert!(matches!(err, RegistryError::UnknownValidator { .. }));
}

#[test]
fn test_registration_checks_nested_subcommands() {
    let mut registry = CommandRegistry::new();
    let mut parent = CommandNode::new("Parent command.");
    parent.register_child(
        "inner",
        CommandNode::new("Broken inner command.")
            .with_parameters(vec![Parameter::new("mode", "choice")]),
    );
    let err = registry.register("outer", parent).unwrap_err();
    match err {
        RegistryError::ChoiceWithoutChoices { command, parameter } => {
            assert_eq!(command, "outer inner");
            assert_eq!(parameter, "mode");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
