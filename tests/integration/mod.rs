//! Integration tests for the Herald command-dispatch framework

mod config_integration;
mod custom_registration;
mod end_to_end;

use herald::command::CommandNode;
use herald::registry::CommandRegistry;
use herald::response::Response;
use herald::validation::Parameter;

/// Registry with the tree used across the routing and help tests:
///
/// - `weather` with `today <location>` and `forecast`
/// - `user` with `list` and `status set|get`
/// - `echo`, a leaf that takes free-form arguments
pub fn sample_registry() -> CommandRegistry {
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

    let mut user = CommandNode::new("Commands for user management and information.");
    user.register_child(
        "list",
        CommandNode::new("List users in the workspace.")
            .with_handler(|_| Ok(Response::text("users: ada, grace"))),
    );
    let mut status = CommandNode::new("Set or get your status.");
    status.register_child(
        "set",
        CommandNode::new("Set your status message.")
            .with_parameters(vec![Parameter::new("text", "string").required()])
            .with_handler(|ctx| {
                let text = ctx.param_str("text").unwrap_or("");
                Ok(Response::success(format!("Status updated to '{}'", text)))
            }),
    );
    status.register_child(
        "get",
        CommandNode::new("Show your current status.")
            .with_handler(|_| Ok(Response::text("Your current status: Available"))),
    );
    user.register_child("status", status);
    registry.register("user", user).unwrap();

    registry
        .register(
            "echo",
            CommandNode::new("Echo the arguments back.")
                .with_handler(|ctx| Ok(Response::text(ctx.tokens.join(" ")))),
        )
        .unwrap();

    registry
}
