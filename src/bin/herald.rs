//! Herald Demo Shell
//!
//! Interactive stand-in for a chat transport: builds a sample command tree,
//! reads slash-command lines, routes them through the dispatcher, and prints
//! the rendered response payloads.

use clap::Parser;
use dialoguer::Input;
use herald::command::CommandNode;
use herald::config::ConfigLoader;
use herald::context::Context;
use herald::error::RegistryError;
use herald::logging::{init_logging, LoggingConfig};
use herald::registry::CommandRegistry;
use herald::response::{Response, ResponseContent};
use herald::validation::{min_length, Parameter};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "herald",
    about = "Demo shell for the Herald slash-command dispatcher"
)]
struct Cli {
    /// Route a single command line and exit instead of starting the shell
    command: Vec<String>,

    /// Path to a configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable logging entirely
    #[arg(short, long)]
    quiet: bool,

    /// Override the log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the full wire payload as JSON instead of rendered text
    #[arg(long)]
    json: bool,

    /// Invoking user id placed in the context
    #[arg(long, default_value = "U0DEMO")]
    invoker: String,

    /// Channel id placed in the context
    #[arg(long, default_value = "C0DEMO")]
    channel: String,
}

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Herald demo shell starting");

    let registry = match build_demo_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to build command tree: {}", e);
            process::exit(1);
        }
    };

    let ctx = Context::for_invocation(cli.invoker.clone(), cli.channel.clone());

    if !cli.command.is_empty() {
        let line = cli.command.join(" ");
        let response = registry.route(&line, &ctx);
        let ok = response.success;
        render(&response, cli.json);
        process::exit(if ok { 0 } else { 1 });
    }

    println!("Herald demo shell. Type 'help' for commands, 'exit' to leave.");
    loop {
        let line: String = match Input::new()
            .with_prompt("herald")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(_) => break,
        };

        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        let response = registry.route(&line, &ctx);
        render(&response, cli.json);
    }

    info!("Herald demo shell exiting");
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load()
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    config
}

/// Sample command tree: user management, weather lookups, and an echo command
/// that takes free-form arguments.
fn build_demo_registry() -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();

    let mut user = CommandNode::new("Commands for user management and information.").rich_help(true);
    user.register_child(
        "list",
        CommandNode::new("List users in the workspace.").with_handler(|_| {
            Ok(Response::text(
                "Here are the users in your workspace:\n• ada\n• grace\n• linus",
            ))
        }),
    );
    user.register_child(
        "info",
        CommandNode::new("Show information about a user.")
            .usage_example("user info <@U12345678>")
            .with_parameters(vec![Parameter::new("user", "user_id")
                .required()
                .help("User to look up, as a mention or bare id")])
            .with_handler(|ctx| {
                let user = ctx.param_str("user").unwrap_or("unknown");
                Ok(Response::text(format!(
                    "User {}: member since 2024-02-11, status active",
                    user
                )))
            }),
    );

    let mut status = CommandNode::new("Set or get your status.");
    status.register_child(
        "set",
        CommandNode::new("Set your status message.")
            .usage_example("user status set <text> [visibility]")
            .with_parameters(vec![
                Parameter::new("text", "string")
                    .required()
                    .validator(min_length(3))
                    .help("Status message, at least 3 characters"),
                Parameter::new("visibility", "choice")
                    .choices(["auto", "away", "dnd"])
                    .default_value("auto")
                    .help("Who the status is shown to"),
            ])
            .with_handler(|ctx| {
                let text = ctx.param_str("text").unwrap_or("");
                let visibility = ctx.param_str("visibility").unwrap_or("auto");
                Ok(Response::success(format!(
                    "Status updated to '{}' ({})",
                    text, visibility
                )))
            }),
    );
    status.register_child(
        "get",
        CommandNode::new("Show your current status.")
            .with_handler(|_| Ok(Response::text("Your current status: Available"))),
    );
    user.register_child("status", status);
    registry.register("user", user)?;

    let mut weather = CommandNode::new("Weather lookups.");
    weather.register_child(
        "today",
        CommandNode::new("Today's weather for a location.")
            .usage_example("weather today <location>")
            .with_parameters(vec![Parameter::new("location", "string")
                .required()
                .help("City or region to look up")])
            .with_handler(|ctx| {
                let location = ctx.param_str("location").unwrap_or("somewhere");
                Ok(Response::text(format!(
                    "Weather for {}: 21°C, clear skies",
                    location
                )))
            }),
    );
    weather.register_child(
        "forecast",
        CommandNode::new("Five-day forecast.").with_handler(|_| {
            Ok(Response::text(
                "Forecast: clear today, rain tomorrow, sun after that",
            ))
        }),
    );
    registry.register("weather", weather)?;

    registry.register(
        "echo",
        CommandNode::new("Echo the arguments back, visible to the channel.").with_handler(|ctx| {
            Ok(Response::text(ctx.tokens.join(" ")).in_channel())
        }),
    )?;

    Ok(registry)
}

fn render(response: &Response, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(&response.as_payload()) {
            Ok(payload) => println!("{}", payload),
            Err(e) => eprintln!("Failed to render payload: {}", e),
        }
        return;
    }

    match &response.content {
        ResponseContent::Text(text) => {
            if response.success {
                println!("{}", text);
            } else {
                println!("{}", text.red());
            }
        }
        ResponseContent::Blocks(rendered) => {
            match serde_json::to_string_pretty(rendered) {
                Ok(payload) => println!("{}", payload.dimmed()),
                Err(e) => eprintln!("Failed to render blocks: {}", e),
            }
        }
    }
}
