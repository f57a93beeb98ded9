//! Command tree nodes.
//!
//! A `CommandNode` carries its identity (name and full path, stamped at
//! registration), an ordered map of subcommands, declared parameters, help
//! metadata, and an optional execution handler supplied by the integrator.
//! Nodes with children and no handler act as pure routers: they only group
//! subcommands and answer with their own help.

use crate::blocks;
use crate::context::Context;
use crate::error::RegistryError;
use crate::response::Response;
use crate::validation::{validate_params, validator_registry, Parameter, ValidatorRef};
use indexmap::IndexMap;
use std::fmt;

/// Integrator-supplied execution logic. A failure is absorbed at the execute
/// boundary and rendered as a generic error response; it never propagates.
pub type CommandHandler = Box<dyn Fn(&Context) -> anyhow::Result<Response> + Send + Sync>;

/// One node in the command tree.
pub struct CommandNode {
    name: String,
    path: String,
    description: String,
    /// Subcommands, keyed by lowercase name, in registration order.
    children: IndexMap<String, CommandNode>,
    parameters: Vec<Parameter>,
    accepts_arguments: bool,
    short_help: Option<String>,
    long_help: Option<String>,
    usage_example: Option<String>,
    use_rich_help: bool,
    handler: Option<CommandHandler>,
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("parameters", &self.parameters.len())
            .field("accepts_arguments", &self.accepts_arguments)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl CommandNode {
    /// Create an unregistered node. The description is mandatory; it feeds
    /// help output when no explicit overrides are set. Name and path are
    /// stamped when the node is registered into a tree.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            description: description.into(),
            children: IndexMap::new(),
            parameters: Vec::new(),
            accepts_arguments: true,
            short_help: None,
            long_help: None,
            usage_example: None,
            use_rich_help: false,
            handler: None,
        }
    }

    /// Node with execution logic attached.
    pub fn with_handler(
        mut self,
        handler: impl Fn(&Context) -> anyhow::Result<Response> + Send + Sync + 'static,
    ) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn short_help(mut self, text: impl Into<String>) -> Self {
        self.short_help = Some(text.into());
        self
    }

    pub fn long_help(mut self, text: impl Into<String>) -> Self {
        self.long_help = Some(text.into());
        self
    }

    pub fn usage_example(mut self, text: impl Into<String>) -> Self {
        self.usage_example = Some(text.into());
        self
    }

    pub fn rich_help(mut self, enabled: bool) -> Self {
        self.use_rich_help = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn accepts_arguments(&self) -> bool {
        self.accepts_arguments
    }

    /// Override whether leftover tokens are accepted as arguments. Intended
    /// for use after subcommands have been registered, which flips the
    /// default off.
    pub fn set_accepts_arguments(&mut self, accepts: bool) {
        self.accepts_arguments = accepts;
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Case-insensitive child lookup.
    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.get(&name.to_lowercase())
    }

    pub fn children(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.values()
    }

    /// First line of help shown in listings.
    pub fn short_description(&self) -> &str {
        if let Some(short) = &self.short_help {
            return short;
        }
        self.description.lines().next().unwrap_or("")
    }

    /// Register a subcommand under this node. Stamps the child's path (and
    /// the paths of its whole subtree) and returns a reference to the
    /// registered child. Registering the first child turns off argument
    /// acceptance unless it is explicitly re-enabled afterwards.
    pub fn register_child(&mut self, name: &str, mut node: CommandNode) -> &mut CommandNode {
        if self.children.is_empty() {
            self.accepts_arguments = false;
        }
        let child_path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", self.path, name)
        };
        node.stamp(&child_path, name);
        tracing::debug!(parent = %self.path, child = %name, "registered subcommand");
        let key = name.to_lowercase();
        self.children.insert(key.clone(), node);
        match self.children.get_mut(&key) {
            Some(child) => child,
            None => unreachable!("child was just inserted"),
        }
    }

    /// Stamp identity onto this node and re-stamp its subtree so every path
    /// reflects the full lineage.
    pub(crate) fn stamp(&mut self, path: &str, name: &str) {
        self.name = name.to_string();
        self.path = path.to_string();
        let parent_path = self.path.clone();
        for child in self.children.values_mut() {
            let child_name = child.name.clone();
            child.stamp(&format!("{} {}", parent_path, child_name), &child_name);
        }
    }

    /// Check every parameter schema in this subtree for configuration
    /// mistakes. Called at registration, before any request is served.
    pub(crate) fn validate_schemas(&self) -> Result<(), RegistryError> {
        let type_registry = crate::validation::param_type_registry().read();
        let named_validators = validator_registry().read();
        for param in &self.parameters {
            if param.type_name == "choice"
                && param.choices.as_ref().map_or(true, |c| c.is_empty())
            {
                return Err(RegistryError::ChoiceWithoutChoices {
                    command: self.path.clone(),
                    parameter: param.name.clone(),
                });
            }
            if !type_registry.contains(&param.type_name) {
                return Err(RegistryError::UnknownParameterType {
                    command: self.path.clone(),
                    parameter: param.name.clone(),
                    type_name: param.type_name.clone(),
                });
            }
            for validator in &param.validators {
                if let ValidatorRef::Named(name) = validator {
                    if !named_validators.contains(name) {
                        return Err(RegistryError::UnknownValidator {
                            command: self.path.clone(),
                            parameter: param.name.clone(),
                            validator: name.clone(),
                        });
                    }
                }
            }
        }
        for child in self.children.values() {
            child.validate_schemas()?;
        }
        Ok(())
    }

    /// Execute this node against an invocation context whose tokens have
    /// already been resolved by the router (or supplied directly).
    pub fn execute(&self, ctx: &Context) -> Response {
        tracing::debug!(command = %self.path, tokens = ctx.tokens.len(), "executing command");

        // Help requests win over everything else. "help <child>" drills one
        // level down; anything after that is not interpreted.
        if let Some(first) = ctx.tokens.first() {
            if first.eq_ignore_ascii_case("help") {
                if let Some(second) = ctx.tokens.get(1) {
                    if let Some(child) = self.child(second) {
                        return child.show_help();
                    }
                }
                return self.show_help();
            }
        }

        let validation = validate_params(&self.parameters, &ctx.tokens, &ctx.named_params);
        if !validation.valid {
            return validation.as_response();
        }

        // A leftover token that names no child is an invalid subcommand when
        // this node groups subcommands and does not take arguments itself.
        if self.has_children() && !self.accepts_arguments {
            if let Some(first) = ctx.tokens.first() {
                if self.child(first).is_none() {
                    return self.invalid_subcommand(first);
                }
            }
        }

        // Router nodes without custom logic answer with their own help.
        if self.has_children() && self.handler.is_none() {
            return self.show_help();
        }

        match &self.handler {
            Some(handler) => {
                let run_ctx = ctx.clone().with_validated(validation.validated_params);
                match handler(&run_ctx) {
                    Ok(response) => response,
                    Err(err) => {
                        tracing::error!(command = %self.path, error = %err, "command handler failed");
                        Response::error(format!("An unexpected error occurred: {}", err))
                    }
                }
            }
            None => Response::failure(format!(
                "Command '{}' doesn't have an implementation.",
                self.name
            )),
        }
    }

    fn invalid_subcommand(&self, token: &str) -> Response {
        Response::error(format!(
            "'{}' is not a valid subcommand of '{}'.\n\n{}",
            token,
            self.path,
            self.help_text()
        ))
    }

    /// Detailed help for this node, rendered per its formatting preference.
    pub fn show_help(&self) -> Response {
        if self.use_rich_help {
            self.rich_help_response()
        } else {
            Response::text(self.help_text())
        }
    }

    fn long_description(&self) -> &str {
        self.long_help.as_deref().unwrap_or(&self.description)
    }

    fn usage(&self) -> String {
        self.usage_example
            .clone()
            .unwrap_or_else(|| self.path.clone())
    }

    fn help_text(&self) -> String {
        let mut text = format!("*Help: {}*\n\n", self.path);
        text.push_str(self.long_description());
        text.push_str("\n\n");
        text.push_str(&format!("*Usage:*\n`{}`\n\n", self.usage()));

        if !self.parameters.is_empty() {
            text.push_str("*Parameters:*\n");
            for param in &self.parameters {
                text.push_str(&parameter_help_line(param));
                text.push('\n');
            }
            text.push('\n');
        }

        if self.has_children() {
            text.push_str(&self.subcommand_listing());
        }

        text
    }

    fn rich_help_response(&self) -> Response {
        let mut rendered = vec![blocks::header(&format!("Help: {}", self.path))];
        rendered.push(blocks::section(self.long_description()));
        rendered.push(blocks::section(&format!("*Usage:*\n`{}`", self.usage())));

        if !self.parameters.is_empty() {
            let mut text = String::from("*Parameters:*\n");
            for param in &self.parameters {
                text.push_str(&parameter_help_line(param));
                text.push('\n');
            }
            rendered.push(blocks::section(&text));
        }

        if self.has_children() {
            rendered.push(blocks::section(&self.subcommand_listing()));
        }

        rendered.push(blocks::divider());
        rendered.push(blocks::context(&[
            "Type `help` for a list of all commands.".to_string()
        ]));

        Response::with_blocks(rendered)
    }

    fn subcommand_listing(&self) -> String {
        let mut text = String::from("*Available Subcommands:*\n");
        for child in self.children.values() {
            text.push_str(&format!(
                "• `{}`: {}\n",
                child.name,
                child.short_description()
            ));
        }
        text.push_str(&format!(
            "\nUse `{} help <subcommand>` for more details on a specific subcommand.",
            self.path
        ));
        text
    }
}

fn parameter_help_line(param: &Parameter) -> String {
    let mut line = if param.required {
        format!("• `{}` ({}, required)", param.name, param.type_name)
    } else {
        format!("• `{}` ({})", param.name, param.type_name)
    };
    if let Some(help) = &param.help_text {
        line.push_str(": ");
        line.push_str(help);
    }
    line
}
