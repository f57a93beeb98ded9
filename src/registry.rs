//! Command registry and router.
//!
//! Holds the root commands and maps a raw invocation string to the deepest
//! matching node. Tokens consumed while walking the tree select subcommands;
//! the rest are handed to the resolved node as arguments. Routing never fails
//! for user input: every problem becomes an error `Response`. Only
//! registration, which runs before any request is served, can reject an
//! integrator mistake.

use crate::command::CommandNode;
use crate::context::Context;
use crate::error::RegistryError;
use crate::response::Response;
use indexmap::IndexMap;

/// Registry of top-level commands.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Root commands, keyed by lowercase name, in registration order.
    commands: IndexMap<String, CommandNode>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level command. Stamps the node's identity, re-stamps
    /// its subtree, and checks every parameter schema in it; configuration
    /// mistakes are rejected here rather than surfacing mid-request.
    pub fn register(
        &mut self,
        name: &str,
        mut node: CommandNode,
    ) -> Result<&mut CommandNode, RegistryError> {
        node.stamp(name, name);
        node.validate_schemas()?;
        tracing::info!(command = %name, "registered top-level command");
        let key = name.to_lowercase();
        self.commands.insert(key.clone(), node);
        match self.commands.get_mut(&key) {
            Some(registered) => Ok(registered),
            None => unreachable!("command was just inserted"),
        }
    }

    /// Case-insensitive root command lookup.
    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.commands.get(&name.to_lowercase())
    }

    pub fn commands(&self) -> impl Iterator<Item = &CommandNode> {
        self.commands.values()
    }

    /// Route a raw command string to the deepest matching node and execute
    /// it. The context arrives without tokens; the leftover argument tokens
    /// are attached here.
    pub fn route(&self, raw: &str, ctx: &Context) -> Response {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return self.top_level_help();
        };

        // The leading token "help" is reserved; it never resolves as a root
        // command name. "help <command>" drills into that command's help.
        if first.eq_ignore_ascii_case("help") {
            if let Some(second) = tokens.get(1) {
                if let Some(command) = self.get(second) {
                    return command.show_help();
                }
            }
            return self.top_level_help();
        }

        let Some(root) = self.get(first) else {
            return Response::error(format!(
                "Unknown command: {}. Type 'help' to see available commands.",
                first.to_lowercase()
            ));
        };

        // Walk the tree while tokens keep naming subcommands. A "help" token
        // at any depth stops the descent with the current node as target.
        let mut node = root;
        let mut consumed = 1;
        while let Some(token) = tokens.get(consumed) {
            if token.eq_ignore_ascii_case("help") {
                break;
            }
            match node.child(token) {
                Some(child) => {
                    node = child;
                    consumed += 1;
                }
                None => break,
            }
        }

        let leftover: Vec<String> = tokens[consumed..].iter().map(|t| t.to_string()).collect();
        tracing::debug!(command = %node.path(), args = leftover.len(), "resolved route");
        let run_ctx = ctx.clone().with_tokens(leftover);
        node.execute(&run_ctx)
    }

    /// Listing of every root command with its short description.
    fn top_level_help(&self) -> Response {
        let mut text = String::from("*Available Commands:*\n");
        for command in self.commands.values() {
            text.push_str(&format!(
                "• `{}`: {}\n",
                command.name(),
                command.short_description()
            ));
        }
        text.push_str("\nType `<command> help` for more details on a specific command.");
        Response::text(text)
    }
}
