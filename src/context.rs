//! Invocation context.
//!
//! A plain value object threaded through routing, validation, and execution.
//! Each stage extends it by value rather than mutating shared state: the
//! router attaches the leftover argument tokens, validation attaches the
//! coerced parameter map.

use indexmap::IndexMap;
use serde_json::Value;

/// Per-invocation execution context. Fresh per call, never shared.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Identifier of the invoking user.
    pub invoker: Option<String>,
    /// Workspace or channel the invocation came from.
    pub channel: Option<String>,
    /// Argument tokens left over after tree resolution.
    pub tokens: Vec<String>,
    /// Named parameters supplied by the transport envelope.
    pub named_params: IndexMap<String, String>,
    /// Typed parameters produced by validation.
    pub validated_params: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for an invocation from a known user and channel.
    pub fn for_invocation(invoker: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            invoker: Some(invoker.into()),
            channel: Some(channel.into()),
            ..Self::default()
        }
    }

    /// Copy of this context with the argument tokens attached.
    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Copy of this context with a named parameter added.
    pub fn with_named_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.named_params.insert(name.into(), value.into());
        self
    }

    /// Copy of this context with the validated parameter map attached.
    pub fn with_validated(mut self, params: IndexMap<String, Value>) -> Self {
        self.validated_params = params;
        self
    }

    /// Validated parameter by name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.validated_params.get(name)
    }

    /// Validated string parameter by name.
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(Value::as_str)
    }
}
