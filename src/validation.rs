//! Typed parameter validation engine.
//!
//! Declarative parameter schemas, process-wide registries of named types and
//! validators, and the coercion algorithm that turns raw string tokens into
//! typed values or aggregated error messages.
//!
//! Both registries are populated once at startup and read-only while requests
//! are served; registering additional types and validators is the supported
//! extension point for integrators.

use crate::response::Response;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

/// Validator function: returns an error message, or `None` when the value
/// passes. Validators always receive the original raw token, not the coerced
/// value.
pub type ValidatorFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Type coercion function: raw token in, typed value or error message out.
/// Receives the parameter schema so choice-style types can see their
/// configuration.
pub type TypeCoercer = Arc<dyn Fn(&str, &Parameter) -> Result<Value, String> + Send + Sync>;

/// Reference to a validator: inline function or registry lookup by name.
#[derive(Clone)]
pub enum ValidatorRef {
    Named(String),
    Inline(ValidatorFn),
}

impl fmt::Debug for ValidatorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidatorRef::Named(name) => write!(f, "Named({:?})", name),
            ValidatorRef::Inline(_) => write!(f, "Inline(..)"),
        }
    }
}

/// Parameter definition for command validation. Positionally significant
/// within a command's parameter list.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    /// Key into the parameter type registry.
    pub type_name: String,
    pub required: bool,
    pub help_text: Option<String>,
    /// Allowed values for `"choice"`-typed parameters.
    pub choices: Option<Vec<String>>,
    /// Typed fallback recorded verbatim when the parameter is absent.
    pub default: Option<Value>,
    pub validators: Vec<ValidatorRef>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            help_text: None,
            choices: None,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach an inline validator.
    pub fn validator(mut self, validator: ValidatorFn) -> Self {
        self.validators.push(ValidatorRef::Inline(validator));
        self
    }

    /// Attach a validator registered by name.
    pub fn named_validator(mut self, name: impl Into<String>) -> Self {
        self.validators.push(ValidatorRef::Named(name.into()));
        self
    }
}

/// Registered parameter type: human description plus coercion function.
#[derive(Clone)]
pub struct ParameterType {
    pub description: String,
    coerce: TypeCoercer,
}

/// Registry of parameter types (name -> description + coercion).
#[derive(Clone, Default)]
pub struct ParameterTypeRegistry {
    types: IndexMap<String, ParameterType>,
}

impl ParameterTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in types.
    pub fn with_standard_types() -> Self {
        let mut registry = Self::new();
        registry.register("string", "A text string", |value, _| {
            Ok(Value::String(value.to_string()))
        });
        registry.register("integer", "A whole number", |value, _| {
            coerce_integer(value)
        });
        registry.register("float", "A floating-point number", |value, _| {
            coerce_float(value)
        });
        registry.register("boolean", "A boolean value (true/false)", |value, _| {
            coerce_boolean(value)
        });
        registry.register("user_id", "A user reference", |value, _| {
            coerce_user_id(value)
        });
        registry.register("channel_id", "A channel reference", |value, _| {
            coerce_channel_id(value)
        });
        registry.register("email", "An email address", |value, _| coerce_email(value));
        registry.register("url", "A URL", |value, _| coerce_url(value));
        registry.register(
            "choice",
            "One of a predefined set of choices",
            coerce_choice,
        );
        registry
    }

    pub fn register(
        &mut self,
        type_name: &str,
        description: &str,
        coerce: impl Fn(&str, &Parameter) -> Result<Value, String> + Send + Sync + 'static,
    ) {
        self.types.insert(
            type_name.to_string(),
            ParameterType {
                description: description.to_string(),
                coerce: Arc::new(coerce),
            },
        );
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn describe(&self, type_name: &str) -> Option<&str> {
        self.types
            .get(type_name)
            .map(|ty| ty.description.as_str())
    }

    /// Coerce a value against a parameter's declared type. `None` when the
    /// type is not registered.
    pub fn coerce(&self, param: &Parameter, value: &str) -> Option<Result<Value, String>> {
        self.types
            .get(&param.type_name)
            .map(|ty| (ty.coerce)(value, param))
    }
}

/// Registry of named validators.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: IndexMap<String, ValidatorFn>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, validator: ValidatorFn) {
        self.validators.insert(name.to_string(), validator);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ValidatorFn> {
        self.validators.get(name)
    }
}

static PARAM_TYPES: OnceLock<RwLock<ParameterTypeRegistry>> = OnceLock::new();
static VALIDATORS: OnceLock<RwLock<ValidatorRegistry>> = OnceLock::new();

/// Process-wide parameter type registry, initialized with the built-in set.
pub fn param_type_registry() -> &'static RwLock<ParameterTypeRegistry> {
    PARAM_TYPES.get_or_init(|| RwLock::new(ParameterTypeRegistry::with_standard_types()))
}

/// Process-wide validator registry.
pub fn validator_registry() -> &'static RwLock<ValidatorRegistry> {
    VALIDATORS.get_or_init(|| RwLock::new(ValidatorRegistry::new()))
}

/// Register a new parameter type. Call during startup, before serving begins.
pub fn register_parameter_type(
    type_name: &str,
    description: &str,
    coerce: impl Fn(&str, &Parameter) -> Result<Value, String> + Send + Sync + 'static,
) {
    param_type_registry()
        .write()
        .register(type_name, description, coerce);
}

/// Register a named validator. Call during startup, before serving begins.
pub fn register_validator(
    name: &str,
    validator: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
) {
    validator_registry()
        .write()
        .register(name, Arc::new(validator));
}

fn coerce_integer(value: &str) -> Result<Value, String> {
    value
        .parse::<i64>()
        .map(Value::from)
        .map_err(|_| format!("Invalid value for integer: {}", value))
}

fn coerce_float(value: &str) -> Result<Value, String> {
    value
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("Invalid value for float: {}", value))
}

fn coerce_boolean(value: &str) -> Result<Value, String> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "1" | "y" | "t" => Ok(Value::Bool(true)),
        "no" | "false" | "0" | "n" | "f" => Ok(Value::Bool(false)),
        _ => Err(format!(
            "Invalid boolean value: {}. Expected yes/no, true/false, 1/0, etc.",
            value
        )),
    }
}

fn coerce_user_id(value: &str) -> Result<Value, String> {
    if !value.starts_with("<@U") && !value.starts_with('U') {
        return Err(format!(
            "Invalid user ID: {}. Expected format: <@UXXXXXXXX> or UXXXXXXXX",
            value
        ));
    }
    if value.starts_with("<@") && value.ends_with('>') {
        return Ok(Value::String(value[2..value.len() - 1].to_string()));
    }
    Ok(Value::String(value.to_string()))
}

fn coerce_channel_id(value: &str) -> Result<Value, String> {
    if !value.starts_with("<#C") && !value.starts_with('C') {
        return Err(format!(
            "Invalid channel ID: {}. Expected format: <#CXXXXXXXX> or CXXXXXXXX",
            value
        ));
    }
    if value.starts_with("<#") && value.ends_with('>') {
        // The mention form may carry a label: <#CXXXX|channel-name>
        let inner = &value[2..value.len() - 1];
        let id = inner.split('|').next().unwrap_or(inner);
        return Ok(Value::String(id.to_string()));
    }
    Ok(Value::String(value.to_string()))
}

fn email_display_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<mailto:([^|]+)\|([^>]+)>$").unwrap())
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap())
}

fn coerce_email(value: &str) -> Result<Value, String> {
    // Mention form: <mailto:addr|display> -- keep the display part.
    let email = match email_display_regex().captures(value) {
        Some(captures) => captures
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or(value)
            .to_string(),
        None => value.to_string(),
    };

    if !email_regex().is_match(&email) {
        return Err(format!("Invalid email address: {}", email));
    }
    Ok(Value::String(email))
}

fn url_display_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<(https?://[^|]+)\|([^>]+)>$").unwrap())
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").unwrap())
}

fn coerce_url(value: &str) -> Result<Value, String> {
    // Mention form: <https://example.com|example.com> -- keep the URL part.
    let url = match url_display_regex().captures(value) {
        Some(captures) => captures
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or(value)
            .to_string(),
        None => value.to_string(),
    };

    if !url_regex().is_match(&url) {
        return Err(format!("Invalid URL: {}", url));
    }
    Ok(Value::String(url))
}

fn coerce_choice(value: &str, param: &Parameter) -> Result<Value, String> {
    let choices = match param.choices.as_ref().filter(|c| !c.is_empty()) {
        Some(choices) => choices,
        None => panic!(
            "choice parameter '{}' has no choices configured; register the command tree to catch this at startup",
            param.name
        ),
    };
    if choices.iter().any(|choice| choice == value) {
        Ok(Value::String(value.to_string()))
    } else {
        Err(format!(
            "Invalid choice: {}. Valid options: {}",
            value,
            choices.join(", ")
        ))
    }
}

/// Validator factory: minimum string length.
pub fn min_length(min_len: usize) -> ValidatorFn {
    Arc::new(move |value| {
        if value.len() < min_len {
            Some(format!(
                "Value must be at least {} characters long",
                min_len
            ))
        } else {
            None
        }
    })
}

/// Validator factory: maximum string length.
pub fn max_length(max_len: usize) -> ValidatorFn {
    Arc::new(move |value| {
        if value.len() > max_len {
            Some(format!("Value must be at most {} characters long", max_len))
        } else {
            None
        }
    })
}

/// Validator factory: regex pattern match, with an optional custom message.
/// An invalid pattern is an integrator mistake and fails at construction.
pub fn pattern(regex: &str, error_msg: Option<&str>) -> ValidatorFn {
    let compiled = match Regex::new(regex) {
        Ok(compiled) => compiled,
        Err(err) => panic!("invalid validator pattern '{}': {}", regex, err),
    };
    let message = error_msg
        .map(str::to_string)
        .unwrap_or_else(|| "Value does not match required pattern".to_string());
    Arc::new(move |value| {
        if compiled.is_match(value) {
            None
        } else {
            Some(message.clone())
        }
    })
}

/// Validator factory: minimum numeric value.
pub fn min_value(min_val: f64) -> ValidatorFn {
    Arc::new(move |value| match value.parse::<f64>() {
        Ok(number) if number < min_val => Some(format!("Value must be at least {}", min_val)),
        Ok(_) => None,
        Err(_) => Some("Value must be a number".to_string()),
    })
}

/// Validator factory: maximum numeric value.
pub fn max_value(max_val: f64) -> ValidatorFn {
    Arc::new(move |value| match value.parse::<f64>() {
        Ok(number) if number > max_val => Some(format!("Value must be at most {}", max_val)),
        Ok(_) => None,
        Err(_) => Some("Value must be a number".to_string()),
    })
}

/// Result of validating a token list against a parameter list.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub valid: bool,
    /// Parameter name -> error message, in schema declaration order.
    pub errors: IndexMap<String, String>,
    /// Parameter name -> coerced typed value.
    pub validated_params: IndexMap<String, Value>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: IndexMap::new(),
            validated_params: IndexMap::new(),
        }
    }

    pub fn add_error(&mut self, param_name: &str, message: impl Into<String>) {
        self.valid = false;
        self.errors.insert(param_name.to_string(), message.into());
    }

    pub fn add_param(&mut self, param_name: &str, value: Value) {
        self.validated_params.insert(param_name.to_string(), value);
    }

    /// Render as a response: generic success, or one error line per failing
    /// parameter in declaration order.
    pub fn as_response(&self) -> Response {
        if self.valid {
            return Response::text("Validation passed");
        }
        let lines: Vec<String> = self
            .errors
            .iter()
            .map(|(param, error)| format!("{}: {}", param, error))
            .collect();
        Response::error(format!("Invalid parameters:\n{}", lines.join("\n")))
    }
}

/// Validate positional tokens and named parameters against a parameter list.
///
/// Named parameters seed the working map; positional tokens are then overlaid
/// by schema index, so a positional token wins over a named value for the
/// same slot. Every schema is evaluated (errors aggregate, they do not
/// short-circuit across parameters), and named entries that match no schema
/// pass through untyped.
pub fn validate_params(
    parameters: &[Parameter],
    tokens: &[String],
    named_params: &IndexMap<String, String>,
) -> ValidationResult {
    let mut working = named_params.clone();
    for (i, token) in tokens.iter().enumerate() {
        if let Some(param) = parameters.get(i) {
            working.insert(param.name.clone(), token.clone());
        }
    }

    let mut result = ValidationResult::new();
    for param in parameters {
        match working.get(&param.name) {
            // An empty or whitespace-only value behaves exactly like an
            // absent one.
            Some(value) if !value.trim().is_empty() => {
                let outcome = param_type_registry().read().coerce(param, value);
                match outcome {
                    None => panic!(
                        "parameter type '{}' is not registered; register it before serving commands",
                        param.type_name
                    ),
                    Some(Err(message)) => result.add_error(&param.name, message),
                    Some(Ok(coerced)) => match run_validators(param, value) {
                        Some(message) => result.add_error(&param.name, message),
                        None => result.add_param(&param.name, coerced),
                    },
                }
            }
            _ => {
                if param.required {
                    result.add_error(&param.name, "Required parameter missing");
                } else if let Some(default) = &param.default {
                    result.add_param(&param.name, default.clone());
                }
            }
        }
    }

    let schema_names: HashSet<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    for (name, value) in &working {
        if !schema_names.contains(name.as_str()) {
            result.add_param(name, Value::String(value.clone()));
        }
    }

    result
}

/// Run a parameter's validators against the original raw token. First failure
/// wins.
fn run_validators(param: &Parameter, raw: &str) -> Option<String> {
    for validator in &param.validators {
        let message = match validator {
            ValidatorRef::Inline(validator) => validator(raw),
            ValidatorRef::Named(name) => {
                let registry = validator_registry().read();
                match registry.get(name) {
                    Some(validator) => validator(raw),
                    None => panic!(
                        "validator '{}' is not registered; register it before serving commands",
                        name
                    ),
                }
            }
        };
        if message.is_some() {
            return message;
        }
    }
    None
}
