//! Error types for the Herald command-dispatch framework.
//!
//! User-input problems (unknown commands, bad arguments) never surface here;
//! they become error `Response`s. These types cover integrator configuration
//! mistakes, which are rejected at registration time, before any request is
//! served.

use thiserror::Error;

/// Registration-time configuration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Parameter '{parameter}' on command '{command}': choice parameters require a non-empty choice set")]
    ChoiceWithoutChoices { command: String, parameter: String },

    #[error("Parameter '{parameter}' on command '{command}' references unregistered type '{type_name}'")]
    UnknownParameterType {
        command: String,
        parameter: String,
        type_name: String,
    },

    #[error("Parameter '{parameter}' on command '{command}' references unregistered validator '{validator}'")]
    UnknownValidator {
        command: String,
        parameter: String,
        validator: String,
    },
}

/// Configuration-loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
