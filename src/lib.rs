//! Herald: Command Dispatch for Chat-Platform Slash Commands
//!
//! A command-dispatch framework that parses raw slash-command text into a path
//! through a tree of named commands, validates typed parameters against
//! declared schemas, and produces a structured response for a transport
//! adapter to deliver.

pub mod blocks;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod registry;
pub mod response;
pub mod validation;
