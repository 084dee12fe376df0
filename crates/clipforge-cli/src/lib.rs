//! Clipforge CLI - command dispatch for the batch editor
//!
//! - `registry`: the command table (names, parameters, defaults, handlers)
//! - `params`: token conversion and default binding
//! - `editor`: opens the input once, resolves and runs commands
//! - `help`: usage text generated from the table
//! - `config`: environment-driven runtime settings
//! - `cli`: argument capture and exit statuses

pub mod cli;
pub mod config;
pub mod editor;
mod handlers;
pub mod help;
pub mod params;
pub mod registry;

pub use cli::{exit_status, Cli, Request, RunRequest};
pub use config::RuntimeConfig;
pub use editor::{Editor, Invocation, Job, Outcome};
pub use params::{Bindings, ParamKind, ParamSpec};
pub use registry::CommandSpec;
