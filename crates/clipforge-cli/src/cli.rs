//! Command-line surface: argument capture, request classification and exit
//! statuses.

use clap::Parser;
use clipforge_core::ClipforgeError;
use std::path::PathBuf;

/// Batch frame-sequence editor.
#[derive(Debug, Parser)]
#[command(
    name = "clipforge",
    version,
    about = "Apply one transformation to a whole video",
    disable_help_flag = true
)]
pub struct Cli {
    /// <input> <command> <output> [args...], `help [command]` or `help --json`
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// A command to run on one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub input: PathBuf,
    pub command: String,
    pub output: PathBuf,
    pub args: Vec<String>,
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Too few arguments.
    Usage,
    /// General help, or help for one command.
    Help(Option<String>),
    /// The command table as JSON.
    List,
    Run(RunRequest),
}

fn is_help(arg: &str) -> bool {
    matches!(arg, "help" | "-h" | "--help")
}

impl Request {
    /// Classify positional arguments (program name excluded).
    ///
    /// A leading help word is only a request when at most one argument
    /// follows it; a full run line whose input is named `help` still runs.
    pub fn from_args(args: &[String]) -> Self {
        match args {
            [first, flag] if is_help(first) && flag == "--json" => Self::List,
            [first, rest @ ..] if is_help(first) && rest.len() <= 1 => {
                Self::Help(rest.first().cloned())
            }
            [_, command, flag, ..] if flag == "-h" || flag == "--help" => {
                Self::Help(Some(command.clone()))
            }
            [input, command, output, rest @ ..] => Self::Run(RunRequest {
                input: PathBuf::from(input),
                command: command.clone(),
                output: PathBuf::from(output),
                args: rest.to_vec(),
            }),
            _ => Self::Usage,
        }
    }
}

impl Cli {
    pub fn request(&self) -> Request {
        Request::from_args(&self.args)
    }
}

/// Exit status for a failed run.
///
/// An unknown command is reported but still exits 0.
pub fn exit_status(err: &ClipforgeError) -> u8 {
    match err {
        ClipforgeError::UnknownCommand(_) => 0,
        ClipforgeError::SourceOpen { .. } => 1,
        _ => 2,
    }
}

/// Exit status for too few arguments.
pub const USAGE_STATUS: u8 = 1;
