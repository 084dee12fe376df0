//! clipforge - apply one transformation to a whole video
//!
//! Usage: clipforge <input> <command> <output> [args...]

use anyhow::Result;
use clap::Parser;
use clipforge_cli::cli::USAGE_STATUS;
use clipforge_cli::{exit_status, help, registry, Cli, Editor, Request, RunRequest, RuntimeConfig};
use clipforge_core::ClipforgeError;
use clipforge_media::{FfmpegMedia, MediaBackend};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

fn main() -> ExitCode {
    let config = RuntimeConfig::from_env();
    if let Err(e) = config.init_logging() {
        eprintln!("warning: {e:#}");
    }
    config.init_thread_pool();

    let cli = Cli::parse();
    match cli.request() {
        Request::Usage => {
            eprintln!("{}", help::general_help());
            ExitCode::from(USAGE_STATUS)
        }
        Request::Help(None) => {
            println!("{}", help::general_help());
            ExitCode::SUCCESS
        }
        Request::List => match help::commands_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(2)
            }
        },
        Request::Help(Some(name)) => {
            match registry::find(&name) {
                Some(spec) => println!("{}", help::command_help(spec)),
                None => {
                    eprintln!("Unknown command: {name}");
                    println!("{}", help::general_help());
                }
            }
            ExitCode::SUCCESS
        }
        Request::Run(request) => match run(&request) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => report(&err),
        },
    }
}

fn run(request: &RunRequest) -> Result<()> {
    let media: Arc<dyn MediaBackend> = Arc::new(FfmpegMedia::default());
    let mut editor = Editor::open(&request.input, media)?;
    let outcome = editor.execute(&request.command, &request.output, &request.args)?;
    info!("{:?}", outcome);
    println!("Done: {}", request.output.display());
    Ok(())
}

fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ClipforgeError>() {
        Some(ClipforgeError::UnknownCommand(name)) => {
            eprintln!("Unknown command: {name}");
            eprintln!("Run `clipforge help` for the list of commands.");
            ExitCode::SUCCESS
        }
        Some(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(exit_status(e))
        }
        None => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
