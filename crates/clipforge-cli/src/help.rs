//! Help text generated from the command table.

use crate::params::ParamSpec;
use crate::registry::{CommandSpec, COMMANDS};
use serde::Serialize;
use std::fmt::Write as _;

/// One-line usage.
pub const USAGE: &str = "Usage: clipforge <input> <command> <output> [args...]";

/// `name <required> [optional=default] ...`
pub fn signature(spec: &CommandSpec) -> String {
    let mut out = spec.name.to_string();
    for param in spec.params {
        let _ = write!(out, " {param}");
    }
    out
}

/// Usage plus every command with its signature and summary.
pub fn general_help() -> String {
    let width = COMMANDS
        .iter()
        .map(|c| signature(c).len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{USAGE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Commands:");
    for spec in COMMANDS {
        let _ = writeln!(out, "  {:<width$}  {}", signature(spec), spec.summary);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Run `clipforge help <command>` for details on one command.");
    let _ = write!(out, "Run `clipforge help --json` for the command table as JSON.");
    out
}

/// Signature, summary and parameter list of one command.
pub fn command_help(spec: &CommandSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "clipforge <input> {} <output>", signature(spec));
    let _ = writeln!(out);
    let _ = write!(out, "{}", spec.summary);
    if spec.takes_second_source() {
        let _ = write!(out, "\n\n<other> is the path of a second video.");
    }
    if !spec.params.is_empty() {
        let _ = write!(out, "\n\nArguments (positional):");
        for param in spec.params {
            let need = if param.is_required() { "required" } else { "optional" };
            let _ = write!(
                out,
                "\n  {:<12} {} ({})",
                param.name,
                param.kind.expected(),
                need
            );
        }
    }
    out
}

#[derive(Serialize)]
struct CommandEntry {
    name: &'static str,
    summary: &'static str,
    params: &'static [ParamSpec],
}

/// The whole command table as pretty-printed JSON, for scripts and shell
/// completion generators.
pub fn commands_json() -> serde_json::Result<String> {
    let entries: Vec<CommandEntry> = COMMANDS
        .iter()
        .map(|spec| CommandEntry {
            name: spec.name,
            summary: spec.summary,
            params: spec.params,
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find;

    #[test]
    fn test_signature() {
        let crop = find("crop").unwrap();
        assert_eq!(signature(crop), "crop <x> <y> <w> <h>");
        let motion = find("motion_blur").unwrap();
        assert_eq!(signature(motion), "motion_blur [size=15] [angle=0.0]");
        assert_eq!(signature(find("gray").unwrap()), "gray");
    }

    #[test]
    fn test_general_help_lists_everything() {
        let text = general_help();
        assert!(text.starts_with(USAGE));
        for spec in COMMANDS {
            assert!(text.contains(spec.summary), "missing {}", spec.name);
        }
    }

    #[test]
    fn test_command_help() {
        let text = command_help(find("overlay").unwrap());
        assert!(text.starts_with("clipforge <input> overlay <other> [x=0] [y=0] <output>"));
        assert!(text.contains("second video"));
        assert!(text.contains("an integer (optional)"));
    }

    #[test]
    fn test_commands_json() {
        let json: serde_json::Value = serde_json::from_str(&commands_json().unwrap()).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), COMMANDS.len());

        let overlay = list.iter().find(|c| c["name"] == "overlay").unwrap();
        let params = overlay["params"].as_array().unwrap();
        assert_eq!(params[0]["name"], "other");
        assert_eq!(params[0]["kind"], "text");
        assert!(params[0]["default"].is_null());
        assert_eq!(params[1]["kind"], "int");
        assert_eq!(params[1]["default"], 0);

        let text = list.iter().find(|c| c["name"] == "text").unwrap();
        assert_eq!(text["params"][0]["default"], "Text");
        assert_eq!(text["params"][3]["default"], 1.0);
    }
}
