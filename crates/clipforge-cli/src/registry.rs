//! The command table.
//!
//! Each entry names a command, declares its parameters with defaults, and
//! points at the handler that runs it.

use crate::editor::{Job, Outcome};
use crate::handlers;
use crate::params::{Bindings, ParamKind, ParamSpec};
use clipforge_core::Result;
use clipforge_ops::{color, composite, filter, geometric, temporal};

/// Runs a resolved command against an open job.
pub type Handler = fn(&mut Job<'_>, &Bindings) -> Result<Outcome>;

/// One registered command.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub params: &'static [ParamSpec],
    pub run: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl CommandSpec {
    /// Whether this command reads a second video named by its first argument.
    pub fn takes_second_source(&self) -> bool {
        self.params.first().is_some_and(|p| p.name == "other")
    }
}

macro_rules! command {
    ($name:literal, $summary:literal, $params:expr, $run:expr $(,)?) => {
        CommandSpec {
            name: $name,
            summary: $summary,
            params: $params,
            run: $run,
        }
    };
}

use ParamKind::{Float, Int, Text, UInt};

const MORPH_SIZE: &[ParamSpec] = &[ParamSpec::required("size", UInt)];
const OTHER: &[ParamSpec] = &[ParamSpec::required("other", Text)];
const TINT: &[ParamSpec] = &[ParamSpec::int("intensity", color::DEFAULT_TINT)];
const FADE: &[ParamSpec] = &[ParamSpec::uint(
    "duration",
    composite::DEFAULT_FADE_DURATION as u32,
)];

/// Every command, in help order.
pub static COMMANDS: &[CommandSpec] = &[
    // Geometry
    command!(
        "crop",
        "Cut a w x h window with its top-left corner at (x, y)",
        &[
            ParamSpec::required("x", Int),
            ParamSpec::required("y", Int),
            ParamSpec::required("w", UInt),
            ParamSpec::required("h", UInt),
        ],
        handlers::crop,
    ),
    command!(
        "resize",
        "Resample every frame to w x h",
        &[ParamSpec::required("w", UInt), ParamSpec::required("h", UInt)],
        handlers::resize,
    ),
    command!(
        "rotate",
        "Rotate counter-clockwise by angle degrees about the center",
        &[ParamSpec::required("angle", Float)],
        handlers::rotate,
    ),
    command!(
        "flip",
        "Mirror: 0 upside down, positive left-right, negative both",
        &[ParamSpec::int("direction", geometric::DEFAULT_FLIP)],
        handlers::flip,
    ),
    command!(
        "zoom",
        "Magnify around (cx, cy), -1 meaning the frame center",
        &[
            ParamSpec::float("factor", geometric::DEFAULT_ZOOM),
            ParamSpec::int("cx", geometric::ZOOM_CENTER as i32),
            ParamSpec::int("cy", geometric::ZOOM_CENTER as i32),
        ],
        handlers::zoom,
    ),
    command!(
        "pan",
        "Shift content by (dx, dy), filling with black",
        &[ParamSpec::int("dx", 0), ParamSpec::int("dy", 0)],
        handlers::pan,
    ),
    // Time
    command!("reverse", "Play frames backwards", &[], handlers::reverse),
    command!(
        "speed",
        "Change playback speed: >= 1 drops frames, below 1 lowers the frame rate",
        &[ParamSpec::required("factor", Float)],
        handlers::speed,
    ),
    command!(
        "trim",
        "Keep frames [start, end)",
        &[
            ParamSpec::required("start", UInt),
            ParamSpec::required("end", UInt),
        ],
        handlers::trim,
    ),
    command!(
        "freeze",
        "Hold frame index for duration extra frames",
        &[
            ParamSpec::uint("index", temporal::DEFAULT_FREEZE_INDEX as u32),
            ParamSpec::uint("duration", temporal::DEFAULT_FREEZE_DURATION as u32),
        ],
        handlers::freeze,
    ),
    command!(
        "loop",
        "Repeat the whole clip count times",
        &[ParamSpec::uint(
            "count",
            temporal::DEFAULT_LOOP_COUNT as u32,
        )],
        handlers::loop_clip,
    ),
    command!(
        "duplicate",
        "Repeat every frame factor times",
        &[ParamSpec::uint(
            "factor",
            temporal::DEFAULT_DUPLICATE_FACTOR as u32,
        )],
        handlers::duplicate,
    ),
    // Color
    command!("gray", "Convert to grayscale", &[], handlers::gray),
    command!("invert", "Invert every channel", &[], handlers::invert),
    command!(
        "bright",
        "Add value to every channel",
        &[ParamSpec::int("value", color::DEFAULT_BRIGHTNESS)],
        handlers::bright,
    ),
    command!(
        "contrast",
        "Multiply every channel by value",
        &[ParamSpec::float("value", color::DEFAULT_CONTRAST)],
        handlers::contrast,
    ),
    command!(
        "hue",
        "Rotate hue by shift (0-180 scale)",
        &[ParamSpec::required("shift", Int)],
        handlers::hue,
    ),
    command!(
        "sat",
        "Scale saturation by factor",
        &[ParamSpec::required("factor", Float)],
        handlers::sat,
    ),
    command!("sepia", "Apply a sepia tone", &[], handlers::sepia),
    command!("warm", "Push colors towards red", TINT, handlers::warm),
    command!("cool", "Push colors towards blue", TINT, handlers::cool),
    command!(
        "posterize",
        "Reduce each channel to levels steps",
        &[ParamSpec::uint("levels", color::DEFAULT_POSTERIZE_LEVELS)],
        handlers::posterize,
    ),
    // Filters
    command!(
        "blur",
        "Gaussian blur with an odd kernel size",
        &[ParamSpec::uint("kernel", filter::DEFAULT_BLUR_KERNEL)],
        handlers::blur,
    ),
    command!("sharpen", "Sharpen with a 3x3 kernel", &[], handlers::sharpen),
    command!("edge", "Canny edge map", &[], handlers::edge),
    command!("denoise", "Non-local means denoising", &[], handlers::denoise),
    command!(
        "threshold",
        "Binary threshold of the grayscale image",
        &[ParamSpec::int("value", filter::DEFAULT_THRESHOLD)],
        handlers::threshold,
    ),
    command!("emboss", "Emboss relief of the grayscale image", &[], handlers::emboss),
    command!("cartoon", "Flat colors with dark outlines", &[], handlers::cartoon),
    command!(
        "vignette",
        "Darken towards the corners",
        &[ParamSpec::float("intensity", filter::DEFAULT_VIGNETTE)],
        handlers::vignette,
    ),
    command!(
        "motion_blur",
        "Linear motion blur of size pixels at angle degrees",
        &[
            ParamSpec::uint("size", filter::DEFAULT_MOTION_BLUR_SIZE),
            ParamSpec::float("angle", 0.0),
        ],
        handlers::motion_blur,
    ),
    // Morphology
    command!("dilate", "Local maximum over a size x size square", MORPH_SIZE, handlers::dilate),
    command!("erode", "Local minimum over a size x size square", MORPH_SIZE, handlers::erode),
    command!("open", "Erode then dilate", MORPH_SIZE, handlers::open),
    command!("close", "Dilate then erode", MORPH_SIZE, handlers::close),
    // Composition
    command!(
        "stack",
        "Place the other video to the right",
        OTHER,
        handlers::stack,
    ),
    command!("stack_v", "Place the other video below", OTHER, handlers::stack_v),
    command!(
        "overlay",
        "Paste the other video at (x, y)",
        &[
            ParamSpec::required("other", Text),
            ParamSpec::int("x", composite::DEFAULT_OVERLAY_ORIGIN.0 as i32),
            ParamSpec::int("y", composite::DEFAULT_OVERLAY_ORIGIN.1 as i32),
        ],
        handlers::overlay,
    ),
    command!("fade_in", "Fade in from black", FADE, handlers::fade_in),
    command!("fade_out", "Fade out to black", FADE, handlers::fade_out),
    command!(
        "crossfade",
        "Blend the end of this video into the start of the other",
        &[
            ParamSpec::required("other", Text),
            ParamSpec::uint("duration", composite::DEFAULT_FADE_DURATION as u32),
        ],
        handlers::crossfade,
    ),
    command!(
        "text",
        "Draw text with its baseline at (x, y)",
        &[
            ParamSpec::text("text", composite::DEFAULT_TEXT),
            ParamSpec::int("x", composite::DEFAULT_TEXT_ORIGIN.0 as i32),
            ParamSpec::int("y", composite::DEFAULT_TEXT_ORIGIN.1 as i32),
            ParamSpec::float("scale", 1.0),
            ParamSpec::uint("r", 255),
            ParamSpec::uint("g", 255),
            ParamSpec::uint("b", 255),
            ParamSpec::uint("thickness", 2),
        ],
        handlers::text,
    ),
    // Stills
    command!(
        "extract",
        "Save frame index as an image",
        &[ParamSpec::uint("index", 0)],
        handlers::extract,
    ),
];

/// Look a command up by its exact name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// All command names in help order.
pub fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: Vec<_> = names().collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.len(), 43);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("motion_blur").map(|c| c.name), Some("motion_blur"));
        assert!(find("Blur").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_required_params_lead() {
        // A required parameter never follows a defaulted one
        for spec in COMMANDS {
            let first_optional = spec.params.iter().position(|p| !p.is_required());
            if let Some(i) = first_optional {
                assert!(
                    spec.params[i..].iter().all(|p| !p.is_required()),
                    "{} has a required parameter after an optional one",
                    spec.name
                );
            }
        }
    }

    #[test]
    fn test_second_source_commands() {
        let multi: Vec<_> = COMMANDS
            .iter()
            .filter(|c| c.takes_second_source())
            .map(|c| c.name)
            .collect();
        assert_eq!(multi, vec!["stack", "stack_v", "overlay", "crossfade"]);
    }

    #[test]
    fn test_documented_defaults() {
        let text = find("text").unwrap();
        assert_eq!(text.params.len(), 8);
        assert_eq!(text.params[0].to_string(), "[text=\"Text\"]");
        assert_eq!(find("blur").unwrap().params[0].to_string(), "[kernel=15]");
        assert_eq!(find("zoom").unwrap().params[1].to_string(), "[cx=-1]");
        assert_eq!(find("vignette").unwrap().params[0].to_string(), "[intensity=0.3]");
    }
}
