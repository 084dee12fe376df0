//! Command handlers.
//!
//! A handler pulls its typed arguments out of the bindings, reads what it
//! needs from the job, runs one catalog operation, and writes the result.

use crate::editor::{Job, Outcome};
use crate::params::Bindings;
use clipforge_core::{Frame, FrameSequence, Result};
use clipforge_ops::{color, composite, filter, geometric, morph, temporal, TextStyle};
use tracing::debug;

/// Read the whole input, apply `op`, and write the result.
fn transform<F>(job: &mut Job<'_>, op: F) -> Result<Outcome>
where
    F: FnOnce(&[Frame]) -> Result<FrameSequence>,
{
    let frames = job.read_all()?;
    let out = op(&frames)?;
    job.write(&out)
}

/// Like [`transform`] for operations that cannot fail.
fn map<F>(job: &mut Job<'_>, op: F) -> Result<Outcome>
where
    F: FnOnce(&[Frame]) -> FrameSequence,
{
    transform(job, |frames| Ok(op(frames)))
}

/// Read the input and the second video named by `other`, combine, write.
fn combine<F>(job: &mut Job<'_>, args: &Bindings, op: F) -> Result<Outcome>
where
    F: FnOnce(&[Frame], &[Frame]) -> FrameSequence,
{
    let first = job.read_all()?;
    let second = job.read_other(args.text("other")?)?;
    job.write(&op(&first, &second))
}

// ── Geometry ────────────────────────────────────────────────────

pub fn crop(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (x, y) = (args.int("x")?, args.int("y")?);
    let (w, h) = (args.uint("w")?, args.uint("h")?);
    transform(job, |f| geometric::crop(f, x.into(), y.into(), w, h))
}

pub fn resize(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (w, h) = (args.uint("w")?, args.uint("h")?);
    transform(job, |f| geometric::resize(f, w, h))
}

/// The canvas keeps the input's dimensions.
pub fn rotate(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let angle = args.float("angle")?;
    let info = job.info();
    map(job, |f| geometric::rotate(f, angle, info.width, info.height))
}

pub fn flip(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let direction = args.int("direction")?;
    map(job, |f| geometric::flip(f, direction))
}

pub fn zoom(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let factor = args.float("factor")?;
    let (cx, cy) = (args.int("cx")?, args.int("cy")?);
    transform(job, |f| geometric::zoom(f, factor, cx.into(), cy.into()))
}

pub fn pan(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (dx, dy) = (args.int("dx")?, args.int("dy")?);
    map(job, |f| geometric::pan(f, dx.into(), dy.into()))
}

// ── Time ────────────────────────────────────────────────────────

pub fn reverse(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, temporal::reverse)
}

/// Factors of 1 and above drop frames; smaller factors keep every frame and
/// slow the output frame rate instead.
pub fn speed(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let factor = args.float("factor")?;
    temporal::check_speed(factor)?;
    if factor >= 1.0 {
        return map(job, |f| temporal::speed_up(f, factor));
    }
    let fps = job.info().fps.scaled(factor)?;
    debug!("slow motion: writing at {} fps", fps.to_fps_f64());
    let frames = job.read_all()?;
    job.write_at(&frames, fps)
}

pub fn trim(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (start, end) = (args.count("start")?, args.count("end")?);
    let frames = job.read_range(start, end)?;
    job.write(&frames)
}

pub fn freeze(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (index, duration) = (args.count("index")?, args.count("duration")?);
    map(job, |f| temporal::freeze(f, index, duration))
}

pub fn loop_clip(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let count = args.count("count")?;
    map(job, |f| temporal::loop_frames(f, count))
}

pub fn duplicate(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let factor = args.count("factor")?;
    map(job, |f| temporal::duplicate(f, factor))
}

// ── Color ───────────────────────────────────────────────────────

pub fn gray(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, color::gray)
}

pub fn invert(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, color::invert)
}

pub fn bright(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let value = args.int("value")?;
    map(job, |f| color::brightness(f, value))
}

pub fn contrast(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let value = args.float("value")?;
    map(job, |f| color::contrast(f, value))
}

pub fn hue(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let shift = args.int("shift")?;
    map(job, |f| color::hue_shift(f, shift))
}

pub fn sat(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let factor = args.float("factor")?;
    map(job, |f| color::saturation(f, factor))
}

pub fn sepia(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, color::sepia)
}

pub fn warm(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let intensity = args.int("intensity")?;
    map(job, |f| color::warm(f, intensity))
}

pub fn cool(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let intensity = args.int("intensity")?;
    map(job, |f| color::cool(f, intensity))
}

pub fn posterize(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let levels = args.uint("levels")?;
    transform(job, |f| color::posterize(f, levels))
}

// ── Filters ─────────────────────────────────────────────────────

pub fn blur(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let kernel = args.uint("kernel")?;
    transform(job, |f| filter::blur(f, kernel))
}

pub fn sharpen(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, filter::sharpen)
}

pub fn edge(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, filter::edge)
}

pub fn denoise(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, filter::denoise)
}

pub fn threshold(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let value = args.int("value")?;
    map(job, |f| filter::threshold(f, value))
}

pub fn emboss(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, filter::emboss)
}

pub fn cartoon(job: &mut Job<'_>, _args: &Bindings) -> Result<Outcome> {
    map(job, filter::cartoon)
}

pub fn vignette(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let intensity = args.float("intensity")?;
    map(job, |f| filter::vignette(f, intensity))
}

pub fn motion_blur(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (size, angle) = (args.uint("size")?, args.float("angle")?);
    transform(job, |f| filter::motion_blur(f, size, angle))
}

// ── Morphology ──────────────────────────────────────────────────

pub fn dilate(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let size = args.uint("size")?;
    transform(job, |f| morph::dilate(f, size))
}

pub fn erode(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let size = args.uint("size")?;
    transform(job, |f| morph::erode(f, size))
}

pub fn open(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let size = args.uint("size")?;
    transform(job, |f| morph::open(f, size))
}

pub fn close(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let size = args.uint("size")?;
    transform(job, |f| morph::close(f, size))
}

// ── Composition ─────────────────────────────────────────────────

pub fn stack(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    combine(job, args, composite::stack_horizontal)
}

pub fn stack_v(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    combine(job, args, composite::stack_vertical)
}

pub fn overlay(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let (x, y) = (args.int("x")?, args.int("y")?);
    combine(job, args, |a, b| composite::overlay(a, b, x.into(), y.into()))
}

pub fn fade_in(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let duration = args.count("duration")?;
    map(job, |f| composite::fade_in(f, duration))
}

pub fn fade_out(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let duration = args.count("duration")?;
    map(job, |f| composite::fade_out(f, duration))
}

pub fn crossfade(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let duration = args.count("duration")?;
    combine(job, args, |a, b| composite::crossfade(a, b, duration))
}

/// Color channels above 255 are clamped.
/// A custom color applies only when all three channels are given.
pub fn text(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let content = args.text("text")?.to_string();
    let (x, y) = (args.int("x")?, args.int("y")?);
    let channel = |name: &str| args.uint(name).map(|v| v.min(255) as u8);
    let color = if args.is_supplied("b") {
        [channel("r")?, channel("g")?, channel("b")?]
    } else {
        TextStyle::default().color
    };
    let style = TextStyle {
        scale: args.float("scale")?,
        color,
        thickness: args.uint("thickness")?,
    };
    transform(job, |f| {
        composite::text_overlay(f, &content, x.into(), y.into(), &style)
    })
}

// ── Stills ──────────────────────────────────────────────────────

pub fn extract(job: &mut Job<'_>, args: &Bindings) -> Result<Outcome> {
    let index = args.count("index")?;
    job.extract(index)
}
