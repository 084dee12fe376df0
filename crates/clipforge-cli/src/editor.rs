//! The editor: open an input once, then resolve and run commands against it.
//!
//! Running a command has two steps. [`Editor::resolve`] looks the name up in
//! the command table and converts every argument, so nothing is decoded for
//! an invocation that cannot run. [`Editor::run`] then hands the bound
//! arguments to the command's handler, which reads the input and writes the
//! result through the media backend.

use crate::params::Bindings;
use crate::registry::{self, CommandSpec};
use clipforge_core::{ClipforgeError, Frame, FrameRate, FrameSequence, Result, SequenceInfo};
use clipforge_media::{FrameSource, MediaBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a successful command produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A video was encoded. An empty sequence writes nothing.
    Written { frames: usize, fps: FrameRate },
    /// A still was requested; `saved` is false when the frame was unreadable.
    Extracted { index: usize, saved: bool },
}

/// A command whose name and arguments have been checked.
#[derive(Debug, Clone)]
pub struct Invocation {
    spec: &'static CommandSpec,
    bindings: Bindings,
}

impl Invocation {
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

/// Everything a handler may touch while it runs.
pub struct Job<'a> {
    source: &'a mut dyn FrameSource,
    media: &'a dyn MediaBackend,
    output: &'a Path,
}

impl Job<'_> {
    /// Metadata of the input.
    pub fn info(&self) -> SequenceInfo {
        self.source.info()
    }

    pub fn output(&self) -> &Path {
        self.output
    }

    /// Decode the whole input.
    pub fn read_all(&mut self) -> Result<FrameSequence> {
        self.source.read_all()
    }

    /// Decode input frames `[start, end)`.
    pub fn read_range(&mut self, start: usize, end: usize) -> Result<FrameSequence> {
        self.source.read_range(start, end)
    }

    /// Open and decode a second video.
    pub fn read_other(&self, path: &str) -> Result<FrameSequence> {
        info!("Opening second source {}", path);
        self.media.open(Path::new(path))?.read_all()
    }

    /// Encode `frames` at the input's frame rate.
    pub fn write(&self, frames: &[Frame]) -> Result<Outcome> {
        self.write_at(frames, self.info().fps)
    }

    /// Encode `frames` at `fps`.
    pub fn write_at(&self, frames: &[Frame], fps: FrameRate) -> Result<Outcome> {
        self.media.write(self.output, frames, fps)?;
        Ok(Outcome::Written {
            frames: frames.len(),
            fps,
        })
    }

    /// Save input frame `index` as a still image at the output path.
    pub fn extract(&mut self, index: usize) -> Result<Outcome> {
        let saved = self.source.extract_frame(index, self.output)?;
        if !saved {
            warn!(
                "Frame {} could not be read; no image written to {}",
                index,
                self.output.display()
            );
        }
        Ok(Outcome::Extracted { index, saved })
    }
}

struct EditorImpl {
    input: PathBuf,
    source: Box<dyn FrameSource>,
    media: Arc<dyn MediaBackend>,
}

impl EditorImpl {
    fn run(&mut self, invocation: &Invocation, output: &Path) -> Result<Outcome> {
        info!(
            "Running {} on {} -> {}",
            invocation.name(),
            self.input.display(),
            output.display()
        );
        let mut job = Job {
            source: self.source.as_mut(),
            media: self.media.as_ref(),
            output,
        };
        let outcome = (invocation.spec.run)(&mut job, &invocation.bindings)?;
        debug!("{} finished: {:?}", invocation.name(), outcome);
        Ok(outcome)
    }
}

/// An open input video plus the backend used for any further media access.
pub struct Editor {
    inner: EditorImpl,
}

impl Editor {
    /// Open `input` through `media`.
    pub fn open(input: impl AsRef<Path>, media: Arc<dyn MediaBackend>) -> Result<Self> {
        let input = input.as_ref().to_path_buf();
        let source = media.open(&input)?;
        let info = source.info();
        info!(
            "Opened {}: {}x{} @ {} fps, {} frames",
            input.display(),
            info.width,
            info.height,
            info.fps.to_fps_f64(),
            info.frame_count
        );
        Ok(Self {
            inner: EditorImpl {
                input,
                source,
                media,
            },
        })
    }

    pub fn info(&self) -> SequenceInfo {
        self.inner.source.info()
    }

    /// Look up `command` and bind `args` to its parameters.
    pub fn resolve(&self, command: &str, args: &[String]) -> Result<Invocation> {
        let spec = registry::find(command)
            .ok_or_else(|| ClipforgeError::UnknownCommand(command.to_string()))?;
        let bindings = Bindings::bind(spec.name, spec.params, args)?;
        debug!("Resolved {} with {:?}", spec.name, bindings);
        Ok(Invocation { spec, bindings })
    }

    /// Run a resolved command, writing its result to `output`.
    pub fn run(&mut self, invocation: &Invocation, output: impl AsRef<Path>) -> Result<Outcome> {
        self.inner.run(invocation, output.as_ref())
    }

    /// Resolve and run in one step.
    pub fn execute(
        &mut self,
        command: &str,
        output: impl AsRef<Path>,
        args: &[String],
    ) -> Result<Outcome> {
        let invocation = self.resolve(command, args)?;
        self.run(&invocation, output)
    }
}
