//! In-memory media backend.
//!
//! Clips are registered under a path and opened like files; writes and
//! extracted stills are recorded instead of touching the filesystem. Cloning a
//! [`MemoryMedia`] shares the same store.

use crate::source::{clamp_range, FrameSink, FrameSource, SourceOpener};
use clipforge_core::{
    ClipforgeError, Frame, FrameRate, FrameSequence, Result, SequenceInfo,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A sequence handed to [`FrameSink::write`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenVideo {
    pub path: PathBuf,
    pub frames: FrameSequence,
    pub fps: FrameRate,
}

#[derive(Debug, Clone)]
struct MemoryClip {
    frames: Arc<FrameSequence>,
    fps: FrameRate,
}

#[derive(Debug, Default)]
struct MemoryStore {
    clips: Mutex<HashMap<PathBuf, MemoryClip>>,
    writes: Mutex<Vec<WrittenVideo>>,
    stills: Mutex<Vec<(PathBuf, Frame)>>,
}

/// Opener and sink over in-memory clips.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedia {
    store: Arc<MemoryStore>,
}

impl MemoryMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip under `path`, replacing any previous one.
    pub fn insert(&self, path: impl Into<PathBuf>, frames: FrameSequence, fps: FrameRate) {
        self.store.clips.lock().insert(
            path.into(),
            MemoryClip {
                frames: Arc::new(frames),
                fps,
            },
        );
    }

    /// Builder form of [`MemoryMedia::insert`].
    pub fn with_clip(self, path: impl Into<PathBuf>, frames: FrameSequence, fps: FrameRate) -> Self {
        self.insert(path, frames, fps);
        self
    }

    /// Every non-empty write so far, oldest first.
    pub fn writes(&self) -> Vec<WrittenVideo> {
        self.store.writes.lock().clone()
    }

    /// The most recent write to `path`.
    pub fn written(&self, path: impl AsRef<Path>) -> Option<WrittenVideo> {
        let path = path.as_ref();
        self.store
            .writes
            .lock()
            .iter()
            .rev()
            .find(|w| w.path == path)
            .cloned()
    }

    /// Stills written by `extract_frame`.
    pub fn stills(&self) -> Vec<(PathBuf, Frame)> {
        self.store.stills.lock().clone()
    }
}

impl SourceOpener for MemoryMedia {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        let clip = self
            .store
            .clips
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| ClipforgeError::SourceOpen {
                path: path.to_path_buf(),
                reason: "no such in-memory clip".into(),
            })?;
        debug!("Opened in-memory clip {} ({} frames)", path.display(), clip.frames.len());
        Ok(Box::new(MemorySource {
            clip,
            store: Arc::clone(&self.store),
        }))
    }
}

impl FrameSink for MemoryMedia {
    fn write(&self, path: &Path, frames: &[Frame], fps: FrameRate) -> Result<()> {
        if frames.is_empty() {
            return Ok(());
        }
        self.store.writes.lock().push(WrittenVideo {
            path: path.to_path_buf(),
            frames: frames.to_vec(),
            fps,
        });
        Ok(())
    }
}

/// A source reading from a registered clip.
pub struct MemorySource {
    clip: MemoryClip,
    store: Arc<MemoryStore>,
}

impl MemorySource {
    /// A standalone source over `frames`, not attached to any store.
    pub fn new(frames: FrameSequence, fps: FrameRate) -> Self {
        Self {
            clip: MemoryClip {
                frames: Arc::new(frames),
                fps,
            },
            store: Arc::default(),
        }
    }
}

impl FrameSource for MemorySource {
    fn info(&self) -> SequenceInfo {
        SequenceInfo::from_frames(&self.clip.frames, self.clip.fps)
    }

    fn read_all(&mut self) -> Result<FrameSequence> {
        Ok(self.clip.frames.as_ref().clone())
    }

    fn read_range(&mut self, start: usize, end: usize) -> Result<FrameSequence> {
        let range = clamp_range(start, end, self.clip.frames.len());
        Ok(self.clip.frames[range].to_vec())
    }

    fn extract_frame(&mut self, index: usize, out: &Path) -> Result<bool> {
        match self.clip.frames.get(index) {
            Some(frame) => {
                self.store
                    .stills
                    .lock()
                    .push((out.to_path_buf(), frame.clone()));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
