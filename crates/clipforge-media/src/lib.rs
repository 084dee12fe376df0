//! Clipforge Media - FFmpeg integration for video I/O
//!
//! This crate handles:
//! - Media file probing (ffprobe)
//! - Video decoding to RGB24 frame sequences
//! - Encoding frame sequences back to MPEG-4
//! - An in-memory backend with the same contracts

pub mod backend;
pub mod decoder;
pub mod export;
pub mod memory;
pub mod probe;
pub mod source;

pub use backend::FfmpegMedia;
pub use decoder::VideoDecoder;
pub use export::{EncodeSettings, ExportJob, VideoEncoder};
pub use memory::{MemoryMedia, MemorySource, WrittenVideo};
pub use probe::MediaProbe;
pub use source::{FrameSink, FrameSource, MediaBackend, SourceOpener};
