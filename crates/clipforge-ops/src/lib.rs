//! Clipforge Ops - the frame-sequence operation catalog
//!
//! Every operation takes whole decoded sequences and returns new ones; inputs
//! are never modified. Operations are grouped by family:
//! - `color`: per-pixel tone and palette changes
//! - `filter`: convolutions, denoising, thresholds and stylization
//! - `geometric`: crop, resample, rotate, flip, zoom and pan
//! - `morph`: square-element dilation and erosion
//! - `temporal`: frame reordering and repetition
//! - `composite`: stacking, overlay, fades and text
//!
//! Shared numeric helpers live in `kernel` and the bitmap font in `glyphs`.

pub mod color;
pub mod composite;
pub mod filter;
pub mod geometric;
pub mod glyphs;
pub mod kernel;
pub mod morph;
pub mod temporal;

pub use composite::TextStyle;
pub use filter::{BilateralParams, NlMeansParams};
pub use kernel::Kernel;
