//! Coordinate and geometry types shared across the device layer and renderers.
//!
//! Canonical space for render-target geometry:
//! - Physical pixels
//! - Origin bottom-left (framebuffer convention), +X right, +Y up
//!
//! `PixelRect::to_top_left` converts to wgpu's top-left viewport origin at the
//! point a rect is issued to the GPU.

mod color;
mod rect;
mod viewport;

pub use color::ColorRgba;
pub use rect::PixelRect;
pub use viewport::Viewport;
