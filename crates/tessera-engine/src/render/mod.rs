//! GPU rendering subsystem.
//!
//! The multiple-render-target pipeline lives here: an offscreen target set,
//! the geometry pass that fans one draw out to every attachment, the composite
//! pass that tiles the attachments onto the destination, and the frame driver
//! sequencing them.
//!
//! Convention:
//! - Destination rectangles use a bottom-left origin (see [`tiling`]) and are
//!   flipped to wgpu's top-left origin only when issued.
//! - Every GPU object is owned by the component that created it and released
//!   on drop.

mod composite;
mod ctx;
mod driver;
mod error;
mod geometry;
mod program;
mod quad;
mod resources;
mod scope;
mod target;

pub mod readback;
pub mod tiling;

pub use composite::{BlitFilter, CompositePass};
pub use ctx::{RenderCtx, RenderTarget};
pub use driver::{FrameDriver, FrameOutcome, FramePhase, FrameStats, MrtConfig, MrtPipeline};
pub use error::{FrameError, PipelineError, ShaderStage};
pub use geometry::{fragment_source, GeometryPass};
pub use program::{ProgramDesc, ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use resources::{ResourceTracker, TrackedTexture};
pub use target::{validate_attachments, Attachment, OffscreenTarget, TARGET_FORMAT};
