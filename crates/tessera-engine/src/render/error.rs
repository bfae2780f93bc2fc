use std::fmt;

use thiserror::Error;

/// Shader stage a compile diagnostic belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Errors detected while building a pipeline. All of them abort construction
/// and none are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The driver rejected a shader; `diagnostic` is its message.
    #[error("{stage} shader failed to compile: {diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },

    /// The stages compiled but could not be linked into a pipeline.
    #[error("program link failed: {diagnostic}")]
    ProgramLink { diagnostic: String },

    /// The attachment configuration cannot be rendered to on this device.
    #[error("incomplete framebuffer: {reason}")]
    IncompleteFramebuffer { reason: String },

    /// A configured output color has a NaN or infinite component.
    #[error("color for draw buffer {slot} is not finite")]
    InvalidColor { slot: usize },
}

impl PipelineError {
    pub(crate) fn incomplete(reason: impl Into<String>) -> Self {
        PipelineError::IncompleteFramebuffer {
            reason: reason.into(),
        }
    }
}

/// Errors that drop a single frame. The next frame retries independently.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The device reported an error while the frame was encoded.
    #[error("GPU error during frame: {diagnostic}")]
    Gpu { diagnostic: String },

    /// A pass was handed a target with a different attachment count than it was built for.
    #[error("render target has {found} attachments, pass expects {expected}")]
    AttachmentMismatch { expected: usize, found: usize },

    /// A pass was handed a different target than the one it is bound to.
    #[error("pass is bound to target {bound}, got target {found}")]
    ForeignTarget { bound: u64, found: u64 },

    /// The presentation surface cannot be recovered.
    #[error("presentation surface is unrecoverable")]
    SurfaceFatal,
}
