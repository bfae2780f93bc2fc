//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single sample window, and wires them to
//! the GPU layer and the input translator.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
