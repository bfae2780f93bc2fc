//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and presenting them
//! - a surface-less device for tests and offscreen tooling

mod adapter;
mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod surface;

pub use adapter::describe_adapter;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::HeadlessGpu;
pub use init::GpuInit;
