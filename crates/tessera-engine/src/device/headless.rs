use anyhow::{Context, Result};

use super::{adapter, GpuInit};

/// Device + queue without a presentation surface.
///
/// Used by tests and offscreen tooling. Surface-related fields of [`GpuInit`]
/// are ignored.
pub struct HeadlessGpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    /// Requests an adapter and device. Fails when the machine exposes no adapter.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter available")?;

        adapter::log_adapter(&adapter);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tessera headless device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create headless wgpu device/queue")?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Blocking variant of [`HeadlessGpu::new`].
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Returns a headless GPU, or `None` (with a line on stderr) when none is available.
    ///
    /// GPU-backed tests call this and return early on `None`, so they pass on
    /// machines without an adapter.
    pub fn try_for_tests() -> Option<Self> {
        match Self::new_blocking(GpuInit::default()) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                // Tests run without a logger; stderr is the only visible channel.
                eprintln!("skipping GPU-backed check: {e:#}");
                None
            }
        }
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
