use winit::window::Window;

use crate::coords::{ColorRgba, Viewport};
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};

use super::composite::CompositePass;
use super::error::{FrameError, PipelineError};
use super::geometry::GeometryPass;
use super::resources::ResourceTracker;
use super::scope::capture_validation;
use super::target::OffscreenTarget;

/// Configuration of the MRT pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MrtConfig {
    /// Offscreen resolution; independent of the window size.
    pub target_width: u32,
    pub target_height: u32,

    /// One draw buffer per color, in attachment order.
    pub colors: Vec<ColorRgba>,

    /// Clear color of every offscreen attachment before the geometry pass.
    pub geometry_clear: ColorRgba,

    /// Clear color of the destination before the composite pass.
    pub present_clear: ColorRgba,
}

impl Default for MrtConfig {
    fn default() -> Self {
        Self {
            target_width: 400,
            target_height: 400,
            colors: vec![
                ColorRgba::RED,
                ColorRgba::GREEN,
                ColorRgba::BLUE,
                ColorRgba::GRAY,
            ],
            geometry_clear: ColorRgba::new(1.0, 1.0, 1.0, 0.0),
            present_clear: ColorRgba::CORNFLOWER_BLUE,
        }
    }
}

/// Offscreen target plus the two passes reading and writing it.
///
/// Built once; encoding a frame allocates no GPU objects.
pub struct MrtPipeline {
    target: OffscreenTarget,
    geometry: GeometryPass,
    composite: CompositePass,
}

impl MrtPipeline {
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        config: &MrtConfig,
    ) -> Result<Self, PipelineError> {
        Self::with_tracker(device, output_format, config, &ResourceTracker::new())
    }

    /// Like [`MrtPipeline::new`], counting the offscreen resources on `tracker`.
    pub fn with_tracker(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        config: &MrtConfig,
        tracker: &ResourceTracker,
    ) -> Result<Self, PipelineError> {
        let target = OffscreenTarget::new(
            device,
            tracker,
            config.target_width,
            config.target_height,
            config.colors.len(),
        )?;
        let geometry = GeometryPass::new(device, &config.colors, config.geometry_clear)?;
        let composite = CompositePass::new(device, &target, output_format, config.present_clear)?;

        log::info!(
            "mrt pipeline ready: {} draw buffers at {}x{}, output {:?}",
            config.colors.len(),
            config.target_width,
            config.target_height,
            output_format
        );

        Ok(Self {
            target,
            geometry,
            composite,
        })
    }

    pub fn target(&self) -> &OffscreenTarget {
        &self.target
    }

    /// Fan-out: one draw into every attachment of the offscreen target.
    pub fn encode_offscreen(&self, encoder: &mut wgpu::CommandEncoder) -> Result<(), FrameError> {
        self.geometry.draw(encoder, &self.target)
    }

    /// Tiled composite of the offscreen target into `dest_view`.
    pub fn encode_present(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        dest_view: &wgpu::TextureView,
        dest: Viewport,
    ) -> Result<(), FrameError> {
        self.composite.blit(encoder, &self.target, dest_view, dest)
    }

    /// Releases the programs and the offscreen target.
    pub fn destroy(self) {
        let Self {
            target,
            geometry,
            composite,
        } = self;
        drop(composite);
        drop(geometry);
        target.destroy();
    }
}

/// Phase the driver is currently recording.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FramePhase {
    Idle,
    Offscreen,
    Present,
}

/// Result of a frame that did not fail.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// Nothing was rendered; the surface was reconfigured or the frame skipped.
    Skipped(SurfaceErrorAction),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub presented: u64,
    /// Frames that failed with a [`FrameError`].
    pub dropped: u64,
    pub skipped: u64,
}

/// Runs the offscreen phase then the present phase, once per frame.
pub struct FrameDriver {
    pipeline: MrtPipeline,
    phase: FramePhase,
    stats: FrameStats,
}

impl FrameDriver {
    pub fn new(pipeline: MrtPipeline) -> Self {
        Self {
            pipeline,
            phase: FramePhase::Idle,
            stats: FrameStats::default(),
        }
    }

    pub fn pipeline(&self) -> &MrtPipeline {
        &self.pipeline
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Renders and presents one frame to `gpu`'s surface, which belongs to `window`.
    ///
    /// The viewport is read once, before anything is recorded. On error the
    /// acquired image is discarded without presenting.
    pub fn render_frame(
        &mut self,
        gpu: &mut Gpu<'_>,
        window: &Window,
    ) -> Result<FrameOutcome, FrameError> {
        let viewport = gpu.viewport();
        if !viewport.is_valid() {
            self.stats.skipped += 1;
            return Ok(FrameOutcome::Skipped(SurfaceErrorAction::SkipFrame));
        }

        let frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        self.stats.dropped += 1;
                        Err(FrameError::SurfaceFatal)
                    }
                    action => {
                        self.stats.skipped += 1;
                        Ok(FrameOutcome::Skipped(action))
                    }
                };
            }
        };

        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        let commands = self.encode_frame(gpu.device(), encoder, &view, viewport)?;
        drop(view);
        window.pre_present_notify();
        gpu.submit_and_present(commands, surface_texture);

        self.stats.presented += 1;
        Ok(FrameOutcome::Presented)
    }

    /// Renders one frame into an arbitrary view of `viewport` size and submits it.
    ///
    /// Used for offscreen destinations; counts as a presented frame.
    pub fn render_to_view(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        viewport: Viewport,
    ) -> Result<(), FrameError> {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera offscreen frame encoder"),
        });
        let commands = self.encode_frame(device, encoder, view, viewport)?;
        queue.submit(std::iter::once(commands));

        self.stats.presented += 1;
        Ok(())
    }

    /// Consumes the driver and releases the pipeline.
    pub fn destroy(self) {
        log::debug!("frame driver stopped: {:?}", self.stats);
        self.pipeline.destroy();
    }

    fn encode_frame(
        &mut self,
        device: &wgpu::Device,
        mut encoder: wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        viewport: Viewport,
    ) -> Result<wgpu::CommandBuffer, FrameError> {
        let pipeline = &self.pipeline;
        let phase = &mut self.phase;

        let (result, error) = capture_validation(device, || -> Result<_, FrameError> {
            *phase = FramePhase::Offscreen;
            pipeline.encode_offscreen(&mut encoder)?;

            *phase = FramePhase::Present;
            pipeline.encode_present(&mut encoder, view, viewport)?;

            Ok(encoder.finish())
        });
        self.phase = FramePhase::Idle;

        let failure = match (result, error) {
            (Ok(commands), None) => return Ok(commands),
            (_, Some(e)) => FrameError::Gpu {
                diagnostic: e.to_string(),
            },
            (Err(e), None) => e,
        };

        self.stats.dropped += 1;
        Err(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;
    use crate::render::readback::{create_readable_texture, read_texture_rgba8, RgbaImage};

    const OUTPUT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    fn render(driver: &mut FrameDriver, gpu: &HeadlessGpu, w: u32, h: u32) -> RgbaImage {
        let dest = create_readable_texture(gpu.device(), "driver test destination", w, h);
        let view = dest.create_view(&wgpu::TextureViewDescriptor::default());
        driver
            .render_to_view(gpu.device(), gpu.queue(), &view, Viewport::new(w, h))
            .unwrap();
        read_texture_rgba8(gpu.device(), gpu.queue(), &dest).unwrap()
    }

    fn assert_quadrants(img: &RgbaImage, tolerance: u8) {
        let (w, h) = (img.width(), img.height());
        let (hw, hh) = (w / 2, h / 2);
        let quads = [
            ((0, 0, hw, hh), ColorRgba::RED),
            ((hw, 0, w, hh), ColorRgba::GREEN),
            ((0, hh, hw, h), ColorRgba::BLUE),
            ((hw, hh, w, h), ColorRgba::GRAY),
        ];
        for (region, color) in quads {
            assert!(
                img.region_is_uniform(region, color.to_rgba8(), tolerance),
                "{w}x{h}: region {region:?} is not {:?}",
                color.to_rgba8()
            );
        }
    }

    #[test]
    fn default_config_is_four_colors_at_400() {
        let c = MrtConfig::default();
        assert_eq!((c.target_width, c.target_height), (400, 400));
        assert_eq!(
            c.colors,
            vec![ColorRgba::RED, ColorRgba::GREEN, ColorRgba::BLUE, ColorRgba::GRAY]
        );
        assert_eq!(c.present_clear, ColorRgba::CORNFLOWER_BLUE);
    }

    #[test]
    fn end_to_end_quadrants_at_800x600() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let pipeline = MrtPipeline::new(gpu.device(), OUTPUT, &MrtConfig::default()).unwrap();
        let mut driver = FrameDriver::new(pipeline);

        let img = render(&mut driver, &gpu, 800, 600);

        // Row 0 of the readback is the top of the image.
        assert_eq!(img.pixel(0, 599), Some(ColorRgba::RED.to_rgba8()));
        assert_eq!(img.pixel(799, 599), Some(ColorRgba::GREEN.to_rgba8()));
        assert_eq!(img.pixel(0, 0), Some(ColorRgba::BLUE.to_rgba8()));
        assert_eq!(img.pixel(799, 0), Some(ColorRgba::GRAY.to_rgba8()));
        assert_quadrants(&img, 1);

        assert_eq!(driver.stats().presented, 1);
        assert_eq!(driver.phase(), FramePhase::Idle);
    }

    #[test]
    fn same_size_composite_is_exact() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let pipeline = MrtPipeline::new(gpu.device(), OUTPUT, &MrtConfig::default()).unwrap();
        let mut driver = FrameDriver::new(pipeline);

        // Each 400x400 source lands on a 400x400 tile of an 800x800 destination.
        let img = render(&mut driver, &gpu, 800, 800);
        assert_quadrants(&img, 0);
    }

    #[test]
    fn even_destination_holds_quadrants() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let pipeline = MrtPipeline::new(gpu.device(), OUTPUT, &MrtConfig::default()).unwrap();
        let mut driver = FrameDriver::new(pipeline);

        let img = render(&mut driver, &gpu, 400, 400);
        assert_quadrants(&img, 1);
    }

    #[test]
    fn viewport_change_keeps_offscreen_resolution() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let pipeline = MrtPipeline::new(gpu.device(), OUTPUT, &MrtConfig::default()).unwrap();
        let mut driver = FrameDriver::new(pipeline);

        for (w, h) in [(800, 600), (320, 240), (1024, 768)] {
            let img = render(&mut driver, &gpu, w, h);
            assert_quadrants(&img, 1);

            let target = driver.pipeline().target();
            assert_eq!((target.width(), target.height()), (400, 400));
            for a in target.attachments() {
                assert_eq!((a.texture().width(), a.texture().height()), (400, 400));
            }
        }
        assert_eq!(driver.stats().presented, 3);
    }

    #[test]
    fn failed_frame_is_dropped_and_next_frame_renders() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let pipeline = MrtPipeline::new(gpu.device(), OUTPUT, &MrtConfig::default()).unwrap();
        let mut driver = FrameDriver::new(pipeline);

        // The composite program writes Rgba8Unorm; a Bgra8Unorm destination is invalid.
        let wrong = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("mismatched destination"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Bgra8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let wrong_view = wrong.create_view(&wgpu::TextureViewDescriptor::default());

        let err = driver
            .render_to_view(gpu.device(), gpu.queue(), &wrong_view, Viewport::new(64, 64))
            .unwrap_err();
        assert!(matches!(err, FrameError::Gpu { .. }), "unexpected error: {err}");
        assert_eq!(driver.phase(), FramePhase::Idle);
        assert_eq!(
            driver.stats(),
            FrameStats {
                presented: 0,
                dropped: 1,
                skipped: 0
            }
        );

        let img = render(&mut driver, &gpu, 800, 600);
        assert_quadrants(&img, 1);
        assert_eq!(
            driver.stats(),
            FrameStats {
                presented: 1,
                dropped: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn destroy_releases_offscreen_resources() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let tracker = ResourceTracker::new();
        let pipeline =
            MrtPipeline::with_tracker(gpu.device(), OUTPUT, &MrtConfig::default(), &tracker)
                .unwrap();
        assert_eq!(tracker.live_textures(), 4);

        FrameDriver::new(pipeline).destroy();
        assert!(tracker.is_empty());
    }

    #[test]
    fn zero_size_target_fails_at_init() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let config = MrtConfig {
            target_width: 0,
            ..MrtConfig::default()
        };
        let result = MrtPipeline::new(gpu.device(), OUTPUT, &config);
        assert!(matches!(result, Err(PipelineError::IncompleteFramebuffer { .. })));
    }
}
