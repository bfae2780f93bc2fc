use crate::coords::{ColorRgba, PixelRect, Viewport};

use super::error::{FrameError, PipelineError};
use super::program::{ProgramDesc, ShaderProgram};
use super::target::OffscreenTarget;
use super::tiling;

const VERTEX_SOURCE: &str = include_str!("shaders/blit_vs.wgsl");
const FRAGMENT_SOURCE: &str = include_str!("shaders/blit_fs.wgsl");

/// Filter used to scale an attachment into its tile.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlitFilter {
    Nearest,
    Linear,
}

impl BlitFilter {
    /// Nearest when the tile matches the source size exactly, linear otherwise.
    pub fn for_sizes(source: (u32, u32), dest: PixelRect) -> Self {
        if source == (dest.width, dest.height) {
            BlitFilter::Nearest
        } else {
            BlitFilter::Linear
        }
    }
}

/// Copies every attachment of an [`OffscreenTarget`] into its own tile of a
/// destination image (see [`tiling`] for the layout).
///
/// The pass is bound to one target: bind groups for its attachments are built
/// when the pass is created or [`rebind`](CompositePass::rebind)ed, and `blit`
/// allocates nothing. Blitting any other target fails with
/// [`FrameError::ForeignTarget`].
pub struct CompositePass {
    program: ShaderProgram,
    bound: u64,
    sources: Vec<wgpu::BindGroup>,
    nearest: wgpu::BindGroup,
    linear: wgpu::BindGroup,
    clear: ColorRgba,
}

impl CompositePass {
    /// Builds the blit program for destinations of `output_format` and binds
    /// each attachment of `target` as a sampling source.
    pub fn new(
        device: &wgpu::Device,
        target: &OffscreenTarget,
        output_format: wgpu::TextureFormat,
        clear: ColorRgba,
    ) -> Result<Self, PipelineError> {
        let targets = [Some(wgpu::ColorTargetState {
            format: output_format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let program = ShaderProgram::new(
            device,
            &ProgramDesc {
                label: "tessera composite",
                vertex_source: VERTEX_SOURCE,
                fragment_source: FRAGMENT_SOURCE,
                vertex_buffers: &[],
                targets: &targets,
                primitive: wgpu::PrimitiveState::default(),
            },
        )?;

        let sources = source_groups(device, &program, target);

        let sampler_layout = program.bind_group_layout(1);
        let nearest = sampler_group(device, &sampler_layout, wgpu::FilterMode::Nearest);
        let linear = sampler_group(device, &sampler_layout, wgpu::FilterMode::Linear);

        Ok(Self {
            program,
            bound: target.id(),
            sources,
            nearest,
            linear,
            clear,
        })
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Points the pass at `target`, rebuilding its source bind groups.
    pub fn rebind(&mut self, device: &wgpu::Device, target: &OffscreenTarget) {
        self.sources = source_groups(device, &self.program, target);
        self.bound = target.id();
    }

    /// Clears `dest_view` and draws attachment `i` into tile `i` of `dest`.
    ///
    /// `dest` must be the size of `dest_view`. Tiles with zero area are skipped.
    pub fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &OffscreenTarget,
        dest_view: &wgpu::TextureView,
        dest: Viewport,
    ) -> Result<(), FrameError> {
        if target.id() != self.bound {
            return Err(FrameError::ForeignTarget {
                bound: self.bound,
                found: target.id(),
            });
        }
        if target.attachment_count() != self.sources.len() {
            return Err(FrameError::AttachmentMismatch {
                expected: self.sources.len(),
                found: target.attachment_count(),
            });
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dest_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.program.pipeline());

        let source_size = (target.width(), target.height());
        let count = self.sources.len();
        for (slot, source) in self.sources.iter().enumerate() {
            let Some(tile) = tiling::tile_rect(slot, count, dest) else { continue };
            if tile.is_empty() {
                continue;
            }

            let sampler = match BlitFilter::for_sizes(source_size, tile) {
                BlitFilter::Nearest => &self.nearest,
                BlitFilter::Linear => &self.linear,
            };

            let r = tile.to_top_left(dest.height);
            rpass.set_viewport(r.x as f32, r.y as f32, r.width as f32, r.height as f32, 0.0, 1.0);
            rpass.set_scissor_rect(r.x, r.y, r.width, r.height);
            rpass.set_bind_group(0, source, &[]);
            rpass.set_bind_group(1, sampler, &[]);
            rpass.draw(0..3, 0..1);
        }

        Ok(())
    }
}

fn source_groups(
    device: &wgpu::Device,
    program: &ShaderProgram,
    target: &OffscreenTarget,
) -> Vec<wgpu::BindGroup> {
    let layout = program.bind_group_layout(0);
    target
        .attachments()
        .iter()
        .enumerate()
        .map(|(slot, a)| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("tessera composite source {slot}")),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(a.view()),
                }],
            })
        })
        .collect()
}

fn sampler_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    filter: wgpu::FilterMode,
) -> wgpu::BindGroup {
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&format!("tessera composite {filter:?} sampler")),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("tessera composite {filter:?} sampler group")),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Sampler(&sampler),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;
    use crate::render::GeometryPass;
    use crate::render::readback::{create_readable_texture, read_texture_rgba8};
    use crate::render::ResourceTracker;

    const OUTPUT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// One-attachment 16x16 target filled with `color`.
    fn filled_target(
        gpu: &HeadlessGpu,
        tracker: &ResourceTracker,
        color: ColorRgba,
    ) -> OffscreenTarget {
        let device = gpu.device();
        let target = OffscreenTarget::new(device, tracker, 16, 16, 1).unwrap();
        let pass = GeometryPass::new(device, &[color], ColorRgba::WHITE).unwrap();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        pass.draw(&mut encoder, &target).unwrap();
        gpu.queue().submit(std::iter::once(encoder.finish()));
        target
    }

    #[test]
    fn blit_reads_the_target_it_is_bound_to() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let device = gpu.device();
        let tracker = ResourceTracker::new();

        let red = filled_target(&gpu, &tracker, ColorRgba::RED);
        let green = filled_target(&gpu, &tracker, ColorRgba::GREEN);
        let mut composite = CompositePass::new(device, &red, OUTPUT, ColorRgba::WHITE).unwrap();

        let dest = create_readable_texture(device, "composite test destination", 16, 16);
        let view = dest.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        let err = composite
            .blit(&mut encoder, &green, &view, Viewport::new(16, 16))
            .unwrap_err();
        assert!(matches!(err, FrameError::ForeignTarget { .. }));
        drop(encoder);

        composite.rebind(device, &green);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        composite
            .blit(&mut encoder, &green, &view, Viewport::new(16, 16))
            .unwrap();
        gpu.queue().submit(std::iter::once(encoder.finish()));

        let image = read_texture_rgba8(device, gpu.queue(), &dest).unwrap();
        assert_eq!(image.pixel(0, 0), Some(ColorRgba::GREEN.to_rgba8()));
        assert!(image.is_uniform(ColorRgba::GREEN.to_rgba8(), 0));
    }

    #[test]
    fn same_size_uses_nearest() {
        assert_eq!(BlitFilter::for_sizes((400, 400), PixelRect::new(400, 0, 400, 400)), BlitFilter::Nearest);
    }

    #[test]
    fn any_scaling_uses_linear() {
        assert_eq!(BlitFilter::for_sizes((400, 400), PixelRect::new(0, 0, 400, 300)), BlitFilter::Linear);
        assert_eq!(BlitFilter::for_sizes((400, 400), PixelRect::new(0, 0, 200, 200)), BlitFilter::Linear);
    }
}
