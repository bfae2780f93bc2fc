use std::fmt::Write as _;

use crate::coords::ColorRgba;

use super::error::{FrameError, PipelineError};
use super::program::{ProgramDesc, ShaderProgram, FRAGMENT_ENTRY};
use super::quad::{QuadBuffers, QuadVertex};
use super::target::{draw_buffer_targets, OffscreenTarget};

const VERTEX_SOURCE: &str = include_str!("shaders/geometry_vs.wgsl");

/// Fan-out pass: one full-screen draw writes a distinct constant color to
/// every draw buffer of an [`OffscreenTarget`].
pub struct GeometryPass {
    program: ShaderProgram,
    quad: QuadBuffers,
    colors: Vec<ColorRgba>,
    clear: ColorRgba,
}

impl GeometryPass {
    /// Builds the program for `colors.len()` draw buffers; output `i` is `colors[i]`.
    pub fn new(
        device: &wgpu::Device,
        colors: &[ColorRgba],
        clear: ColorRgba,
    ) -> Result<Self, PipelineError> {
        check_colors(colors)?;

        let fragment_source = fragment_source(colors);
        let targets = draw_buffer_targets(colors.len());
        let vertex_buffers = [QuadVertex::layout()];

        let program = ShaderProgram::new(
            device,
            &ProgramDesc {
                label: "tessera mrt geometry",
                vertex_source: VERTEX_SOURCE,
                fragment_source: &fragment_source,
                vertex_buffers: &vertex_buffers,
                targets: &targets,
                primitive: wgpu::PrimitiveState::default(),
            },
        )?;

        Ok(Self {
            program,
            quad: QuadBuffers::new(device, "tessera mrt geometry"),
            colors: colors.to_vec(),
            clear,
        })
    }

    pub fn colors(&self) -> &[ColorRgba] {
        &self.colors
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Clears every attachment of `target`, then draws the quad once.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &OffscreenTarget,
    ) -> Result<(), FrameError> {
        if target.attachment_count() != self.colors.len() {
            return Err(FrameError::AttachmentMismatch {
                expected: self.colors.len(),
                found: target.attachment_count(),
            });
        }

        let color_attachments = target.color_attachments(self.clear.to_wgpu());

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera mrt geometry pass"),
            color_attachments: &color_attachments,
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, target.width() as f32, target.height() as f32, 0.0, 1.0);
        rpass.set_pipeline(self.program.pipeline());
        rpass.set_vertex_buffer(0, self.quad.vbo.slice(..));
        rpass.set_index_buffer(self.quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QuadBuffers::index_count(), 0, 0..1);

        Ok(())
    }
}

/// Rejects an empty color list and colors that cannot be written as WGSL literals.
fn check_colors(colors: &[ColorRgba]) -> Result<(), PipelineError> {
    if colors.is_empty() {
        return Err(PipelineError::incomplete("geometry pass needs at least one draw buffer"));
    }
    match colors.iter().position(|c| !c.is_finite()) {
        Some(slot) => Err(PipelineError::InvalidColor { slot }),
        None => Ok(()),
    }
}

/// WGSL fragment stage writing `colors[i]` to output location `i`.
pub fn fragment_source(colors: &[ColorRgba]) -> String {
    let mut src = String::from("struct DrawBuffers {\n");
    for i in 0..colors.len() {
        let _ = writeln!(src, "    @location({i}) out{i}: vec4<f32>,");
    }
    src.push_str("};\n\n@fragment\n");
    let _ = writeln!(src, "fn {FRAGMENT_ENTRY}() -> DrawBuffers {{");
    src.push_str("    var out: DrawBuffers;\n");
    for (i, c) in colors.iter().enumerate() {
        let _ = writeln!(
            src,
            "    out.out{i} = vec4<f32>({:?}, {:?}, {:?}, {:?});",
            c.r, c.g, c.b, c.a
        );
    }
    src.push_str("    return out;\n}\n");
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;
    use crate::render::readback::read_texture_rgba8;
    use crate::render::ResourceTracker;

    const COLORS: [ColorRgba; 4] = [
        ColorRgba::RED,
        ColorRgba::GREEN,
        ColorRgba::BLUE,
        ColorRgba::GRAY,
    ];

    #[test]
    fn fragment_source_declares_one_output_per_color() {
        let src = fragment_source(&COLORS);
        for i in 0..4 {
            assert!(src.contains(&format!("@location({i}) out{i}: vec4<f32>")));
        }
        assert!(!src.contains("@location(4)"));
        assert!(src.contains("out.out3 = vec4<f32>(0.5, 0.5, 0.5, 1.0);"));
        assert!(src.contains("fn fs_main() -> DrawBuffers"));
    }

    #[test]
    fn float_literals_keep_a_decimal_point() {
        let src = fragment_source(&[ColorRgba::new(1.0, 0.0, 0.0, 1.0)]);
        assert!(src.contains("vec4<f32>(1.0, 0.0, 0.0, 1.0)"));
    }

    #[test]
    fn non_finite_color_rejected_before_compiling() {
        let colors = [ColorRgba::RED, ColorRgba::new(0.0, f32::NAN, 0.0, 1.0)];
        assert!(matches!(check_colors(&colors), Err(PipelineError::InvalidColor { slot: 1 })));

        let colors = [ColorRgba::new(f32::INFINITY, 0.0, 0.0, 1.0)];
        assert!(matches!(check_colors(&colors), Err(PipelineError::InvalidColor { slot: 0 })));

        assert!(check_colors(&COLORS).is_ok());
    }

    #[test]
    fn invalid_color_reaches_the_caller() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let result = GeometryPass::new(gpu.device(), &[ColorRgba::new(f32::NAN, 0.0, 0.0, 1.0)], ColorRgba::WHITE);
        assert!(matches!(result, Err(PipelineError::InvalidColor { slot: 0 })));
    }

    #[test]
    fn empty_color_list_rejected() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let result = GeometryPass::new(gpu.device(), &[], ColorRgba::WHITE);
        assert!(matches!(result, Err(PipelineError::IncompleteFramebuffer { .. })));
    }

    #[test]
    fn each_attachment_holds_its_constant_color() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let device = gpu.device();
        let tracker = ResourceTracker::new();

        let target = OffscreenTarget::new(device, &tracker, 64, 48, 4).unwrap();
        let pass = GeometryPass::new(device, &COLORS, ColorRgba::WHITE).unwrap();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("geometry test"),
        });
        pass.draw(&mut encoder, &target).unwrap();
        gpu.queue().submit(std::iter::once(encoder.finish()));

        for (slot, color) in COLORS.iter().enumerate() {
            let image = read_texture_rgba8(device, gpu.queue(), target.attachments()[slot].texture()).unwrap();
            assert_eq!(image.width(), 64);
            assert!(
                image.is_uniform(color.to_rgba8(), 0),
                "attachment {slot} is not uniformly {:?}",
                color.to_rgba8()
            );
        }
    }

    #[test]
    fn mismatched_target_is_rejected_before_encoding() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let device = gpu.device();
        let tracker = ResourceTracker::new();

        let target = OffscreenTarget::new(device, &tracker, 8, 8, 2).unwrap();
        let pass = GeometryPass::new(device, &COLORS, ColorRgba::WHITE).unwrap();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let err = pass.draw(&mut encoder, &target).unwrap_err();
        assert!(matches!(err, FrameError::AttachmentMismatch { expected: 4, found: 2 }));
    }
}
