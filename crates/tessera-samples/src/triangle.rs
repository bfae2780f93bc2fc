//! One red triangle on white.

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use tessera_engine::coords::ColorRgba;
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::Gpu;
use tessera_engine::render::{ProgramDesc, ShaderProgram};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TriangleVertex {
    position: [f32; 3],
}

const VERTICES: [TriangleVertex; 3] = [
    TriangleVertex { position: [0.0, 0.5, 0.0] },
    TriangleVertex { position: [-0.5, -0.5, 0.0] },
    TriangleVertex { position: [0.5, -0.5, 0.0] },
];

const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

struct TriangleGpu {
    program: ShaderProgram,
    vbo: wgpu::Buffer,
}

#[derive(Default)]
pub struct TriangleApp {
    gpu: Option<TriangleGpu>,
}

impl App for TriangleApp {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let device = gpu.device();
        let targets = [Some(wgpu::ColorTargetState::from(gpu.surface_format()))];
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        }];

        let program = ShaderProgram::new(
            device,
            &ProgramDesc {
                label: "triangle",
                vertex_source: include_str!("shaders/triangle_vs.wgsl"),
                fragment_source: include_str!("shaders/triangle_fs.wgsl"),
                vertex_buffers: &buffers,
                targets: &targets,
                primitive: wgpu::PrimitiveState::default(),
            },
        )
        .context("failed to build triangle program")?;

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle vbo"),
            contents: bytemuck::cast_slice(&VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.gpu = Some(TriangleGpu { program, vbo });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(state) = &self.gpu else {
            return Ok(AppControl::Continue);
        };

        ctx.render(ColorRgba::WHITE, |_rctx, target| {
            let mut pass = target.begin_pass("triangle pass");
            pass.set_pipeline(state.program.pipeline());
            pass.set_vertex_buffer(0, state.vbo.slice(..));
            pass.draw(0..VERTICES.len() as u32, 0..1);
        })
    }

    fn on_shutdown(&mut self) {
        self.gpu = None;
    }
}
