//! A sphere colored by a six-face cubemap, sampled along the surface normal.

use std::f32::consts::PI;

use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use tessera_engine::coords::ColorRgba;
use tessera_engine::core::{App, AppControl, FrameCtx};
use tessera_engine::device::Gpu;
use tessera_engine::render::{ProgramDesc, ShaderProgram};

const SLICES: u32 = 20;
const RADIUS: f32 = 0.75;

/// Face colors in wgpu layer order: +X, -X, +Y, -Y, +Z, -Z.
const FACE_COLORS: [[u8; 4]; 6] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 0, 255],
    [255, 0, 255, 255],
    [255, 255, 255, 255],
];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl SphereVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

/// UV sphere of `slices` meridians and `slices / 2` parallels.
///
/// Produces `(slices/2 + 1) * (slices + 1)` vertices and
/// `slices/2 * slices * 6` indices. Triangles wind counter-clockwise seen
/// from outside.
pub fn generate_sphere(slices: u32, radius: f32) -> SphereMesh {
    let parallels = slices / 2;
    let step = 2.0 * PI / slices as f32;
    let row = slices + 1;

    let mut vertices = Vec::with_capacity(((parallels + 1) * row) as usize);
    for i in 0..=parallels {
        let (sin_i, cos_i) = (step * i as f32).sin_cos();
        for j in 0..=slices {
            let (sin_j, cos_j) = (step * j as f32).sin_cos();
            let position = [radius * sin_i * sin_j, radius * cos_i, radius * sin_i * cos_j];
            let normal = position.map(|c| c / radius);
            vertices.push(SphereVertex { position, normal });
        }
    }

    let mut indices = Vec::with_capacity((parallels * slices * 6) as usize);
    for i in 0..parallels {
        for j in 0..slices {
            let a = i * row + j;
            let b = (i + 1) * row + j;
            indices.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
        }
    }

    SphereMesh { vertices, indices }
}

struct CubemapGpu {
    program: ShaderProgram,
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
}

#[derive(Default)]
pub struct CubemapApp {
    gpu: Option<CubemapGpu>,
}

impl App for CubemapApp {
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let device = gpu.device();
        let targets = [Some(wgpu::ColorTargetState::from(gpu.surface_format()))];
        let buffers = [SphereVertex::layout()];

        let program = ShaderProgram::new(
            device,
            &ProgramDesc {
                label: "cubemap",
                vertex_source: include_str!("shaders/cubemap_vs.wgsl"),
                fragment_source: include_str!("shaders/cubemap_fs.wgsl"),
                vertex_buffers: &buffers,
                targets: &targets,
                primitive: wgpu::PrimitiveState {
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
            },
        )
        .context("failed to build cubemap program")?;

        let mesh = generate_sphere(SLICES, RADIUS);
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere vbo"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere ibo"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let faces = create_face_cubemap(device, gpu.queue());
        let view = faces.create_view(&wgpu::TextureViewDescriptor {
            label: Some("cubemap view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubemap sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cubemap bind group"),
            layout: &program.bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!(
            "sphere: {} vertices, {} indices",
            mesh.vertices.len(),
            mesh.indices.len()
        );

        self.gpu = Some(CubemapGpu {
            program,
            vbo,
            ibo,
            index_count: mesh.indices.len() as u32,
            bind_group,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(state) = &self.gpu else {
            return Ok(AppControl::Continue);
        };

        ctx.render(ColorRgba::WHITE, |_rctx, target| {
            let mut pass = target.begin_pass("cubemap pass");
            pass.set_pipeline(state.program.pipeline());
            pass.set_bind_group(0, &state.bind_group, &[]);
            pass.set_vertex_buffer(0, state.vbo.slice(..));
            pass.set_index_buffer(state.ibo.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..state.index_count, 0, 0..1);
        })
    }

    fn on_shutdown(&mut self) {
        self.gpu = None;
    }
}

/// Six 1x1 layers, one solid color each.
fn create_face_cubemap(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("cubemap faces"),
        size: wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, color) in FACE_COLORS.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            color,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    texture
}
