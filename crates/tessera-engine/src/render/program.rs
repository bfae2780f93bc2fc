use super::error::{PipelineError, ShaderStage};
use super::scope::capture_validation;

/// Entry point every vertex source must define.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment source must define.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Everything needed to build a [`ShaderProgram`].
///
/// Sources are WGSL. Resource bindings are inferred from the sources, so a
/// program's bind group layouts are queried with [`ShaderProgram::bind_group_layout`]
/// instead of being declared up front.
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// One entry per draw buffer, in output-location order.
    pub targets: &'a [Option<wgpu::ColorTargetState>],
    pub primitive: wgpu::PrimitiveState,
}

/// A compiled and linked vertex + fragment shader pair.
///
/// Dropping the program releases the pipeline.
pub struct ShaderProgram {
    label: String,
    vertex_source: String,
    fragment_source: String,
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Compiles both stages, then links them.
    ///
    /// A stage the device rejects yields [`PipelineError::ShaderCompile`] carrying
    /// the compiler diagnostic; a linking failure (interface mismatch, missing
    /// entry point, bad target list) yields [`PipelineError::ProgramLink`].
    pub fn new(device: &wgpu::Device, desc: &ProgramDesc<'_>) -> Result<Self, PipelineError> {
        let vertex = compile(device, desc.label, ShaderStage::Vertex, desc.vertex_source)?;
        let fragment = compile(device, desc.label, ShaderStage::Fragment, desc.fragment_source)?;

        let (pipeline, error) = capture_validation(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: None,

                vertex: wgpu::VertexState {
                    module: &vertex,
                    entry_point: Some(VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: desc.vertex_buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &fragment,
                    entry_point: Some(FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: desc.targets,
                }),

                primitive: desc.primitive,
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        });

        if let Some(e) = error {
            log::error!("{}: link failed: {e}", desc.label);
            return Err(PipelineError::ProgramLink {
                diagnostic: e.to_string(),
            });
        }

        log::debug!("{}: program linked ({} draw buffers)", desc.label, desc.targets.len());

        Ok(Self {
            label: desc.label.to_string(),
            vertex_source: desc.vertex_source.to_string(),
            fragment_source: desc.fragment_source.to_string(),
            pipeline,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_source(&self) -> &str {
        &self.vertex_source
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    /// The linked pipeline; bind it with `RenderPass::set_pipeline`.
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Layout of bind group `group` as declared by the shader sources.
    pub fn bind_group_layout(&self, group: u32) -> wgpu::BindGroupLayout {
        self.pipeline.get_bind_group_layout(group)
    }
}

fn compile(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule, PipelineError> {
    let module_label = format!("{label} {stage}");
    let (module, error) = capture_validation(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&module_label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    });

    match error {
        Some(e) => {
            log::error!("{module_label}: compile failed: {e}");
            Err(PipelineError::ShaderCompile {
                stage,
                diagnostic: e.to_string(),
            })
        }
        None => Ok(module),
    }
}
