use std::sync::atomic::{AtomicU64, Ordering};

use super::error::PipelineError;
use super::resources::{ResourceTracker, TrackedSet, TrackedTexture};
use super::scope::capture_validation;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Pixel format of every offscreen attachment.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// One color attachment of an [`OffscreenTarget`].
pub struct Attachment {
    texture: TrackedTexture,
    view: wgpu::TextureView,
}

impl Attachment {
    pub fn texture(&self) -> &wgpu::Texture {
        self.texture.texture()
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// A fixed set of same-sized color attachments rendered by a single pass.
///
/// Invariants, for the lifetime of the value:
/// - attachment count is fixed at construction
/// - every attachment is `width x height` in [`TARGET_FORMAT`]
///
/// Attachment `i` is draw buffer `i` (fragment output location `i`).
pub struct OffscreenTarget {
    id: u64,
    width: u32,
    height: u32,
    attachments: Vec<Attachment>,
    _set: TrackedSet,
}

impl OffscreenTarget {
    /// Allocates `attachment_count` textures of `width x height`.
    ///
    /// Fails with [`PipelineError::IncompleteFramebuffer`] when the device could
    /// not render to the configuration: zero size, too large, zero attachments,
    /// more attachments than the device allows, too many bytes per sample, or
    /// any validation error raised while the textures are created.
    pub fn new(
        device: &wgpu::Device,
        tracker: &ResourceTracker,
        width: u32,
        height: u32,
        attachment_count: usize,
    ) -> Result<Self, PipelineError> {
        validate_attachments(&device.limits(), width, height, attachment_count, TARGET_FORMAT)?;

        let (attachments, error) = capture_validation(device, || {
            (0..attachment_count)
                .map(|slot| {
                    let texture = device.create_texture(&wgpu::TextureDescriptor {
                        label: Some(&format!("tessera offscreen color {slot}")),
                        size: wgpu::Extent3d {
                            width,
                            height,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: TARGET_FORMAT,
                        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                            | wgpu::TextureUsages::TEXTURE_BINDING
                            | wgpu::TextureUsages::COPY_SRC,
                        view_formats: &[],
                    });
                    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                    Attachment {
                        texture: tracker.track_texture(texture),
                        view,
                    }
                })
                .collect::<Vec<_>>()
        });

        if let Some(e) = error {
            // `attachments` drops here, releasing whatever was allocated.
            return Err(PipelineError::incomplete(e.to_string()));
        }

        log::debug!(
            "offscreen target: {attachment_count} x {width}x{height} {TARGET_FORMAT:?}"
        );

        Ok(Self {
            id: NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            attachments,
            _set: tracker.track_set(),
        })
    }

    /// Process-unique identity; passes bound to one target use it to reject another.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    pub fn attachment(&self, slot: usize) -> Option<&Attachment> {
        self.attachments.get(slot)
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Color attachments for a render pass writing every draw buffer, cleared to `clear`.
    pub fn color_attachments(
        &self,
        clear: wgpu::Color,
    ) -> Vec<Option<wgpu::RenderPassColorAttachment<'_>>> {
        self.attachments
            .iter()
            .map(|a| {
                Some(wgpu::RenderPassColorAttachment {
                    view: &a.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })
            })
            .collect()
    }

    /// Pipeline color targets matching the draw-buffer list, one per attachment.
    pub fn color_targets(&self) -> Vec<Option<wgpu::ColorTargetState>> {
        draw_buffer_targets(self.attachments.len())
    }

    /// Releases every attachment.
    ///
    /// Consuming `self` rules out a second destroy. Dropping the target has the
    /// same effect; this exists to make the release point explicit.
    pub fn destroy(self) {
        log::debug!("offscreen target destroyed ({} attachments)", self.attachments.len());
        drop(self);
    }
}

/// `count` unblended [`TARGET_FORMAT`] color targets.
pub(crate) fn draw_buffer_targets(count: usize) -> Vec<Option<wgpu::ColorTargetState>> {
    (0..count)
        .map(|_| {
            Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })
        })
        .collect()
}

/// Checks an attachment configuration against device limits.
pub fn validate_attachments(
    limits: &wgpu::Limits,
    width: u32,
    height: u32,
    attachment_count: usize,
    format: wgpu::TextureFormat,
) -> Result<(), PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::incomplete(format!(
            "zero-sized attachments ({width}x{height})"
        )));
    }

    let max_dim = limits.max_texture_dimension_2d;
    if width > max_dim || height > max_dim {
        return Err(PipelineError::incomplete(format!(
            "{width}x{height} exceeds max_texture_dimension_2d {max_dim}"
        )));
    }

    if attachment_count == 0 {
        return Err(PipelineError::incomplete("no color attachments"));
    }

    let max_attachments = limits.max_color_attachments as usize;
    if attachment_count > max_attachments {
        return Err(PipelineError::incomplete(format!(
            "{attachment_count} color attachments exceed max_color_attachments {max_attachments}"
        )));
    }

    let (Some(cost), Some(align)) = (format.target_pixel_byte_cost(), format.target_component_alignment())
    else {
        return Err(PipelineError::incomplete(format!("{format:?} is not color-renderable")));
    };

    // Same accumulation the device applies: align, then add, per attachment.
    let mut bytes = 0u32;
    for _ in 0..attachment_count {
        bytes = bytes.next_multiple_of(align.max(1)) + cost;
    }
    if bytes > limits.max_color_attachment_bytes_per_sample {
        return Err(PipelineError::incomplete(format!(
            "{bytes} bytes per sample exceed max_color_attachment_bytes_per_sample {}",
            limits.max_color_attachment_bytes_per_sample
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;

    fn is_incomplete(r: Result<(), PipelineError>) -> bool {
        matches!(r, Err(PipelineError::IncompleteFramebuffer { .. }))
    }

    // ── limit validation ──────────────────────────────────────────────────

    #[test]
    fn four_rgba8_attachments_fit_default_limits() {
        assert!(validate_attachments(&wgpu::Limits::default(), 400, 400, 4, TARGET_FORMAT).is_ok());
    }

    #[test]
    fn zero_size_rejected() {
        let limits = wgpu::Limits::default();
        assert!(is_incomplete(validate_attachments(&limits, 0, 400, 4, TARGET_FORMAT)));
        assert!(is_incomplete(validate_attachments(&limits, 400, 0, 4, TARGET_FORMAT)));
    }

    #[test]
    fn zero_attachments_rejected() {
        assert!(is_incomplete(validate_attachments(&wgpu::Limits::default(), 4, 4, 0, TARGET_FORMAT)));
    }

    #[test]
    fn oversized_rejected() {
        let limits = wgpu::Limits::default();
        let too_big = limits.max_texture_dimension_2d + 1;
        assert!(is_incomplete(validate_attachments(&limits, too_big, 4, 1, TARGET_FORMAT)));
    }

    #[test]
    fn attachment_limit_enforced() {
        let limits = wgpu::Limits { max_color_attachments: 2, ..wgpu::Limits::default() };
        assert!(validate_attachments(&limits, 4, 4, 2, TARGET_FORMAT).is_ok());
        assert!(is_incomplete(validate_attachments(&limits, 4, 4, 3, TARGET_FORMAT)));
    }

    #[test]
    fn bytes_per_sample_limit_enforced() {
        let limits = wgpu::Limits {
            max_color_attachment_bytes_per_sample: 8,
            ..wgpu::Limits::default()
        };
        assert!(is_incomplete(validate_attachments(&limits, 4, 4, 4, TARGET_FORMAT)));
    }

    #[test]
    fn depth_format_is_not_color_renderable() {
        let r = validate_attachments(&wgpu::Limits::default(), 4, 4, 1, wgpu::TextureFormat::Depth32Float);
        assert!(is_incomplete(r));
    }

    // ── allocation ────────────────────────────────────────────────────────

    #[test]
    fn create_then_destroy_twice_leaves_nothing_live() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let tracker = ResourceTracker::new();

        for _ in 0..2 {
            let target = OffscreenTarget::new(gpu.device(), &tracker, 400, 400, 4).unwrap();
            assert_eq!(tracker.live_textures(), 4);
            assert_eq!(tracker.live_target_sets(), 1);
            target.destroy();
            assert!(tracker.is_empty());
        }
    }

    #[test]
    fn attachments_share_size_and_format() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let tracker = ResourceTracker::new();
        let target = OffscreenTarget::new(gpu.device(), &tracker, 64, 32, 4).unwrap();

        assert_eq!(target.attachment_count(), 4);
        let other = OffscreenTarget::new(gpu.device(), &tracker, 64, 32, 4).unwrap();
        assert_ne!(target.id(), other.id());
        for a in target.attachments() {
            assert_eq!(a.texture().width(), 64);
            assert_eq!(a.texture().height(), 32);
            assert_eq!(a.texture().format(), TARGET_FORMAT);
        }
    }

    #[test]
    fn rejected_configuration_allocates_nothing() {
        let Some(gpu) = HeadlessGpu::try_for_tests() else { return };
        let tracker = ResourceTracker::new();
        let too_many = gpu.device().limits().max_color_attachments as usize + 1;

        let result = OffscreenTarget::new(gpu.device(), &tracker, 16, 16, too_many);
        assert!(matches!(result, Err(PipelineError::IncompleteFramebuffer { .. })));
        assert!(tracker.is_empty());
    }
}
