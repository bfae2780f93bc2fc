use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Live-resource counters for offscreen render targets.
///
/// Clones share the same counters. Every texture allocated through
/// [`ResourceTracker::track_texture`] counts as live until its
/// [`TrackedTexture`] is dropped; the same holds for target sets and
/// [`TrackedSet`].
#[derive(Debug, Clone, Default)]
pub struct ResourceTracker {
    counts: Arc<Counts>,
}

#[derive(Debug, Default)]
struct Counts {
    textures: AtomicUsize,
    target_sets: AtomicUsize,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_textures(&self) -> usize {
        self.counts.textures.load(Ordering::Acquire)
    }

    pub fn live_target_sets(&self) -> usize {
        self.counts.target_sets.load(Ordering::Acquire)
    }

    /// Returns true when nothing tracked is still alive.
    pub fn is_empty(&self) -> bool {
        self.live_textures() == 0 && self.live_target_sets() == 0
    }

    pub(crate) fn track_texture(&self, texture: wgpu::Texture) -> TrackedTexture {
        self.counts.textures.fetch_add(1, Ordering::AcqRel);
        TrackedTexture {
            texture,
            counts: Arc::clone(&self.counts),
        }
    }

    pub(crate) fn track_set(&self) -> TrackedSet {
        self.counts.target_sets.fetch_add(1, Ordering::AcqRel);
        TrackedSet {
            counts: Arc::clone(&self.counts),
        }
    }
}

/// A texture whose GPU memory is released when this value is dropped.
#[derive(Debug)]
pub struct TrackedTexture {
    texture: wgpu::Texture,
    counts: Arc<Counts>,
}

impl TrackedTexture {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

impl Drop for TrackedTexture {
    fn drop(&mut self) {
        self.texture.destroy();
        self.counts.textures.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Marks one live target set; released on drop.
#[derive(Debug)]
pub struct TrackedSet {
    counts: Arc<Counts>,
}

impl Drop for TrackedSet {
    fn drop(&mut self) {
        self.counts.target_sets.fetch_sub(1, Ordering::AcqRel);
    }
}
