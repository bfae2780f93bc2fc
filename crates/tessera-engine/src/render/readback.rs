use anyhow::{Context, Result};

/// Host copy of an RGBA8 texture. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl RgbaImage {
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 4]>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel at `(x, y)` counted from the top-left corner.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Pixel at `(x, y)` counted from the bottom-left corner.
    pub fn pixel_from_bottom(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if y >= self.height {
            return None;
        }
        self.pixel(x, self.height - 1 - y)
    }

    /// True if every pixel is within `tolerance` of `expected` on every channel.
    pub fn is_uniform(&self, expected: [u8; 4], tolerance: u8) -> bool {
        self.pixels.iter().all(|p| close(*p, expected, tolerance))
    }

    /// True if every pixel inside `[x0, x1) × [y0, y1)` (bottom-left origin)
    /// is within `tolerance` of `expected`.
    pub fn region_is_uniform(
        &self,
        (x0, y0, x1, y1): (u32, u32, u32, u32),
        expected: [u8; 4],
        tolerance: u8,
    ) -> bool {
        (y0..y1).all(|y| {
            (x0..x1).all(|x| {
                self.pixel_from_bottom(x, y)
                    .is_some_and(|p| close(p, expected, tolerance))
            })
        })
    }
}

fn close(a: [u8; 4], b: [u8; 4], tolerance: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tolerance)
}

/// Creates a `width x height` `Rgba8Unorm` texture usable as a render
/// destination and as a readback source.
pub fn create_readable_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

/// Copies mip 0 of a 4-byte-per-texel texture back to the host (blocking).
///
/// Creates its own encoder and submission, then waits for the device.
pub fn read_texture_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> Result<RgbaImage> {
    let (w, h) = (texture.width(), texture.height());
    anyhow::ensure!(
        texture.format().block_copy_size(None) == Some(4),
        "readback expects 4 bytes per texel, got {:?}",
        texture.format()
    );

    let unpadded = 4 * w;
    let bytes_per_row = unpadded.next_multiple_of(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tessera readback buffer"),
        size: bytes_per_row as u64 * h as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("tessera readback encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(h),
            },
        },
        wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .context("device poll failed during readback")?;
    rx.recv()
        .context("readback callback dropped")?
        .context("failed to map readback buffer")?;

    let pixels = {
        let data = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((w * h) as usize);
        for row in data.chunks_exact(bytes_per_row as usize) {
            for texel in row[..unpadded as usize].chunks_exact(4) {
                pixels.push([texel[0], texel[1], texel[2], texel[3]]);
            }
        }
        pixels
    };
    buffer.unmap();

    Ok(RgbaImage::new(w, h, pixels))
}
