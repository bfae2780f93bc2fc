/// Linear straight-alpha RGBA color.
///
/// Components are in `[0, 1]`. Render targets in this crate are `Rgba8Unorm`,
/// so a color written by a shader reads back as `round(c * 255)`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// 100/255, 149/255, 237/255.
    pub const CORNFLOWER_BLUE: Self = Self::new(0.392_157, 0.584_314, 0.929_412, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Quantizes to the 8-bit unorm value a render target would store.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_quantization_rounds() {
        assert_eq!(ColorRgba::RED.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(ColorRgba::GRAY.to_rgba8(), [128, 128, 128, 255]);
    }

    #[test]
    fn rgba8_quantization_clamps() {
        assert_eq!(ColorRgba::new(-1.0, 2.0, 0.0, 1.0).to_rgba8(), [0, 255, 0, 255]);
    }

    #[test]
    fn cornflower_blue_matches_byte_values() {
        assert_eq!(ColorRgba::CORNFLOWER_BLUE.to_rgba8(), [100, 149, 237, 255]);
    }
}
