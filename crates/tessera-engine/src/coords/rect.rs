/// Axis-aligned pixel rectangle, half-open on both axes.
///
/// Covers `[x, x + width) × [y, y + height)` with a bottom-left origin.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds a rect from its half-open bounds `[x0, x1) × [y0, y1)`.
    ///
    /// Inverted bounds produce an empty rect anchored at `(x0, y0)`.
    #[inline]
    pub fn from_bounds(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    #[inline]
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if the pixel at `(px, py)` lies inside the rect.
    #[inline]
    pub fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.top()
    }

    /// Returns true if the two rects share at least one pixel.
    pub fn overlaps(self, other: PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
            && !self.is_empty()
            && !other.is_empty()
    }

    /// Flips the rect into a top-left origin surface of the given height.
    ///
    /// wgpu viewports and scissors are specified from the top-left corner.
    #[inline]
    pub fn to_top_left(self, surface_height: u32) -> PixelRect {
        let y = surface_height.saturating_sub(self.top());
        PixelRect::new(self.x, y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: u32, y: u32, w: u32, h: u32) -> PixelRect { PixelRect::new(x, y, w, h) }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn from_bounds_computes_extent() {
        assert_eq!(PixelRect::from_bounds(2, 3, 10, 7), r(2, 3, 8, 4));
    }

    #[test]
    fn from_bounds_inverted_is_empty() {
        assert!(PixelRect::from_bounds(10, 0, 4, 5).is_empty());
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_origin_inclusive() {
        assert!(r(0, 0, 10, 10).contains(0, 0));
    }

    #[test]
    fn contains_far_edge_exclusive() {
        assert!(!r(0, 0, 10, 10).contains(10, 5));
        assert!(!r(0, 0, 10, 10).contains(5, 10));
    }

    // ── overlaps ──────────────────────────────────────────────────────────

    #[test]
    fn shared_edge_does_not_overlap() {
        assert!(!r(0, 0, 10, 10).overlaps(r(10, 0, 10, 10)));
        assert!(!r(0, 0, 10, 10).overlaps(r(0, 10, 10, 10)));
    }

    #[test]
    fn interior_overlap_detected() {
        assert!(r(0, 0, 10, 10).overlaps(r(9, 9, 5, 5)));
    }

    #[test]
    fn empty_rect_never_overlaps() {
        assert!(!r(0, 0, 0, 10).overlaps(r(0, 0, 10, 10)));
    }

    // ── origin flip ───────────────────────────────────────────────────────

    #[test]
    fn lower_half_maps_to_bottom_of_top_left_space() {
        // Lower half of a 600px surface starts 300px down from the top.
        assert_eq!(r(0, 0, 400, 300).to_top_left(600), r(0, 300, 400, 300));
    }

    #[test]
    fn upper_half_maps_to_top_of_top_left_space() {
        assert_eq!(r(400, 300, 400, 300).to_top_left(600), r(400, 0, 400, 300));
    }
}
