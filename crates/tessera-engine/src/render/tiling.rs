//! Destination rectangles for the composite pass.
//!
//! Tiles are laid out row-major from the bottom-left corner. With four tiles:
//!
//! ```text
//!   +-----+-----+
//!   |  2  |  3  |
//!   +-----+-----+
//!   |  0  |  1  |
//!   +-----+-----+
//! ```
//!
//! Other counts use a `ceil(sqrt(n))` square grid. Only the four-tile layout
//! is the validated configuration; other counts tile exactly but leave cells
//! unused.

use crate::coords::{PixelRect, Viewport};

/// Smallest `c` with `c * c >= count`. Zero for zero.
pub fn grid_side(count: usize) -> u32 {
    let mut side = 0u32;
    while (side as usize) * (side as usize) < count {
        side += 1;
    }
    side
}

/// Destination rect of tile `index` out of `count` inside `dest`
/// (bottom-left origin). `None` when `index >= count`.
pub fn tile_rect(index: usize, count: usize, dest: Viewport) -> Option<PixelRect> {
    if index >= count {
        return None;
    }

    let side = grid_side(count);
    let col = index as u32 % side;
    let row = index as u32 / side;

    let x0 = edge(col, side, dest.width);
    let x1 = edge(col + 1, side, dest.width);
    let y0 = edge(row, side, dest.height);
    let y1 = edge(row + 1, side, dest.height);

    Some(PixelRect::from_bounds(x0, y0, x1, y1))
}

/// Every tile rect for `count` attachments, in attachment order.
pub fn tile_rects(count: usize, dest: Viewport) -> Vec<PixelRect> {
    (0..count).filter_map(|i| tile_rect(i, count, dest)).collect()
}

/// `k * extent / side`, computed without overflow. `k == side` is exactly `extent`.
fn edge(k: u32, side: u32, extent: u32) -> u32 {
    ((k as u64 * extent as u64) / side as u64) as u32
}
