//! Surface Geometry
//!
//! Plain geometry types shared by the engine and every surface. Units are
//! surface-specific: terminal cells for the TUI, pixels for a raster surface.

/// Size of a visible render area
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Width in surface units
    pub width: u32,
    /// Height in surface units
    pub height: u32,
}

impl Extent {
    /// Create a new extent
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the area can show anything at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Screen-space box of a rendered glyph, relative to the visible area origin
///
/// Boxes reported by a [`Surface`](crate::surface::Surface) are already
/// clipped to the visible area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in surface units
    pub width: u32,
    /// Height in surface units
    pub height: u32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (exclusive)
    #[must_use]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Clip this box to `area` anchored at the origin
    ///
    /// Returns `None` when nothing of the box remains visible. Zero-width
    /// boxes (end-of-line slots) survive as long as they sit inside the
    /// horizontal span and overlap vertically.
    #[must_use]
    pub fn clip_to(&self, area: Extent) -> Option<Self> {
        let (x0, x1) = (i64::from(self.x), i64::from(self.x) + i64::from(self.width));
        let (y0, y1) = (i64::from(self.y), self.bottom());

        let top = y0.max(0);
        let bottom = y1.min(i64::from(area.height));
        if bottom <= top {
            return None;
        }

        let left = x0.max(0);
        let right = x1.min(i64::from(area.width));
        if self.width == 0 {
            if x0 < 0 || x0 > i64::from(area.width) {
                return None;
            }
        } else if right <= left {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(Self {
            x: left as i32,
            y: top as i32,
            width: (right - left).max(0) as u32,
            height: (bottom - top) as u32,
        })
    }
}
