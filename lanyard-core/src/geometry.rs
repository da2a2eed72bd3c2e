//! Pixel rectangles and the dirty-region accumulator

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, start-inclusive and end-exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x_start: u16,
    pub y_start: u16,
    pub x_end: u16,
    pub y_end: u16,
}

impl Rect {
    pub const fn new(x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Rectangle covering a whole `width` x `height` surface
    pub const fn full(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn width(&self) -> u16 {
        self.x_end.saturating_sub(self.x_start)
    }

    pub const fn height(&self) -> u16 {
        self.y_end.saturating_sub(self.y_start)
    }

    pub const fn is_empty(&self) -> bool {
        self.x_end <= self.x_start || self.y_end <= self.y_start
    }

    /// Check that the rectangle is non-empty and lies inside a surface
    pub const fn fits_within(&self, width: u16, height: u16) -> bool {
        !self.is_empty() && self.x_end <= width && self.y_end <= height
    }

    /// Check that both x edges sit on byte boundaries
    pub const fn is_byte_aligned(&self) -> bool {
        self.x_start % 8 == 0 && self.x_end % 8 == 0
    }

    /// Round the x edges outward to byte boundaries
    ///
    /// The panel transfers whole bytes, so refresh windows must start and
    /// end on multiples of 8 pixels.
    pub const fn align_to_bytes(&self) -> Self {
        let x_start = self.x_start & !7;
        let x_end = match self.x_end.checked_add(7) {
            Some(v) => v & !7,
            None => u16::MAX & !7,
        };
        Self::new(x_start, self.y_start, x_end, self.y_end)
    }

    /// Clip to a `width` x `height` surface
    pub fn clamp_to(&self, width: u16, height: u16) -> Self {
        Self::new(
            self.x_start.min(width),
            self.y_start.min(height),
            self.x_end.min(width),
            self.y_end.min(height),
        )
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            self.x_start.min(other.x_start),
            self.y_start.min(other.y_start),
            self.x_end.max(other.x_end),
            self.y_end.max(other.y_end),
        )
    }
}

/// Running bounding box of everything drawn since the last reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirtyRect {
    bounds: Option<Rect>,
}

impl DirtyRect {
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    pub fn reset(&mut self) {
        self.bounds = None;
    }

    /// Widen the accumulator to cover `rect`; empty rects are ignored
    pub fn include(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(&rect),
            None => rect,
        });
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn is_clean(&self) -> bool {
        self.bounds.is_none()
    }
}
