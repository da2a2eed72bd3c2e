//! Caption area configuration

use crate::canvas::{Font, FontSize};
use crate::geometry::Rect;

use super::CaptionError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest usable grid
const MIN_COLS: u16 = 8;
const MIN_ROWS: u16 = 2;

/// What happens when the cursor wraps onto a new row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WrapPolicy {
    /// Entering the last row of either half blanks the other half, so
    /// there is always a cleared region ahead of the cursor
    #[default]
    RollingHalfClear,
    /// Wrapping past the last row blanks the whole area
    ClearWhenFull,
}

/// Where and how captions are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptionConfig {
    pub rect: Rect,
    pub font: FontSize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wrap: WrapPolicy,
}

impl CaptionConfig {
    pub const fn new(rect: Rect, font: FontSize, wrap: WrapPolicy) -> Self {
        Self { rect, font, wrap }
    }

    pub const fn glyph(&self) -> Font {
        self.font.font()
    }

    /// Grid size as `(cols, rows)`, or `ConfigInvalid` if the area is
    /// unusable on a `width` x `height` canvas
    pub fn grid(&self, width: u16, height: u16) -> Result<(u16, u16), CaptionError> {
        if !self.rect.fits_within(width, height) {
            return Err(CaptionError::ConfigInvalid);
        }
        let glyph = self.glyph();
        let cols = self.rect.width() / glyph.width();
        let rows = self.rect.height() / glyph.height();
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(CaptionError::ConfigInvalid);
        }
        Ok((cols, rows))
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self::new(Rect::full(800, 480), FontSize::Large, WrapPolicy::RollingHalfClear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        assert_eq!(CaptionConfig::default().grid(800, 480), Ok((33, 10)));
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let cfg = CaptionConfig::new(Rect::new(0, 0, 801, 480), FontSize::Large, WrapPolicy::default());
        assert_eq!(cfg.grid(800, 480), Err(CaptionError::ConfigInvalid));

        let cfg = CaptionConfig::new(Rect::new(100, 0, 100, 480), FontSize::Large, WrapPolicy::default());
        assert_eq!(cfg.grid(800, 480), Err(CaptionError::ConfigInvalid));
    }

    #[test]
    fn test_rejects_small_grid() {
        // 7 columns of 24 px
        let narrow = CaptionConfig::new(Rect::new(0, 0, 191, 480), FontSize::Large, WrapPolicy::default());
        assert_eq!(narrow.grid(800, 480), Err(CaptionError::ConfigInvalid));

        // one row of 48 px
        let short = CaptionConfig::new(Rect::new(0, 0, 800, 95), FontSize::Large, WrapPolicy::default());
        assert_eq!(short.grid(800, 480), Err(CaptionError::ConfigInvalid));

        let minimal = CaptionConfig::new(Rect::new(0, 0, 192, 96), FontSize::Large, WrapPolicy::default());
        assert_eq!(minimal.grid(800, 480), Ok((8, 2)));
    }
}
