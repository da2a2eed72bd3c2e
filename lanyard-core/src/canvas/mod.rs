//! 1-bit framebuffer and drawing primitives
//!
//! Pixels are packed eight to a byte, most significant bit leftmost, and a
//! set bit means white. Row stride is the width rounded up to a whole byte.
//! All drawing clips to the canvas; there is no failure mode.
//!
//! Drawing happens in logical coordinates. With [`Rotation::Deg180`] the
//! logical origin is the physical bottom-right corner, which is how the
//! badge mirrors text for someone facing the wearer.

mod bitmap;
mod font;

pub use bitmap::Bitmap;
pub use font::{Font, FontSize, FONT_12X16, FONT_18X32, FONT_24X48};

use alloc::vec;
use alloc::vec::Vec;

use crate::geometry::Rect;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// Byte with all eight pixels set to this color
    pub const fn fill_byte(self) -> u8 {
        match self {
            Color::Black => 0x00,
            Color::White => 0xFF,
        }
    }
}

/// Drawing orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg180,
}

/// Packed 1-bit framebuffer
pub struct Canvas {
    width: u16,
    height: u16,
    stride: usize,
    rotation: Rotation,
    buf: Vec<u8>,
}

impl Canvas {
    /// Allocate a white canvas
    pub fn new(width: u16, height: u16) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            rotation: Rotation::Deg0,
            buf: vec![Color::White.fill_byte(); stride * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Whole framebuffer in panel order
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes of physical row `y` between byte columns `[byte_start, byte_end)`
    pub fn row_bytes(&self, y: u16, byte_start: usize, byte_end: usize) -> &[u8] {
        let y = (y as usize).min(self.height.saturating_sub(1) as usize);
        let byte_end = byte_end.min(self.stride);
        let byte_start = byte_start.min(byte_end);
        let row = y * self.stride;
        &self.buf[row + byte_start..row + byte_end]
    }

    /// Fill the whole canvas, ignoring rotation
    pub fn clear(&mut self, color: Color) {
        self.buf.fill(color.fill_byte());
    }

    /// Fill a logical rectangle with `color`
    pub fn clear_window(&mut self, rect: Rect, color: Color) {
        let physical = self.to_physical(rect.clamp_to(self.width, self.height));
        self.fill_physical(physical, color);
    }

    /// Draw a solid rectangle
    pub fn draw_filled_rect(&mut self, rect: Rect, color: Color) {
        self.clear_window(rect, color);
    }

    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        if let Some((px, py)) = self.map(x as u32, y as u32) {
            self.write_physical(px, py, color);
        }
    }

    /// Read a logical pixel; out-of-range reads return white
    pub fn pixel(&self, x: u16, y: u16) -> Color {
        match self.map(x as u32, y as u32) {
            Some((px, py)) => {
                let byte = self.buf[py as usize * self.stride + px as usize / 8];
                if byte & (0x80 >> (px % 8)) != 0 {
                    Color::White
                } else {
                    Color::Black
                }
            }
            None => Color::White,
        }
    }

    /// Draw `text` left to right starting at `(x, y)`
    ///
    /// Each character occupies one font cell painted in `fg` on `bg`.
    /// Returns the rectangle covered, clipped to the canvas.
    pub fn draw_glyph_string(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        font: &Font,
        fg: Color,
        bg: Color,
    ) -> Rect {
        let mut cx = x as u32;
        for ch in text.chars() {
            if cx >= self.width as u32 {
                break;
            }
            self.draw_glyph(cx, y as u32, ch, font, fg, bg);
            cx += font.width() as u32;
        }
        Rect::new(x, y, clamp_u16(cx), clamp_u16(y as u32 + font.height() as u32))
            .clamp_to(self.width, self.height)
    }

    fn draw_glyph(&mut self, x: u32, y: u32, ch: char, font: &Font, fg: Color, bg: Color) {
        let columns = font::glyph(ch);
        let (sx, sy) = (font.scale_x() as u32, font.scale_y() as u32);
        for (cx, bits) in columns.iter().enumerate() {
            for cy in 0..font::CELL_HEIGHT as u32 {
                let color = if bits & (1 << cy) != 0 { fg } else { bg };
                self.fill_block(x + cx as u32 * sx, y + cy * sy, sx, sy, color);
            }
        }
    }

    /// Draw a bitmap opaquely at `(x, y)`
    pub fn draw_bitmap(&mut self, x: u16, y: u16, bitmap: &Bitmap) {
        let scale = bitmap.scale() as u32;
        for by in 0..bitmap.height() {
            for bx in 0..bitmap.width() {
                let color = if bitmap.is_ink(bx, by) {
                    Color::Black
                } else {
                    Color::White
                };
                self.fill_block(
                    x as u32 + bx as u32 * scale,
                    y as u32 + by as u32 * scale,
                    scale,
                    scale,
                    color,
                );
            }
        }
    }

    fn fill_block(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        for dy in 0..h {
            for dx in 0..w {
                if let Some((px, py)) = self.map(x + dx, y + dy) {
                    self.write_physical(px, py, color);
                }
            }
        }
    }

    /// Logical to physical coordinates, `None` when off-canvas
    fn map(&self, x: u32, y: u32) -> Option<(u16, u16)> {
        if x >= self.width as u32 || y >= self.height as u32 {
            return None;
        }
        let (x, y) = (x as u16, y as u16);
        Some(match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg180 => (self.width - 1 - x, self.height - 1 - y),
        })
    }

    fn to_physical(&self, rect: Rect) -> Rect {
        match self.rotation {
            Rotation::Deg0 => rect,
            Rotation::Deg180 => Rect::new(
                self.width - rect.x_end,
                self.height - rect.y_end,
                self.width - rect.x_start,
                self.height - rect.y_start,
            ),
        }
    }

    fn fill_physical(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let fill = color.fill_byte();
        for y in rect.y_start..rect.y_end {
            let row = y as usize * self.stride;
            let mut x = rect.x_start;
            while x < rect.x_end {
                if x % 8 == 0 && x + 8 <= rect.x_end {
                    self.buf[row + x as usize / 8] = fill;
                    x += 8;
                } else {
                    self.write_physical(x, y, color);
                    x += 1;
                }
            }
        }
    }

    fn write_physical(&mut self, x: u16, y: u16, color: Color) {
        let idx = y as usize * self.stride + x as usize / 8;
        let mask = 0x80u8 >> (x % 8);
        match color {
            Color::White => self.buf[idx] |= mask,
            Color::Black => self.buf[idx] &= !mask,
        }
    }
}

fn clamp_u16(v: u32) -> u16 {
    v.min(u16::MAX as u32) as u16
}
