//! Monochrome bitmaps
//!
//! Rows are packed MSB-first and padded to a whole byte; a set bit is ink
//! (drawn black). Bitmaps borrow their pixel data, so icons live in flash.

/// Borrowed 1-bit image with an integer display scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    width: u16,
    height: u16,
    scale: u8,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    pub const fn new(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            scale: 1,
            data,
        }
    }

    /// Same image drawn `scale` times larger; zero is treated as one
    pub const fn scaled(self, scale: u8) -> Self {
        Self {
            scale: if scale == 0 { 1 } else { scale },
            ..self
        }
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Size on the canvas after scaling
    pub const fn display_size(&self) -> (u16, u16) {
        (
            self.width * self.scale as u16,
            self.height * self.scale as u16,
        )
    }

    /// Whether source pixel `(x, y)` is ink; missing data reads as blank
    pub fn is_ink(&self, x: u16, y: u16) -> bool {
        let stride = (self.width as usize).div_ceil(8);
        let idx = y as usize * stride + x as usize / 8;
        match self.data.get(idx) {
            Some(byte) => byte & (0x80 >> (x % 8)) != 0,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ink() {
        static DATA: [u8; 4] = [0b1000_0000, 0b0000_0001, 0x00, 0x80];
        let bitmap = Bitmap::new(16, 2, &DATA);
        assert!(bitmap.is_ink(0, 0));
        assert!(bitmap.is_ink(15, 0));
        assert!(!bitmap.is_ink(1, 0));
        assert!(bitmap.is_ink(8, 1));
    }

    #[test]
    fn test_short_data_reads_blank() {
        let bitmap = Bitmap::new(8, 8, &[0xFF]);
        assert!(bitmap.is_ink(3, 0));
        assert!(!bitmap.is_ink(3, 7));
    }

    #[test]
    fn test_display_size() {
        let bitmap = Bitmap::new(16, 16, &[]).scaled(4);
        assert_eq!(bitmap.display_size(), (64, 64));
        assert_eq!(Bitmap::new(3, 3, &[]).scaled(0).scale(), 1);
    }
}
