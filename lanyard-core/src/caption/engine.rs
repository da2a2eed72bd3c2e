//! Caption grid layout
//!
//! The engine owns the word queue, a `(row, col)` cursor that persists
//! between passes and the dirty rectangle of the current pass. Each pass
//! draws queued words in order and ends with at most one partial refresh.
//! Pixels whose refresh could not be queued are carried into the next one.

use crate::canvas::{Canvas, Color};
use crate::geometry::{DirtyRect, Rect};
use crate::refresh::{RefreshQueue, RefreshRequest};

use super::config::{CaptionConfig, WrapPolicy};
use super::word_queue::WordQueue;
use super::CaptionError;

/// Grid position of the next word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub row: u16,
    pub col: u16,
}

/// Streaming caption layout over a fixed area of the canvas
pub struct CaptionEngine {
    config: CaptionConfig,
    cols: u16,
    rows: u16,
    /// Canvas size the config was validated against
    canvas_size: (u16, u16),
    words: WordQueue,
    cursor: Cursor,
    dirty: DirtyRect,
    /// Drawn area whose refresh request was refused
    unflushed: Option<Rect>,
}

impl CaptionEngine {
    /// Validate `config` for a `width` x `height` canvas
    pub fn new(config: CaptionConfig, width: u16, height: u16) -> Result<Self, CaptionError> {
        let (cols, rows) = config.grid(width, height)?;
        info!("caption: {} columns, {} rows", cols, rows);
        Ok(Self {
            config,
            cols,
            rows,
            canvas_size: (width, height),
            words: WordQueue::new(),
            cursor: Cursor::default(),
            dirty: DirtyRect::new(),
            unflushed: None,
        })
    }

    /// Apply a new configuration and reset queue and cursor
    ///
    /// On error the previous configuration stays in effect.
    pub fn init(&mut self, config: CaptionConfig) -> Result<(), CaptionError> {
        let (width, height) = self.canvas_size;
        let (cols, rows) = config.grid(width, height).inspect_err(|_| {
            error!("caption: invalid area");
        })?;
        self.config = config;
        self.cols = cols;
        self.rows = rows;
        self.words.reset();
        self.cursor = Cursor::default();
        self.dirty.reset();
        Ok(())
    }

    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    /// `(cols, rows)`
    pub fn grid(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn has_pending(&self) -> bool {
        !self.words.is_empty()
    }

    /// Queue the words of `text` for the next pass
    pub fn append(&mut self, text: &str) -> Result<(), CaptionError> {
        self.words.append(text)
    }

    /// Blank the caption area, queue its refresh and home the cursor
    ///
    /// Words still queued are kept and drawn from the top on the next pass.
    pub fn clear(&mut self, canvas: &mut Canvas, queue: &mut RefreshQueue) -> Result<(), CaptionError> {
        self.clear_including(canvas, queue, Rect::default())
    }

    /// Like [`clear`](Self::clear), but the single refresh also covers
    /// `also`, for callers that drew next to the caption area
    pub fn clear_including(
        &mut self,
        canvas: &mut Canvas,
        queue: &mut RefreshQueue,
        also: Rect,
    ) -> Result<(), CaptionError> {
        canvas.clear_window(self.config.rect, Color::White);
        self.cursor = Cursor::default();
        self.dirty.reset();
        let rect = self.config.rect.union(&also);
        self.flush(Some(rect), canvas, queue)
    }

    /// Drain the word queue onto the canvas
    ///
    /// Returns the number of words drawn. A pass stops early after the
    /// word that triggered an area clear, leaving the rest for the next
    /// pass. When nothing was drawn and no earlier refresh is outstanding,
    /// no refresh is requested.
    pub fn display(&mut self, canvas: &mut Canvas, queue: &mut RefreshQueue) -> Result<usize, CaptionError> {
        self.dirty.reset();
        let mut cleared: Option<Rect> = None;
        let mut drawn = 0;
        let mut failure = None;

        let font = self.config.glyph();
        let area = self.config.rect;

        while let Some(next) = self.words.pop_word() {
            let word = match next {
                Ok(word) => word,
                Err(e) => {
                    error!("caption: failed to receive word");
                    failure = Some(e);
                    break;
                }
            };
            let len = word.chars().count() as u16;

            if self.cursor.col + len >= self.cols {
                self.cursor.col = 0;
                self.cursor.row = (self.cursor.row + 1) % self.rows;
                cleared = self.wrap_clear();
                if let Some(rows) = cleared {
                    canvas.clear_window(rows, Color::White);
                }
            }

            // Clip at the right edge of the area
            let fit = len.min(self.cols - self.cursor.col) as usize;
            let visible = match word.char_indices().nth(fit) {
                Some((idx, _)) => &word[..idx],
                None => word.as_str(),
            };

            let x = area.x_start + self.cursor.col * font.width();
            let y = area.y_start + self.cursor.row * font.height();
            trace!("caption: '{}' at row {} col {}", visible, self.cursor.row, self.cursor.col);
            let rect = canvas.draw_glyph_string(x, y, visible, &font, Color::Black, Color::White);
            self.dirty.include(rect);
            drawn += 1;

            self.cursor.col = self.cursor.col.saturating_add(len + 1);

            if cleared.is_some() {
                break;
            }
        }

        let changed = match (cleared, self.dirty.bounds()) {
            (Some(c), Some(d)) => Some(c.union(&d)),
            (c, d) => c.or(d),
        };
        self.flush(changed, canvas, queue)?;

        match failure {
            Some(e) => Err(e),
            None => Ok(drawn),
        }
    }

    /// Queue one partial refresh covering `changed` and anything left over
    /// from a refused request
    fn flush(
        &mut self,
        changed: Option<Rect>,
        canvas: &Canvas,
        queue: &mut RefreshQueue,
    ) -> Result<(), CaptionError> {
        let rect = match (self.unflushed, changed) {
            (Some(a), Some(b)) => a.union(&b),
            (Some(r), None) | (None, Some(r)) => r,
            (None, None) => return Ok(()),
        };
        match queue.enqueue(RefreshRequest::partial(self.refresh_rect(rect, canvas))) {
            Ok(()) => {
                self.unflushed = None;
                Ok(())
            }
            Err(e) => {
                warn!("caption: refresh deferred");
                self.unflushed = Some(rect);
                Err(e.into())
            }
        }
    }

    /// Rows to blank after the cursor moved onto a new row
    fn wrap_clear(&self) -> Option<Rect> {
        let row = self.cursor.row;
        let half = self.rows / 2;
        let (start, end) = match self.config.wrap {
            WrapPolicy::RollingHalfClear if row == half - 1 => (half, self.rows),
            WrapPolicy::RollingHalfClear if row == self.rows - 1 => (0, half),
            WrapPolicy::ClearWhenFull if row == 0 => (0, self.rows),
            _ => return None,
        };
        Some(self.row_span(start, end))
    }

    fn row_span(&self, start: u16, end: u16) -> Rect {
        let area = self.config.rect;
        let h = self.config.glyph().height();
        Rect::new(area.x_start, area.y_start + start * h, area.x_end, area.y_start + end * h)
    }

    fn refresh_rect(&self, rect: Rect, canvas: &Canvas) -> Rect {
        rect.align_to_bytes()
            .clamp_to(canvas.stride() as u16 * 8, canvas.height())
    }
}
