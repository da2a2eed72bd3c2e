//! Refresh mode interpreter
//!
//! Maps each request mode to its hardware sequence and drains the queue as
//! one batch. Deep sleep happens at most once per batch, after the last
//! request, and only when that request asked for it.

use super::queue::RefreshQueue;
use super::request::{RefreshMode, RefreshRequest};
use crate::canvas::Canvas;
use crate::geometry::Rect;
use crate::panel::Epd7in5V2;
use crate::traits::{PanelError, PanelInterface};

/// Outcome of one drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatchReport {
    /// Requests taken off the queue
    pub processed: u8,
    /// Requests abandoned on a bus error
    pub failed: u8,
    /// Busy waits that hit the idle timeout
    pub timeouts: u16,
    /// Deep sleep was entered after the batch
    pub slept: bool,
}

/// Run one request's hardware sequence
pub async fn execute<P: PanelInterface>(
    epd: &mut Epd7in5V2<P>,
    canvas: &Canvas,
    request: &RefreshRequest,
) -> Result<(), PanelError> {
    match request.mode {
        RefreshMode::Full | RefreshMode::Sleep => {
            epd.init_full().await?;
            epd.display_full(canvas).await
        }
        RefreshMode::Fast => {
            epd.init_fast().await?;
            epd.display_full(canvas).await
        }
        RefreshMode::Partial => {
            let rect = request
                .rect
                .unwrap_or(Rect::full(canvas.width(), canvas.height()).align_to_bytes())
                .clamp_to(canvas.stride() as u16 * 8, canvas.height());
            epd.init_partial().await?;
            epd.display_window(canvas, rect).await
        }
        RefreshMode::Clear => {
            epd.init_fast().await?;
            epd.clear_screen(canvas.width(), canvas.height()).await
        }
    }
}

/// Process every queued request in FIFO order
///
/// A failing request is logged and skipped; the rest of the batch still
/// runs.
pub async fn drain<P: PanelInterface>(
    epd: &mut Epd7in5V2<P>,
    canvas: &Canvas,
    queue: &mut RefreshQueue,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut need_sleep = false;

    while let Some(request) = queue.dequeue() {
        debug!("refresh: executing {}", request.mode);
        report.processed = report.processed.saturating_add(1);
        need_sleep = request.mode == RefreshMode::Sleep;

        if let Err(e) = execute(epd, canvas, &request).await {
            error!("refresh: {} failed: {}", request.mode, e);
            report.failed = report.failed.saturating_add(1);
        }
    }

    if need_sleep {
        match epd.deep_sleep().await {
            Ok(()) => report.slept = true,
            Err(e) => error!("refresh: deep sleep failed: {}", e),
        }
    }

    report.timeouts = epd.take_timeouts();
    if report.processed > 0 {
        trace!(
            "refresh: batch of {} done, {} timeouts",
            report.processed,
            report.timeouts
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Color;
    use crate::panel::commands::*;
    use crate::panel::mock::{MockPanel, OpLog, PanelOp};
    use crate::panel::{PANEL_HEIGHT, PANEL_WIDTH};
    use embassy_futures::block_on;
    use embassy_time::Duration;

    fn setup() -> (Epd7in5V2<MockPanel>, OpLog, Canvas, RefreshQueue) {
        let (panel, log) = MockPanel::new();
        (
            Epd7in5V2::new(panel, Duration::from_millis(5000)),
            log,
            Canvas::new(PANEL_WIDTH, PANEL_HEIGHT),
            RefreshQueue::new(PANEL_WIDTH, PANEL_HEIGHT),
        )
    }

    fn deep_sleeps(log: &OpLog) -> usize {
        log.count(|op| *op == PanelOp::Command(DEEP_SLEEP))
    }

    #[test]
    fn test_sleep_only_when_last() {
        let (mut epd, log, canvas, mut queue) = setup();
        queue.enqueue(RefreshRequest::sleep()).unwrap();
        queue.enqueue(RefreshRequest::fast()).unwrap();

        let report = block_on(drain(&mut epd, &canvas, &mut queue));
        assert_eq!(report.processed, 2);
        assert!(!report.slept);
        assert_eq!(deep_sleeps(&log), 0);
    }

    #[test]
    fn test_sleep_once_after_batch() {
        let (mut epd, log, canvas, mut queue) = setup();
        queue.enqueue(RefreshRequest::sleep()).unwrap();
        queue.enqueue(RefreshRequest::sleep()).unwrap();

        let report = block_on(drain(&mut epd, &canvas, &mut queue));
        assert!(report.slept);
        assert_eq!(deep_sleeps(&log), 1);
        assert_eq!(log.commands().last(), Some(&DEEP_SLEEP));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_sends_no_canvas() {
        let (mut epd, log, mut canvas, mut queue) = setup();
        canvas.clear(Color::Black);
        queue.enqueue(RefreshRequest::clear()).unwrap();

        block_on(drain(&mut epd, &canvas, &mut queue));
        // fast init LUT, then hardware white regardless of canvas content
        assert_eq!(log.data_after(FORCE_TEMPERATURE), [0x5A]);
        assert!(log.data_after(DATA_START_OLD).iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_partial_uses_rect() {
        let (mut epd, log, canvas, mut queue) = setup();
        queue
            .enqueue(RefreshRequest::partial(Rect::new(0, 0, 264, 48)))
            .unwrap();

        block_on(drain(&mut epd, &canvas, &mut queue));
        assert_eq!(
            log.data_after(PARTIAL_WINDOW),
            [0x00, 0x00, 0x01, 0x07, 0x00, 0x00, 0x00, 0x2F, 0x01]
        );
        assert_eq!(log.data_after(DATA_START_NEW).len(), 33 * 48);
    }

    #[test]
    fn test_partial_without_rect_covers_panel() {
        let (mut epd, log, canvas, _) = setup();
        let request = RefreshRequest {
            mode: RefreshMode::Partial,
            rect: None,
        };
        block_on(execute(&mut epd, &canvas, &request)).unwrap();
        assert_eq!(log.data_after(DATA_START_NEW).len(), 100 * 480);
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let (mut epd, log, canvas, mut queue) = setup();
        queue.enqueue(RefreshRequest::fast()).unwrap();
        queue.enqueue(RefreshRequest::full()).unwrap();
        log.fail_bus_after(0);

        let report = block_on(drain(&mut epd, &canvas, &mut queue));
        assert_eq!(report.processed, 2);
        assert_eq!(report.failed, 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_timeouts_reported() {
        let (mut epd, log, canvas, mut queue) = setup();
        log.set_stuck_busy(true);
        queue.enqueue(RefreshRequest::fast()).unwrap();

        let report = block_on(drain(&mut epd, &canvas, &mut queue));
        // power on, then refresh trigger
        assert_eq!(report.timeouts, 2);
        assert_eq!(report.failed, 0);
    }
}
