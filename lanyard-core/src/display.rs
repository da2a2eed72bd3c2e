//! Display service
//!
//! Canvas, refresh queue, caption engine, UI state and the panel sequencer
//! live together behind one async mutex. The control path (buttons,
//! network events, caption text) and the display worker both go through
//! [`Display`], and every acquisition is bounded by the lock timeout: a
//! caller that cannot get the lock in time gets [`DisplayError::LockTimeout`]
//! and its update is dropped.
//!
//! ```text
//! control task ──► set_layout / handle_event / caption_append ──┐
//!                                                               ▼
//!                                          Mutex<DisplayState> (timed)
//!                                                               ▲
//! display worker ──► run_cycle: caption pass + drain queue ─────┘
//! ```

use alloc::string::String;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Timer};

use crate::canvas::Canvas;
use crate::caption::CaptionEngine;
use crate::config::{BadgeProfile, DisplayConfig};
use crate::error::DisplayError;
use crate::panel::{Epd7in5V2, PANEL_HEIGHT, PANEL_WIDTH};
use crate::refresh::{self, BatchReport, RefreshQueue, RefreshRequest};
use crate::traits::PanelInterface;
use crate::ui::{screens, ButtonId, Effect, Layout, UiController, UiEvent};

/// Everything guarded by the coordination lock
pub struct DisplayState<P> {
    epd: Epd7in5V2<P>,
    /// `None` while shut down
    canvas: Option<Canvas>,
    queue: RefreshQueue,
    caption: CaptionEngine,
    ui: UiController,
    profile: BadgeProfile,
}

impl<P: PanelInterface> DisplayState<P> {
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn layout(&self) -> &Layout {
        self.ui.layout()
    }

    pub fn profile(&self) -> &BadgeProfile {
        &self.profile
    }

    pub fn queue(&self) -> &RefreshQueue {
        &self.queue
    }

    pub fn caption(&self) -> &CaptionEngine {
        &self.caption
    }

    pub fn panel(&self) -> &P {
        self.epd.interface()
    }

    fn paint(&mut self, layout: &Layout) -> Result<(), DisplayError> {
        let canvas = self.canvas.as_mut().ok_or(DisplayError::NotInitialized)?;
        screens::paint(layout, &self.profile, canvas, &mut self.queue, &mut self.caption)
    }
}

/// The badge display, shared between the control task and the worker
pub struct Display<M: RawMutex, P> {
    state: Mutex<M, DisplayState<P>>,
    resume: Signal<M, ()>,
    running: AtomicBool,
    config: DisplayConfig,
}

impl<M: RawMutex, P: PanelInterface> Display<M, P> {
    /// Create a shut-down display
    ///
    /// Fails with `ConfigInvalid` if the caption area does not fit the
    /// panel. Nothing is allocated or sent until [`init`](Self::init).
    pub fn new(panel: P, profile: BadgeProfile, config: DisplayConfig) -> Result<Self, DisplayError> {
        let caption = CaptionEngine::new(config.caption, PANEL_WIDTH, PANEL_HEIGHT)?;
        let ui = UiController::new(profile.peer.clone());
        Ok(Self {
            state: Mutex::new(DisplayState {
                epd: Epd7in5V2::new(panel, config.idle_timeout()),
                canvas: None,
                queue: RefreshQueue::new(PANEL_WIDTH, PANEL_HEIGHT),
                caption,
                ui,
                profile,
            }),
            resume: Signal::new(),
            running: AtomicBool::new(false),
            config,
        })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Acquire the coordination lock, giving up after the lock timeout
    pub async fn lock(&self) -> Result<MutexGuard<'_, M, DisplayState<P>>, DisplayError> {
        with_timeout(self.config.lock_timeout(), self.state.lock())
            .await
            .map_err(|_| {
                warn!("display: lock timeout");
                DisplayError::LockTimeout
            })
    }

    /// Allocate the canvas, queue a hardware clear and start the worker
    ///
    /// The layout starts as [`Layout::Badge`] but nothing is painted until
    /// the first [`set_layout`](Self::set_layout).
    pub async fn init(&self) -> Result<(), DisplayError> {
        let mut guard = self.lock().await?;
        let state = &mut *guard;
        if self.is_running() {
            debug!("display: already running");
            return Ok(());
        }
        info!("display: init");

        state.caption.init(self.config.caption)?;
        state.queue.reset();
        state.canvas = Some(Canvas::new(PANEL_WIDTH, PANEL_HEIGHT));
        state.ui.set_layout(Layout::Badge);
        state.queue.enqueue(RefreshRequest::clear())?;

        self.running.store(true, Ordering::Release);
        self.resume.signal(());
        Ok(())
    }

    /// Put the panel to sleep, drop pending work, free the canvas and
    /// suspend the worker
    pub async fn shutdown(&self) -> Result<(), DisplayError> {
        let mut guard = self.lock().await?;
        let state = &mut *guard;
        if !self.is_running() {
            return Err(DisplayError::NotInitialized);
        }
        info!("display: shutdown");

        if let Err(e) = state.epd.deep_sleep().await {
            error!("display: deep sleep failed: {}", e);
        }
        state.queue.reset();
        state.canvas = None;
        state.ui.set_layout(Layout::Badge);

        self.running.store(false, Ordering::Release);
        self.resume.reset();
        Ok(())
    }

    /// Paint `layout` and make it current
    pub async fn set_layout(&self, layout: Layout) -> Result<(), DisplayError> {
        let mut guard = self.lock().await?;
        let state = &mut *guard;
        info!("display: layout {}", layout);
        state.paint(&layout)?;
        state.ui.set_layout(layout);
        Ok(())
    }

    /// Feed an event to the UI controller and paint the resulting layout
    ///
    /// Returns the side effect the caller should carry out, if any. The
    /// transition only takes effect once its screen has been painted.
    pub async fn handle_event(&self, event: UiEvent) -> Result<Option<Effect>, DisplayError> {
        let mut guard = self.lock().await?;
        let state = &mut *guard;
        if state.canvas.is_none() {
            return Err(DisplayError::NotInitialized);
        }

        let mut ui = state.ui.clone();
        let Some(transition) = ui.handle(event) else {
            return Ok(None);
        };
        let peer = core::mem::replace(&mut state.profile.peer, ui.peer().cloned());
        if let Err(e) = state.paint(&transition.layout) {
            state.profile.peer = peer;
            return Err(e);
        }
        state.ui = ui;
        Ok(transition.effect)
    }

    /// Handle a raw key ID; unknown IDs are ignored
    pub async fn handle_button(&self, raw: u8) -> Result<Option<Effect>, DisplayError> {
        match ButtonId::from_raw(raw) {
            Some(id) => self.handle_event(UiEvent::Button(id)).await,
            None => {
                warn!("display: unknown button {}", raw);
                Ok(None)
            }
        }
    }

    /// Queue caption text for the worker's next pass
    pub async fn caption_append(&self, text: &str) -> Result<(), DisplayError> {
        let mut guard = self.lock().await?;
        guard.caption.append(text)?;
        Ok(())
    }

    /// Queue caption text received as raw bytes
    ///
    /// Invalid UTF-8 sequences are replaced before tokenizing.
    pub async fn caption_append_bytes(&self, bytes: &[u8]) -> Result<(), DisplayError> {
        let text = String::from_utf8_lossy(bytes);
        self.caption_append(&text).await
    }

    /// One worker iteration: caption pass if captioning, then drain
    pub async fn run_cycle(&self) -> Result<BatchReport, DisplayError> {
        let mut guard = self.lock().await?;
        let state = &mut *guard;
        let canvas = state.canvas.as_mut().ok_or(DisplayError::NotInitialized)?;

        if state.ui.layout().is_caption() {
            if let Err(e) = state.caption.display(canvas, &mut state.queue) {
                error!("display: caption pass failed: {}", e);
            }
        }

        let report = refresh::drain(&mut state.epd, canvas, &mut state.queue).await;
        if report.timeouts > 0 {
            warn!("display: {} busy timeouts in batch", report.timeouts);
        }
        Ok(report)
    }

    /// Display worker loop
    ///
    /// Runs a cycle every cadence while the display is up and parks on the
    /// resume signal while it is shut down.
    pub async fn run(&self) -> ! {
        loop {
            if !self.is_running() {
                debug!("display: worker suspended");
                self.resume.wait().await;
                continue;
            }

            match self.run_cycle().await {
                Ok(_) | Err(DisplayError::NotInitialized) => {}
                Err(DisplayError::LockTimeout) => warn!("display: worker skipped a cycle"),
                Err(e) => error!("display: cycle failed: {}", e),
            }

            Timer::after(self.config.cadence()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::canvas::Color;
    use crate::geometry::Rect;
    use crate::panel::commands::*;
    use crate::panel::mock::{MockPanel, OpLog, PanelOp};
    use crate::refresh::{RefreshMode, REFRESH_QUEUE_CAPACITY};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::vec::Vec as StdVec;

    type TestDisplay = Display<NoopRawMutex, MockPanel>;

    fn profile() -> BadgeProfile {
        BadgeProfile::new("Ada", "she/her", "Analytical Society", "Speaker")
    }

    fn display_with(config: DisplayConfig) -> (TestDisplay, OpLog) {
        let (panel, log) = MockPanel::new();
        (Display::new(panel, profile(), config).unwrap(), log)
    }

    fn display() -> (TestDisplay, OpLog) {
        display_with(DisplayConfig::default())
    }

    fn pending_modes(display: &TestDisplay) -> StdVec<RefreshMode> {
        let state = display.state.try_lock().unwrap();
        state.queue().iter().map(|r| r.mode).collect()
    }

    #[test]
    fn test_rejects_invalid_caption_area() {
        let mut config = DisplayConfig::default();
        config.caption.rect = Rect::new(0, 0, 900, 480);
        let (panel, _) = MockPanel::new();
        assert!(matches!(
            Display::<NoopRawMutex, _>::new(panel, profile(), config),
            Err(DisplayError::ConfigInvalid)
        ));
    }

    #[test]
    fn test_not_initialized() {
        let (display, _) = display();
        assert_eq!(block_on(display.run_cycle()), Err(DisplayError::NotInitialized));
        assert_eq!(block_on(display.set_layout(Layout::Badge)), Err(DisplayError::NotInitialized));
        assert_eq!(block_on(display.shutdown()), Err(DisplayError::NotInitialized));
        assert_eq!(
            block_on(display.handle_button(1)),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_init_queues_hardware_clear() {
        let (display, log) = display();
        block_on(display.init()).unwrap();
        assert!(display.is_running());
        assert_eq!(pending_modes(&display), [RefreshMode::Clear]);

        let report = block_on(display.run_cycle()).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(log.data_after(FORCE_TEMPERATURE), [0x5A]);
    }

    #[test]
    fn test_badge_layout_ends_in_deep_sleep() {
        let (display, log) = display();
        block_on(display.init()).unwrap();
        block_on(display.set_layout(Layout::Badge)).unwrap();

        let report = block_on(display.run_cycle()).unwrap();
        assert_eq!(report.processed, 2);
        assert!(report.slept);
        assert_eq!(log.commands().last(), Some(&DEEP_SLEEP));
    }

    #[test]
    fn test_caption_flow() {
        let (display, log) = display();
        block_on(display.init()).unwrap();
        block_on(display.run_cycle()).unwrap();

        let effect = block_on(display.handle_button(1)).unwrap();
        assert_eq!(effect, Some(Effect::StartCapture));

        block_on(display.caption_append("HELLO WORLD")).unwrap();
        log.clear();
        let report = block_on(display.run_cycle()).unwrap();

        // layout clear and the caption pass, both partial
        assert_eq!(report.processed, 2);
        assert_eq!(log.count(|op| *op == PanelOp::Command(PARTIAL_WINDOW)), 2);
        // the caption area starts below the icon strip
        assert_eq!(
            log.data_after(PARTIAL_WINDOW),
            [0x00, 0x00, 0x01, 0x07, 0x00, 0x60, 0x00, 0x8F, 0x01]
        );

        let state = display.state.try_lock().unwrap();
        let canvas = state.canvas().unwrap();
        assert_eq!(canvas.pixel(0, 96), Color::Black);
    }

    #[test]
    fn test_no_caption_pass_outside_caption_layout() {
        let (display, _) = display();
        block_on(display.init()).unwrap();
        block_on(display.caption_append("queued")).unwrap();
        block_on(display.run_cycle()).unwrap();

        let state = display.state.try_lock().unwrap();
        assert!(state.caption().has_pending());
    }

    #[test]
    fn test_unknown_button_ignored() {
        let (display, _) = display();
        block_on(display.init()).unwrap();
        assert_eq!(block_on(display.handle_button(9)), Ok(None));
        assert_eq!(pending_modes(&display), [RefreshMode::Clear]);
    }

    #[test]
    fn test_pairing_records_peer() {
        let (display, _) = display();
        block_on(display.init()).unwrap();

        assert_eq!(block_on(display.handle_button(2)), Ok(Some(Effect::StartPairing)));
        let bob = crate::config::truncated("Bob");
        block_on(display.handle_event(UiEvent::PeerDiscovered(Some(bob.clone())))).unwrap();
        assert_eq!(
            block_on(display.handle_button(1)),
            Ok(Some(Effect::RequestPair(bob.clone())))
        );
        block_on(display.handle_event(UiEvent::PairFinished(Some(bob.clone())))).unwrap();

        let state = display.state.try_lock().unwrap();
        assert_eq!(state.profile().peer.as_ref(), Some(&bob));
        assert_eq!(*state.layout(), Layout::PairResult(Some(bob)));
    }

    #[test]
    fn test_refused_paint_keeps_layout() {
        let (display, _) = display();
        block_on(display.init()).unwrap();
        let bob = crate::config::truncated("Bob");
        {
            let mut state = display.state.try_lock().unwrap();
            state.ui = UiController::new(Some(bob.clone()));
            state.profile.peer = Some(bob.clone());
            while state.queue.len() < REFRESH_QUEUE_CAPACITY {
                state.queue.enqueue(RefreshRequest::fast()).unwrap();
            }
        }

        assert_eq!(block_on(display.handle_button(1)), Err(DisplayError::QueueFull));
        assert_eq!(block_on(display.handle_button(2)), Err(DisplayError::QueueFull));
        {
            let mut state = display.state.try_lock().unwrap();
            assert_eq!(*state.layout(), Layout::Badge);
            assert_eq!(state.ui.peer(), Some(&bob));
            assert_eq!(state.profile().peer.as_ref(), Some(&bob));
            state.queue.reset();
        }

        assert_eq!(block_on(display.handle_button(1)), Ok(Some(Effect::StartCapture)));
        let state = display.state.try_lock().unwrap();
        assert_eq!(*state.layout(), Layout::Caption);
    }

    #[test]
    fn test_append_bytes_lossy() {
        let (display, _) = display();
        block_on(display.init()).unwrap();
        block_on(display.caption_append_bytes(b"ok \xFFbad")).unwrap();
        assert_eq!(
            block_on(display.caption_append_bytes(&[b'x'; 40])),
            Err(DisplayError::TokenTooLong)
        );
    }

    #[test]
    fn test_shutdown_and_reinit() {
        let (display, log) = display();
        block_on(display.init()).unwrap();
        block_on(display.set_layout(Layout::WifiConnected)).unwrap();

        block_on(display.shutdown()).unwrap();
        assert!(!display.is_running());
        assert_eq!(log.commands().last(), Some(&DEEP_SLEEP));
        {
            let state = display.state.try_lock().unwrap();
            assert!(state.canvas().is_none());
            assert!(state.queue().is_empty());
        }
        assert_eq!(block_on(display.run_cycle()), Err(DisplayError::NotInitialized));

        block_on(display.init()).unwrap();
        assert!(display.is_running());
        assert_eq!(pending_modes(&display), [RefreshMode::Clear]);
    }

    #[test]
    fn test_lock_timeout_drops_update() {
        let mut config = DisplayConfig::default();
        config.lock_timeout_ms = 0;
        let (display, _) = display_with(config);
        block_on(display.init()).unwrap();

        let held = display.state.try_lock().unwrap();
        assert_eq!(
            block_on(display.set_layout(Layout::Badge)),
            Err(DisplayError::LockTimeout)
        );
        assert_eq!(
            block_on(display.caption_append("late")),
            Err(DisplayError::LockTimeout)
        );
        drop(held);

        // nothing from the timed-out calls reached the state
        assert_eq!(pending_modes(&display), [RefreshMode::Clear]);
        assert!(!display.state.try_lock().unwrap().caption().has_pending());
    }
}
