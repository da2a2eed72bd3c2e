//! Screen painters
//!
//! Each layout clears and redraws the canvas, then queues exactly one
//! refresh. Text meant for someone facing the wearer is drawn with the
//! canvas rotated 180 degrees.

use crate::canvas::{Bitmap, Canvas, Color, Rotation, FONT_18X32, FONT_24X48};
use crate::caption::CaptionEngine;
use crate::config::BadgeProfile;
use crate::error::DisplayError;
use crate::geometry::Rect;
use crate::refresh::{RefreshQueue, RefreshRequest};

use super::controller::ButtonId;
use super::icons;
use super::layout::Layout;

/// Top edge of the button icons
const BUTTON_Y: u16 = 10;
/// Right margin for right-aligned text
const RIGHT_EDGE: u16 = 768;

/// Draw `layout` and queue its refresh
pub fn paint(
    layout: &Layout,
    profile: &BadgeProfile,
    canvas: &mut Canvas,
    queue: &mut RefreshQueue,
    caption: &mut CaptionEngine,
) -> Result<(), DisplayError> {
    debug!("ui: painting {}", layout);
    canvas.set_rotation(Rotation::Deg0);

    match layout {
        Layout::Badge => {
            badge(canvas, profile);
            queue.enqueue(RefreshRequest::sleep())?;
        }
        Layout::Caption => {
            canvas.clear(Color::White);
            draw_button(canvas, ButtonId::One, &icons::MUTE);
            let strip = Rect::new(0, 0, canvas.width(), BUTTON_Y + 64);
            caption.clear_including(canvas, queue, strip)?;
        }
        Layout::PairSearching => {
            pair_screen(canvas, profile, |c| {
                medium(c, 300, 280, "Searching for");
                medium(c, 300, 330, "nearby badges...");
            });
            queue.enqueue(RefreshRequest::fast())?;
        }
        Layout::PairConfirm(peer) => {
            pair_screen(canvas, profile, |c| match peer {
                Some(peer) => {
                    medium(c, 300, 280, "Pair with this badge?");
                    large(c, 300, 330, peer);
                    draw_button(c, ButtonId::One, &icons::CHECK);
                    draw_button(c, ButtonId::Two, &icons::CROSS);
                }
                None => {
                    medium(c, 300, 280, "No nearby badges found.");
                    medium(c, 450, 420, "Press any key");
                }
            });
            queue.enqueue(RefreshRequest::fast())?;
        }
        Layout::PairPending(peer) => {
            pair_screen(canvas, profile, |c| {
                medium(c, 300, 280, "Requesting to pair...");
                large(c, 300, 330, peer);
            });
            queue.enqueue(RefreshRequest::fast())?;
        }
        Layout::PairResult(peer) => {
            pair_screen(canvas, profile, |c| {
                match peer {
                    Some(peer) => {
                        medium(c, 300, 280, "You are paired with");
                        large(c, 300, 330, peer);
                    }
                    None => {
                        medium(c, 300, 280, "Pairing failed");
                        medium(c, 300, 330, "Ask to try again?");
                    }
                }
                medium(c, 450, 420, "Press any key");
            });
            queue.enqueue(RefreshRequest::fast())?;
        }
        Layout::WifiConnecting => wifi_screen(canvas, queue, &icons::WIFI, "Connecting to Wi-Fi...")?,
        Layout::WifiConnected => wifi_screen(canvas, queue, &icons::WIFI, "Wi-Fi connected")?,
        Layout::WifiDisconnected => {
            wifi_screen(canvas, queue, &icons::NO_WIFI, "Wi-Fi disconnected")?
        }
    }

    canvas.set_rotation(Rotation::Deg0);
    Ok(())
}

fn badge(canvas: &mut Canvas, profile: &BadgeProfile) {
    canvas.clear(Color::White);
    canvas.draw_bitmap(0, 90, &icons::LOGO);
    large(canvas, 64, 240, &profile.name);
    medium(canvas, 64, 300, &profile.pronouns);
    medium(canvas, 32, 400, &profile.affiliation);

    let role_width = FONT_18X32.text_width(&profile.role).min(RIGHT_EDGE as u32) as u16;
    medium(canvas, RIGHT_EDGE - role_width, 400, &profile.role);

    draw_button(canvas, ButtonId::One, &icons::UNMUTE);

    canvas.set_rotation(Rotation::Deg180);
    match &profile.peer {
        Some(peer) => {
            draw_button(canvas, ButtonId::Two, &icons::UNLINK);
            medium(canvas, 32, 420, peer);
        }
        None => {
            draw_button(canvas, ButtonId::Two, &icons::LINK);
            medium(canvas, 32, 420, "Not paired");
        }
    }
    canvas.set_rotation(Rotation::Deg0);
}

/// Shared frame of the pairing screens
///
/// `mirrored` draws the viewer-facing part with the canvas rotated.
fn pair_screen(canvas: &mut Canvas, profile: &BadgeProfile, mirrored: impl FnOnce(&mut Canvas)) {
    canvas.clear(Color::White);
    canvas.draw_bitmap(540, 40, &icons::PAIR);

    canvas.set_rotation(Rotation::Deg180);
    mirrored(canvas);
    canvas.set_rotation(Rotation::Deg0);

    canvas.draw_filled_rect(Rect::new(10, 236, 790, 244), Color::Black);
    medium(canvas, 64, 280, "Hello, my name is");
    large(canvas, 64, 350, &profile.name);
}

fn wifi_screen(
    canvas: &mut Canvas,
    queue: &mut RefreshQueue,
    icon: &Bitmap,
    status: &str,
) -> Result<(), DisplayError> {
    canvas.clear(Color::White);
    canvas.draw_bitmap(32, 112, icon);
    medium(canvas, 320, 220, status);
    queue.enqueue(RefreshRequest::fast())?;
    Ok(())
}

fn draw_button(canvas: &mut Canvas, button: ButtonId, icon: &Bitmap) {
    canvas.draw_bitmap(button.icon_x(), BUTTON_Y, icon);
}

fn large(canvas: &mut Canvas, x: u16, y: u16, text: &str) {
    canvas.draw_glyph_string(x, y, text, &FONT_24X48, Color::Black, Color::White);
}

fn medium(canvas: &mut Canvas, x: u16, y: u16, text: &str) {
    canvas.draw_glyph_string(x, y, text, &FONT_18X32, Color::Black, Color::White);
}
