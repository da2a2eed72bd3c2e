//! Command bytes of the 7.5" V2 controller

pub const PANEL_SETTING: u8 = 0x00;
pub const POWER_SETTING: u8 = 0x01;
pub const POWER_OFF: u8 = 0x02;
pub const POWER_ON: u8 = 0x04;
pub const BOOSTER_SOFT_START: u8 = 0x06;
pub const DEEP_SLEEP: u8 = 0x07;
/// Old image plane
pub const DATA_START_OLD: u8 = 0x10;
pub const DISPLAY_REFRESH: u8 = 0x12;
/// New image plane
pub const DATA_START_NEW: u8 = 0x13;
pub const DUAL_SPI: u8 = 0x15;
pub const VCOM_DATA_INTERVAL: u8 = 0x50;
pub const TCON_SETTING: u8 = 0x60;
pub const RESOLUTION: u8 = 0x61;
pub const PARTIAL_WINDOW: u8 = 0x90;
pub const PARTIAL_IN: u8 = 0x91;
pub const CASCADE_SETTING: u8 = 0xE0;
pub const FORCE_TEMPERATURE: u8 = 0xE5;

/// Check byte required after [`DEEP_SLEEP`]
pub const DEEP_SLEEP_CHECK: u8 = 0xA5;
