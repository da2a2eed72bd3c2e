//! Build script for lanyard-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates badge.toml at compile time
//! - Generates `badge_config.rs` with the validated values as constants

use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Panel resolution in pixels
const PANEL_WIDTH: i64 = 800;
const PANEL_HEIGHT: i64 = 480;

/// Field limits, matching the badge profile in lanyard-core
const MAX_NAME_LEN: usize = 20;
const MAX_PRONOUNS_LEN: usize = 20;
const MAX_AFFILIATION_LEN: usize = 30;
const MAX_ROLE_LEN: usize = 20;

/// GPIOs reserved for the SPI1 clock and data lines
const RESERVED_PINS: [u8; 2] = [10, 11];

fn main() {
    setup_linker();
    let config = load_config();
    let generated = generate(&config);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("badge_config.rs"), generated).unwrap();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of badge.toml
struct BadgeConfig {
    name: String,
    pronouns: String,
    affiliation: String,
    role: String,
    peer: Option<String>,
    lock_timeout_ms: u32,
    idle_timeout_ms: u32,
    cadence_ms: u32,
    caption_rect: [u16; 4],
    font: &'static str,
    wrap: &'static str,
    spi_frequency: u32,
    cs: u8,
    dc: u8,
    rst: u8,
    busy: u8,
    pwr: Option<u8>,
    buttons: [(u8, bool); 3],
}

/// Read, parse and validate badge.toml
fn load_config() -> BadgeConfig {
    // Re-run if badge.toml changes
    println!("cargo:rerun-if-changed=badge.toml");

    let config_path = Path::new("badge.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: badge.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a badge.toml configuration file.          ║\n\
            ║  Please create one in the lanyard-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read badge.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in badge.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let badge = validate_badge(&config, &mut errors);
    let display = validate_display(&config, &mut errors);
    let caption = validate_caption(&config, &mut errors);
    let spi_frequency = validate_spi(&config, &mut errors);
    let pins = validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid badge configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=badge.toml validated successfully");

    let (name, pronouns, affiliation, role, peer) = badge;
    let (lock_timeout_ms, idle_timeout_ms, cadence_ms) = display;
    let (caption_rect, font, wrap) = caption;
    let (cs, dc, rst, busy, pwr, buttons) = pins;
    BadgeConfig {
        name,
        pronouns,
        affiliation,
        role,
        peer,
        lock_timeout_ms,
        idle_timeout_ms,
        cadence_ms,
        caption_rect,
        font,
        wrap,
        spi_frequency,
        cs,
        dc,
        rst,
        busy,
        pwr,
        buttons,
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Validate the identity shown on the badge screen
fn validate_badge(
    config: &toml::Value,
    errors: &mut Vec<String>,
) -> (String, String, String, String, Option<String>) {
    let Some(badge) = section(config, "badge") else {
        errors.push("Missing [badge] section".to_string());
        return Default::default();
    };

    let mut field = |key: &str, max: usize, required: bool| -> Option<String> {
        match badge.get(key) {
            Some(toml::Value::String(s)) => {
                if s.len() > max {
                    errors.push(format!("[badge] {} is longer than {} bytes", key, max));
                }
                if required && s.trim().is_empty() {
                    errors.push(format!("[badge] {} cannot be empty", key));
                }
                Some(s.clone())
            }
            Some(_) => {
                errors.push(format!("[badge] {} must be a string", key));
                None
            }
            None => {
                if required {
                    errors.push(format!("[badge] missing '{}'", key));
                }
                None
            }
        }
    };

    let name = field("name", MAX_NAME_LEN, true).unwrap_or_default();
    let pronouns = field("pronouns", MAX_PRONOUNS_LEN, false).unwrap_or_default();
    let affiliation = field("affiliation", MAX_AFFILIATION_LEN, false).unwrap_or_default();
    let role = field("role", MAX_ROLE_LEN, false).unwrap_or_default();
    let peer = field("peer", MAX_NAME_LEN, false).filter(|p| !p.is_empty());
    (name, pronouns, affiliation, role, peer)
}

fn integer(
    table: Option<&toml::value::Table>,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    match table.and_then(|t| t.get(key)) {
        Some(toml::Value::Integer(v)) => {
            if !range.contains(v) {
                errors.push(format!(
                    "[{}] {} must be {}-{}",
                    section,
                    key,
                    range.start(),
                    range.end()
                ));
            }
            *v
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            default
        }
        None => default,
    }
}

/// Validate timing; every key is optional
fn validate_display(config: &toml::Value, errors: &mut Vec<String>) -> (u32, u32, u32) {
    let display = section(config, "display");
    let lock = integer(display, "display", "lock_timeout_ms", 5000, 0..=60_000, errors);
    let idle = integer(display, "display", "idle_timeout_ms", 5000, 100..=60_000, errors);
    let cadence = integer(display, "display", "cadence_ms", 200, 10..=10_000, errors);
    (lock as u32, idle as u32, cadence as u32)
}

/// Glyph cell size for a font name
fn font_cell(font: &str) -> Option<(i64, i64)> {
    match font {
        "small" => Some((12, 16)),
        "medium" => Some((18, 32)),
        "large" => Some((24, 48)),
        _ => None,
    }
}

/// Validate the caption area and check it holds a usable grid
fn validate_caption(
    config: &toml::Value,
    errors: &mut Vec<String>,
) -> ([u16; 4], &'static str, &'static str) {
    let caption = section(config, "caption");

    let font = match caption.and_then(|c| c.get("font")) {
        None => "large",
        Some(toml::Value::String(f)) => match f.as_str() {
            "small" => "small",
            "medium" => "medium",
            "large" => "large",
            _ => {
                errors.push("[caption] font must be 'small', 'medium', or 'large'".to_string());
                "large"
            }
        },
        Some(_) => {
            errors.push("[caption] font must be a string".to_string());
            "large"
        }
    };

    let wrap = match caption.and_then(|c| c.get("wrap")) {
        None => "rolling_half_clear",
        Some(toml::Value::String(w)) => match w.as_str() {
            "rolling_half_clear" => "rolling_half_clear",
            "clear_when_full" => "clear_when_full",
            _ => {
                errors.push(
                    "[caption] wrap must be 'rolling_half_clear' or 'clear_when_full'".to_string(),
                );
                "rolling_half_clear"
            }
        },
        Some(_) => {
            errors.push("[caption] wrap must be a string".to_string());
            "rolling_half_clear"
        }
    };

    let default_rect = [0, 96, PANEL_WIDTH, PANEL_HEIGHT];
    let rect = match caption.and_then(|c| c.get("rect")) {
        None => default_rect,
        Some(toml::Value::Array(values)) => {
            let coords: Vec<i64> = values.iter().filter_map(|v| v.as_integer()).collect();
            if coords.len() != 4 || values.len() != 4 {
                errors.push("[caption] rect must be 4 integers".to_string());
                default_rect
            } else {
                [coords[0], coords[1], coords[2], coords[3]]
            }
        }
        Some(_) => {
            errors.push("[caption] rect must be an array".to_string());
            default_rect
        }
    };

    let [x0, y0, x1, y1] = rect;
    if x0 < 0 || y0 < 0 || x1 > PANEL_WIDTH || y1 > PANEL_HEIGHT || x0 >= x1 || y0 >= y1 {
        errors.push(format!(
            "[caption] rect must lie within {}x{}",
            PANEL_WIDTH, PANEL_HEIGHT
        ));
    } else if let Some((cell_w, cell_h)) = font_cell(font) {
        let cols = (x1 - x0) / cell_w;
        let rows = (y1 - y0) / cell_h;
        if cols < 8 || rows < 2 {
            errors.push(format!(
                "[caption] rect fits {}x{} cells, need at least 8x2",
                cols, rows
            ));
        }
    }

    let clamp = |v: i64| v.clamp(0, u16::MAX as i64) as u16;
    ([clamp(x0), clamp(y0), clamp(x1), clamp(y1)], font, wrap)
}

fn validate_spi(config: &toml::Value, errors: &mut Vec<String>) -> u32 {
    let spi = section(config, "spi");
    integer(spi, "spi", "frequency", 2_000_000, 100_000..=20_000_000, errors) as u32
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio11" -> (11, false)
/// - "^gpio4" -> (4, true) (internal pull-up)
fn parse_pin_string(s: &str) -> Option<(u8, bool)> {
    let s = s.trim();
    let (s, pull_up) = match s.strip_prefix('^') {
        Some(rest) => (rest, true),
        None => (s, false),
    };
    let pin: u8 = s.strip_prefix("gpio")?.parse().ok()?;
    if pin >= 30 {
        return None;
    }
    Some((pin, pull_up))
}

/// Validate pin assignments: in range, not reserved, no pin used twice
#[allow(clippy::type_complexity)]
fn validate_pins(
    config: &toml::Value,
    errors: &mut Vec<String>,
) -> (u8, u8, u8, u8, Option<u8>, [(u8, bool); 3]) {
    let Some(pins) = section(config, "pins") else {
        errors.push("Missing [pins] section".to_string());
        return (0, 0, 0, 0, None, [(0, false); 3]);
    };

    let mut used = HashSet::new();
    let mut check = |label: String, value: Option<&toml::Value>, allow_pull_up: bool| {
        let parsed = value
            .and_then(|v| v.as_str())
            .and_then(parse_pin_string);
        match parsed {
            None => {
                errors.push(format!("[pins] {} must look like \"gpio<0-29>\"", label));
                None
            }
            Some((_, true)) if !allow_pull_up => {
                errors.push(format!("[pins] {} is an output; drop the '^'", label));
                None
            }
            Some((pin, _)) if RESERVED_PINS.contains(&pin) => {
                errors.push(format!("[pins] {} uses gpio{}, reserved for SPI", label, pin));
                None
            }
            Some((pin, pull_up)) => {
                if !used.insert(pin) {
                    errors.push(format!("[pins] gpio{} assigned twice ({})", pin, label));
                }
                Some((pin, pull_up))
            }
        }
    };

    let cs = check("cs".to_string(), pins.get("cs"), false);
    let dc = check("dc".to_string(), pins.get("dc"), false);
    let rst = check("rst".to_string(), pins.get("rst"), false);
    let busy = check("busy".to_string(), pins.get("busy"), true);
    let pwr = pins
        .get("pwr")
        .and_then(|v| check("pwr".to_string(), Some(v), false));

    let mut buttons = [(0, false); 3];
    match pins.get("buttons") {
        Some(toml::Value::Array(list)) if list.len() == 3 => {
            for (i, value) in list.iter().enumerate() {
                if let Some(button) = check(format!("buttons[{}]", i), Some(value), true) {
                    buttons[i] = button;
                }
            }
        }
        _ => errors.push("[pins] buttons must list exactly 3 pins".to_string()),
    }

    let pin = |p: Option<(u8, bool)>| p.map(|(n, _)| n).unwrap_or_default();
    (
        pin(cs),
        pin(dc),
        pin(rst),
        pin(busy),
        pwr.map(|(n, _)| n),
        buttons,
    )
}

fn font_variant(font: &str) -> &'static str {
    match font {
        "small" => "FontSize::Small",
        "medium" => "FontSize::Medium",
        _ => "FontSize::Large",
    }
}

fn wrap_variant(wrap: &str) -> &'static str {
    match wrap {
        "clear_when_full" => "WrapPolicy::ClearWhenFull",
        _ => "WrapPolicy::RollingHalfClear",
    }
}

/// Render the validated config as Rust constants
fn generate(config: &BadgeConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Generated from badge.toml by build.rs");
    let _ = writeln!(out, "pub const NAME: &str = {:?};", config.name);
    let _ = writeln!(out, "pub const PRONOUNS: &str = {:?};", config.pronouns);
    let _ = writeln!(out, "pub const AFFILIATION: &str = {:?};", config.affiliation);
    let _ = writeln!(out, "pub const ROLE: &str = {:?};", config.role);
    let _ = writeln!(out, "pub const PEER: Option<&str> = {:?};", config.peer);
    let _ = writeln!(out, "pub const LOCK_TIMEOUT_MS: u32 = {};", config.lock_timeout_ms);
    let _ = writeln!(out, "pub const IDLE_TIMEOUT_MS: u32 = {};", config.idle_timeout_ms);
    let _ = writeln!(out, "pub const CADENCE_MS: u32 = {};", config.cadence_ms);
    let [x0, y0, x1, y1] = config.caption_rect;
    let _ = writeln!(
        out,
        "pub const CAPTION_RECT: Rect = Rect::new({}, {}, {}, {});",
        x0, y0, x1, y1
    );
    let _ = writeln!(
        out,
        "pub const CAPTION_FONT: FontSize = {};",
        font_variant(config.font)
    );
    let _ = writeln!(
        out,
        "pub const CAPTION_WRAP: WrapPolicy = {};",
        wrap_variant(config.wrap)
    );
    let _ = writeln!(out, "pub const SPI_FREQUENCY: u32 = {};", config.spi_frequency);
    let _ = writeln!(out, "pub const PIN_CS: u8 = {};", config.cs);
    let _ = writeln!(out, "pub const PIN_DC: u8 = {};", config.dc);
    let _ = writeln!(out, "pub const PIN_RST: u8 = {};", config.rst);
    let _ = writeln!(out, "pub const PIN_BUSY: u8 = {};", config.busy);
    let _ = writeln!(out, "pub const PIN_PWR: Option<u8> = {:?};", config.pwr);
    let _ = writeln!(
        out,
        "pub const BUTTON_PINS: [(u8, bool); 3] = {:?};",
        config.buttons
    );
    out
}
