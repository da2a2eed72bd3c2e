//! Lanyard - Caption Badge Firmware
//!
//! Main firmware binary for RP2040 boards driving a 7.5" e-paper panel.
//! The badge shows its wearer's name card while idle and a rolling live
//! caption while they speak.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lanyard_core::Display;
use lanyard_drivers::epd::{PanelPins, SharedLevel, SpiPanel};
use lanyard_hal_rp2040::gpio::{GpioInput, GpioOutput};
use lanyard_hal_rp2040::pins::PinBank;
use lanyard_hal_rp2040::spi::{rp_config, PanelSpi};
use lanyard_hal_rp2040::Level;

use crate::channels::{BUSY_LEVEL, BUSY_RELEASED};

mod channels;
mod config;
mod tasks;

// Heap allocator for the frame buffer
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 64KB (the 800x480 canvas takes 48000 bytes)
const HEAP_SIZE: usize = 64 * 1024;

/// Panel binding as wired on this board
pub type BadgePanel = SpiPanel<
    'static,
    CriticalSectionRawMutex,
    PanelSpi<'static, SPI1>,
    GpioOutput<'static>,
    GpioOutput<'static>,
    Option<GpioOutput<'static>>,
    SharedLevel,
    Delay,
>;

/// Display service shared by the control and worker tasks
pub type BadgeDisplay = Display<CriticalSectionRawMutex, BadgePanel>;

static DISPLAY: StaticCell<BadgeDisplay> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lanyard firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    let (mut bank, board) = PinBank::split(p);
    info!("Peripherals initialized");

    // Panel SPI on SPI1; pin numbers come from badge.toml
    let spi_config = config::spi_config();
    let spi = Spi::new_blocking_txonly(
        board.spi,
        board.sck,
        board.mosi,
        rp_config(&spi_config),
    );
    let cs = GpioOutput::new(unwrap!(bank.take(config::PIN_CS)), Level::High);
    let spi = PanelSpi::new(spi, cs);

    let pins = PanelPins {
        dc: GpioOutput::new(unwrap!(bank.take(config::PIN_DC)), Level::Low),
        rst: GpioOutput::new(unwrap!(bank.take(config::PIN_RST)), Level::High),
        pwr: config::PIN_PWR.map(|pin| GpioOutput::new(unwrap!(bank.take(pin)), Level::Low)),
        busy: SharedLevel::new(&BUSY_LEVEL),
    };
    let busy_pin = GpioInput::new(unwrap!(bank.take(config::PIN_BUSY)), false);
    let buttons = config::BUTTON_PINS
        .map(|(pin, pull_up)| GpioInput::new(unwrap!(bank.take(pin)), pull_up));

    let mut panel = SpiPanel::new(spi, pins, Delay, &BUSY_RELEASED, spi_config);
    panel.power_up().await;
    info!("Panel powered");

    let display = unwrap!(Display::new(panel, config::profile(), config::display_config()));
    let display: &'static BadgeDisplay = DISPLAY.init(display);

    // Spawn tasks
    spawner
        .spawn(tasks::busy_task(busy_pin, SharedLevel::new(&BUSY_LEVEL)))
        .unwrap();
    spawner.spawn(tasks::display_task(display)).unwrap();
    spawner.spawn(tasks::control_task(display, buttons)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
