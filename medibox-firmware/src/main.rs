//! Medibox - Display Controller Firmware
//!
//! Touchscreen front end for the Medibox medicine dispenser. Mirrors the
//! primary controller's state received over UART, shows it on an ILI9341
//! TFT, and reports the user's answers from the XPT2046 touch panel.
//!
//! Runs one cooperative loop: drain the link, check the confirmation
//! deadline, sample touch, draw, sleep.

#![no_std]
#![no_main]

extern crate alloc;

use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Duration, Timer};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use medibox_core::config::{
    DisplayConfig, LinkConfig, ScreenGeometry, Timing, TouchCalibration,
};
use medibox_core::Runtime;
use medibox_display::TftRenderer;
use medibox_protocol::LinkMode;

use crate::clock::EmbassyClock;
use crate::ili9341::Ili9341;
use crate::tft::TftPanel;
use crate::uart::UartLink;
use crate::xpt2046::Xpt2046;

#[macro_use]
mod log;

mod clock;
mod ili9341;
mod tft;
mod uart;
mod xpt2046;

// Generated by build.rs from display.toml
include!(concat!(env!("OUT_DIR"), "/display_config.rs"));

// Heap allocator for JSON decoding
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// TFT SPI clock
const DISPLAY_SPI_HZ: u32 = 40_000_000;
/// The XPT2046 tops out at 2.5 MHz
const TOUCH_SPI_HZ: u32 = 2_000_000;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 2048]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Medibox display starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = DISPLAY_CONFIG;
    info!(
        "Config: link {} at {} baud, loop {}ms, debounce {}ms",
        config.link.mode,
        config.link.baudrate,
        config.timing.loop_interval_ms,
        config.timing.debounce_ms
    );

    // Link to the primary controller: UART0 on GP0 (TX) / GP1 (RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.link.baudrate;
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 2048]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let serial = UartLink::new(uart);
    info!("UART initialized");

    // TFT on SPI1: SCK GP10, MOSI GP11, MISO GP12, CS GP13, DC GP14, RST GP15
    let mut display_spi_config = SpiConfig::default();
    display_spi_config.frequency = DISPLAY_SPI_HZ;
    let display_spi = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, display_spi_config);
    let mut panel = Ili9341::new(
        display_spi,
        Output::new(p.PIN_13, Level::High),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::High),
    );
    let _backlight = Output::new(p.PIN_21, Level::High);

    // Blocking bring-up, once, before the loop
    match panel.init(&mut Delay) {
        Ok(()) => info!("TFT initialized"),
        Err(e) => error!("TFT init failed: {}", e),
    }

    // Touch on SPI0: SCK GP18, MOSI GP19, MISO GP16, CS GP17, IRQ GP20
    let mut touch_spi_config = SpiConfig::default();
    touch_spi_config.frequency = TOUCH_SPI_HZ;
    let touch_spi = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, touch_spi_config);
    let touch = Xpt2046::new(
        touch_spi,
        Output::new(p.PIN_17, Level::High),
        Input::new(p.PIN_20, Pull::Up),
    );
    info!("Touch initialized");

    let mut renderer = TftRenderer::new(TftPanel::new(panel));
    let mut runtime = Runtime::new(config, serial, touch, EmbassyClock);

    let interval = Duration::from_millis(u64::from(config.timing.loop_interval_ms));
    let debounce = Duration::from_millis(u64::from(config.timing.debounce_ms));

    info!("Entering main loop");
    loop {
        let report = runtime.tick(&mut renderer);
        if report.messages > 0 || report.dropped > 0 || report.link_errors > 0 {
            debug!(
                "rx: {} ok, {} dropped, {} link errors",
                report.messages, report.dropped, report.link_errors
            );
        }
        if report.render_failed {
            warn!("draw failed on {}", runtime.controller().current_screen());
        }
        if report.debounce() {
            Timer::after(debounce).await;
        }
        Timer::after(interval).await;
    }
}

#[cfg(not(feature = "defmt"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    loop {
        cortex_m::asm::udf();
    }
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
