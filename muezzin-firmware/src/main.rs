//! Muezzin - Prayer Time Display Firmware
//!
//! Main firmware binary for RP2040-based prayer time displays.
//!
//! A phone app uploads a month of prayer times over a wireless serial
//! bridge. The ingest task collects the month, the scheduler task works
//! through it one day at a time, and the display shows the next prayer.
//!
//! ```text
//!  UART0 ─► link_rx ─► WRITE_CHANNEL ─► ingest ─► SCHEDULE_CHANNEL ─► scheduler
//!                                          ▲                              │
//!                                          └──────── drained ◄────────────┤
//!                                                                         ▼
//!  UART1 ◄─────────────────────── display ◄────────────────────── NEXT_PRAYER
//! ```

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use muezzin_core::traits::WallClock;

use crate::channels::CLOCK;
use crate::config::load_config;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Display UART baud rate (fixed by the display module)
const DISPLAY_BAUD: u32 = 9600;

// Static cells for UART buffers (must live forever)
static LINK_TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static DISPLAY_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static DISPLAY_RX_BUF: StaticCell<[u8; 16]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Muezzin firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    CLOCK.set(config.clock.boot_time());
    info!("Clock starts at {}", CLOCK.now());

    // Wireless bridge on UART0 (GPIO0 TX, GPIO1 RX)
    let link_uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = config.link.baud_rate;
        cfg
    };
    let link_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, link_uart_config);
    let link_uart = link_uart.into_buffered(
        Irqs,
        LINK_TX_BUF.init([0u8; 16]),
        LINK_RX_BUF.init([0u8; 256]),
    );
    let (_link_tx, link_rx) = link_uart.split();

    info!("Link UART initialized at {} baud", config.link.baud_rate);

    // Text display on UART1 (GPIO4 TX, GPIO5 RX)
    let display_uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = DISPLAY_BAUD;
        cfg
    };
    let display_uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, display_uart_config);
    let display_uart = display_uart.into_buffered(
        Irqs,
        DISPLAY_TX_BUF.init([0u8; 64]),
        DISPLAY_RX_BUF.init([0u8; 16]),
    );
    let (display_tx, _display_rx) = display_uart.split();

    info!("Display UART initialized");

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(link_rx)).unwrap();
    spawner.spawn(tasks::ingest_task(config.ingest)).unwrap();
    spawner.spawn(tasks::scheduler_task(config.scheduler)).unwrap();
    spawner.spawn(tasks::display_task(display_tx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat, clock {}", CLOCK.now());
    }
}
