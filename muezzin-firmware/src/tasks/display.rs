//! Display UART transmit task
//!
//! The display is a plain text terminal on UART1. Each announcement is
//! written as three lines: a title, the prayer name and its time.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::String;

use muezzin_core::scheduler::NextPrayer;

use crate::channels::NEXT_PRAYER;

/// Longest rendering: "Next Prayer:\r\nMaghrib\r\nHH:MM\r\n"
const LINE_BUF_SIZE: usize = 48;

/// Display task - renders each new next prayer
#[embassy_executor::task]
pub async fn display_task(mut tx: BufferedUartTx) {
    info!("Display task started");

    loop {
        let next = NEXT_PRAYER.wait().await;
        show(&mut tx, &next).await;
    }
}

async fn show(tx: &mut BufferedUartTx, next: &NextPrayer) {
    let mut text: String<LINE_BUF_SIZE> = String::new();
    if next.write_lines(&mut text).is_err() {
        warn!("Display text overflow");
        return;
    }

    if let Err(e) = tx.write_all(text.as_bytes()).await {
        warn!("Failed to write display: {:?}", e);
    } else {
        trace!("Display updated");
    }
}
