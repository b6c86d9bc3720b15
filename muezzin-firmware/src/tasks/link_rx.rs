//! Link UART receive task
//!
//! The wireless module bridges the phone's writes onto UART0 as a plain
//! byte stream. Bytes are cut back into write buffers and queued for
//! ingest.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use muezzin_protocol::PacketAssembler;

use crate::channels::WRITE_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - assembles write buffers from the bridge byte stream
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut assembler = PacketAssembler::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    if let Some(write) = assembler.feed(byte) {
                        // Ingest may be parked on a drain; let the link back up
                        WRITE_CHANNEL.send(write).await;
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
                assembler.reset();
            }
        }
    }
}
