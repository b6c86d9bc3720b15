//! Write buffer source trait

use muezzin_protocol::PacketBuf;

/// Delivers raw write buffers from the wireless transport, in order
#[allow(async_fn_in_trait)]
pub trait PacketSource {
    /// Wait for the next write
    async fn next_write(&mut self) -> PacketBuf;
}
