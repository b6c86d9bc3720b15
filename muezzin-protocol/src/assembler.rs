//! Byte stream to packet reassembly.
//!
//! When the wireless link is bridged onto a serial port, characteristic
//! writes arrive as a plain byte stream and may be split or merged. The
//! assembler cuts the stream back into packets using the fixed length
//! implied by each header byte.

use heapless::Vec;

use crate::packet::{packet_len, PacketBuf};

/// State machine for reassembling packets from a byte stream
#[derive(Debug, Clone)]
pub struct PacketAssembler {
    state: AssembleState,
    buffer: PacketBuf,
    skipped: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Waiting for a known header byte
    WaitingForHeader,
    /// Got a header, collecting its payload
    Collecting { expected: usize },
}

impl Default for PacketAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketAssembler {
    /// Create a new assembler
    pub const fn new() -> Self {
        Self {
            state: AssembleState::WaitingForHeader,
            buffer: Vec::new(),
            skipped: 0,
        }
    }

    /// Drop any partially assembled packet
    pub fn reset(&mut self) {
        self.state = AssembleState::WaitingForHeader;
        self.buffer.clear();
    }

    /// Number of noise bytes dropped while hunting for a header
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// Feed a single byte to the assembler
    ///
    /// Returns `Some(buffer)` when the byte completes a packet.
    pub fn feed(&mut self, byte: u8) -> Option<PacketBuf> {
        match self.state {
            AssembleState::WaitingForHeader => {
                let Some(expected) = packet_len(byte) else {
                    self.skipped = self.skipped.wrapping_add(1);
                    return None;
                };
                self.buffer.clear();
                // Capacity is MAX_PACKET_LEN, the buffer was just cleared
                let _ = self.buffer.push(byte);
                self.state = AssembleState::Collecting { expected };
            }
            AssembleState::Collecting { .. } => {
                let _ = self.buffer.push(byte);
            }
        }

        match self.state {
            AssembleState::Collecting { expected } if self.buffer.len() >= expected => {
                let packet = self.buffer.clone();
                self.reset();
                Some(packet)
            }
            _ => None,
        }
    }
}
