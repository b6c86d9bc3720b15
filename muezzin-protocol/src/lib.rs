//! Schedule Upload Protocol
//!
//! This crate defines the packets a phone application writes to the display
//! over the wireless link to upload a month of prayer times and set the
//! clock. The format is fixed by the existing sender and must stay
//! bit-exact.
//!
//! # Protocol Overview
//!
//! Every write starts with a one byte header followed by a fixed-size payload:
//! ```text
//! ┌────────┬──────────────────────────────────────────────┐
//! │ HEADER │ PAYLOAD                                      │
//! ├────────┼──────────────────────────────────────────────┤
//! │ 0x69   │ day count                              (1B)  │
//! │ 0x42   │ day, month, year hi, year lo, 5×(h,m)  (14B) │
//! │ 0x88   │ -                                      (0B)  │
//! │ 0x20   │ h, m, s, day, month (0-based), yr hi/lo (7B) │
//! └────────┴──────────────────────────────────────────────┘
//! ```
//!
//! There is no framing or checksum. Unknown headers are noise and get
//! dropped by the receiver.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod packet;

pub use assembler::PacketAssembler;
pub use packet::{
    packet_len, ClockPacket, HourMinute, Packet, PacketBuf, PacketError, TimingsPacket,
    CURRENT_TIME_HEADER, END_OF_TIMINGS_HEADER, MAX_PACKET_LEN, NUMBER_OF_DAYS_HEADER,
    PRAYER_TIMINGS_HEADER,
};
