//! Packet encoding and decoding.
//!
//! Packet layouts (byte offsets):
//! - NUMBER_OF_DAYS: `[0x69, count]`
//! - PRAYER_TIMINGS: `[0x42, day, month, year_hi, year_lo, fajr_h, fajr_m,
//!   dhuhr_h, dhuhr_m, asr_h, asr_m, maghrib_h, maghrib_m, isha_h, isha_m]`
//! - END_OF_TIMINGS: `[0x88]`
//! - CURRENT_TIME: `[0x20, hour, minute, second, day, month_index, year_hi, year_lo]`

use heapless::Vec;

/// Starts a new batch, carries the number of days that follow
pub const NUMBER_OF_DAYS_HEADER: u8 = 0x69;

/// One day of prayer times
pub const PRAYER_TIMINGS_HEADER: u8 = 0x42;

/// Closes the batch
pub const END_OF_TIMINGS_HEADER: u8 = 0x88;

/// Wall clock synchronization
pub const CURRENT_TIME_HEADER: u8 = 0x20;

/// Longest packet on the wire (PRAYER_TIMINGS)
pub const MAX_PACKET_LEN: usize = 15;

/// Prayers carried per PRAYER_TIMINGS packet
pub const PRAYERS_PER_DAY: usize = 5;

/// A raw write buffer holding at most one packet
pub type PacketBuf = Vec<u8, MAX_PACKET_LEN>;

/// Errors that can occur while decoding or encoding a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Write carried no bytes at all
    Empty,
    /// First byte is not one of the four known headers
    UnknownHeader(u8),
    /// Buffer is shorter than the header's fixed length
    Truncated { header: u8, len: usize },
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Wire length of a packet, header byte included
///
/// Returns `None` for unknown headers.
pub const fn packet_len(header: u8) -> Option<usize> {
    match header {
        NUMBER_OF_DAYS_HEADER => Some(2),
        PRAYER_TIMINGS_HEADER => Some(15),
        END_OF_TIMINGS_HEADER => Some(1),
        CURRENT_TIME_HEADER => Some(8),
        _ => None,
    }
}

/// An hour/minute pair as sent on the wire (no range checking)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HourMinute {
    pub hour: u8,
    pub minute: u8,
}

impl HourMinute {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

/// Payload of a PRAYER_TIMINGS packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingsPacket {
    /// Day of month, 1-based
    pub day: u8,
    /// Month, 1-based
    pub month: u8,
    /// Century part of the year (e.g. 20)
    pub year_hi: u8,
    /// Year within the century (e.g. 24)
    pub year_lo: u8,
    /// Fajr, Dhuhr, Asr, Maghrib, Isha - always in this order
    pub times: [HourMinute; PRAYERS_PER_DAY],
}

impl TimingsPacket {
    /// Full year from the two wire bytes
    pub fn year(&self) -> u16 {
        self.year_hi as u16 * 100 + self.year_lo as u16
    }

    /// Split a year into its two wire bytes
    ///
    /// Years above 25599 do not fit and are truncated.
    pub fn split_year(year: u16) -> (u8, u8) {
        ((year / 100) as u8, (year % 100) as u8)
    }
}

/// Payload of a CURRENT_TIME packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockPacket {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Day of month, 1-based
    pub day: u8,
    /// Month, 0-based (0 = January)
    pub month_index: u8,
    pub year_hi: u8,
    pub year_lo: u8,
}

impl ClockPacket {
    /// Full year from the two wire bytes
    pub fn year(&self) -> u16 {
        self.year_hi as u16 * 100 + self.year_lo as u16
    }
}

/// A decoded packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Packet {
    /// A new batch begins with `count` days
    NumberOfDays { count: u8 },
    /// One day of prayer times
    PrayerTimings(TimingsPacket),
    /// The batch is complete
    EndOfTimings,
    /// Set the wall clock
    CurrentTime(ClockPacket),
}

impl Packet {
    /// Decode a single write buffer
    ///
    /// Trailing bytes past the header's fixed length are ignored.
    pub fn decode(buf: &[u8]) -> Result<Self, PacketError> {
        let header = *buf.first().ok_or(PacketError::Empty)?;
        let len = packet_len(header).ok_or(PacketError::UnknownHeader(header))?;
        if buf.len() < len {
            return Err(PacketError::Truncated {
                header,
                len: buf.len(),
            });
        }

        let packet = match header {
            NUMBER_OF_DAYS_HEADER => Packet::NumberOfDays { count: buf[1] },
            PRAYER_TIMINGS_HEADER => {
                let times = core::array::from_fn(|i| {
                    HourMinute::new(buf[5 + i * 2], buf[6 + i * 2])
                });
                Packet::PrayerTimings(TimingsPacket {
                    day: buf[1],
                    month: buf[2],
                    year_hi: buf[3],
                    year_lo: buf[4],
                    times,
                })
            }
            END_OF_TIMINGS_HEADER => Packet::EndOfTimings,
            // CURRENT_TIME_HEADER is the only header left after packet_len()
            _ => Packet::CurrentTime(ClockPacket {
                hour: buf[1],
                minute: buf[2],
                second: buf[3],
                day: buf[4],
                month_index: buf[5],
                year_hi: buf[6],
                year_lo: buf[7],
            }),
        };

        Ok(packet)
    }

    /// Header byte for this packet
    pub fn header(&self) -> u8 {
        match self {
            Packet::NumberOfDays { .. } => NUMBER_OF_DAYS_HEADER,
            Packet::PrayerTimings(_) => PRAYER_TIMINGS_HEADER,
            Packet::EndOfTimings => END_OF_TIMINGS_HEADER,
            Packet::CurrentTime(_) => CURRENT_TIME_HEADER,
        }
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let header = self.header();
        // packet_len() knows every header produced by header()
        let len = packet_len(header).unwrap_or(1);
        if buffer.len() < len {
            return Err(PacketError::BufferTooSmall);
        }

        buffer[0] = header;
        match self {
            Packet::NumberOfDays { count } => buffer[1] = *count,
            Packet::PrayerTimings(t) => {
                buffer[1] = t.day;
                buffer[2] = t.month;
                buffer[3] = t.year_hi;
                buffer[4] = t.year_lo;
                for (i, time) in t.times.iter().enumerate() {
                    buffer[5 + i * 2] = time.hour;
                    buffer[6 + i * 2] = time.minute;
                }
            }
            Packet::EndOfTimings => {}
            Packet::CurrentTime(c) => {
                buffer[1..8].copy_from_slice(&[
                    c.hour,
                    c.minute,
                    c.second,
                    c.day,
                    c.month_index,
                    c.year_hi,
                    c.year_lo,
                ]);
            }
        }

        Ok(len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<PacketBuf, PacketError> {
        let mut buffer = [0u8; MAX_PACKET_LEN];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| PacketError::BufferTooSmall)?;
        Ok(vec)
    }
}
