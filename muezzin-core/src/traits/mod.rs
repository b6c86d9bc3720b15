//! Collaborator traits
//!
//! These traits define the interface between the pipeline logic and the
//! board: where write buffers come from, where the time comes from, and
//! where the next prayer goes.

pub mod clock;
pub mod display;
pub mod source;

pub use clock::WallClock;
pub use display::PrayerDisplay;
pub use source::PacketSource;
