//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod display;
pub mod ingest;
pub mod link_rx;
pub mod scheduler;

pub use display::display_task;
pub use ingest::ingest_task;
pub use link_rx::link_rx_task;
pub use scheduler::scheduler_task;
