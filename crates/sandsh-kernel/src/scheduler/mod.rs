//! Background work.
//!
//! `cp -d` hands its copy to a single worker task fed by a FIFO queue. The
//! command loop never waits on it; results come back through the output
//! sink only.

mod background;

pub use background::{BackgroundRunner, CopyQueue};
