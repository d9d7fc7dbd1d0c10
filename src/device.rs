//! Audio-output device boundary.
//!
//! The player never decodes or outputs audio itself. It talks to an
//! [`AudioDevice`] through the [`DeviceBridge`], which turns state transitions
//! into device commands and device events back into playback events.

mod bridge;
mod output;
mod sink;
mod types;

pub use bridge::DeviceBridge;
pub use output::RodioDevice;
pub use types::{AudioDevice, DeviceEvent, LoadToken, Signal, SignalSink, Subscription};
