//! Playback state machine.
//!
//! `PlaybackState` is the single authoritative record of what the player is
//! doing. It only ever changes through [`transition`], a pure function of the
//! previous state and one [`Event`]. Side effects (device commands, play-count
//! bumps) are described in the returned [`Transition`] and carried out by the
//! runtime.

mod event;
mod selector;
mod state;
mod transition;

pub use event::{Event, Intent};
pub use selector::{RandomSource, TrackSelector};
pub use state::PlaybackState;
pub use transition::{Cue, SEEK_ECHO_TOLERANCE, Transition, transition};

#[cfg(test)]
mod tests;
