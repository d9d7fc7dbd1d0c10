use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};

use super::state::PlaybackState;

/// Source of uniformly distributed indices for shuffle.
pub trait RandomSource {
    /// An index in `0..len`. `len` is never zero.
    fn index_below(&mut self, len: usize) -> usize;
}

impl RandomSource for ThreadRng {
    fn index_below(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

impl RandomSource for StdRng {
    fn index_below(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Next/previous track policy under the repeat and shuffle flags.
///
/// Both functions return `None` only for an empty catalog.
pub struct TrackSelector;

impl TrackSelector {
    /// Shuffle draws uniformly from the whole catalog and may land on the
    /// current track again; otherwise the catalog is walked cyclically.
    pub fn next(
        state: &PlaybackState,
        len: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if state.shuffle {
            Some(rng.index_below(len) % len)
        } else {
            Some((state.current + 1) % len)
        }
    }

    /// Previous never shuffles.
    pub fn previous(state: &PlaybackState, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if state.current == 0 || state.current >= len {
            Some(len - 1)
        } else {
            Some(state.current - 1)
        }
    }
}
