use crossterm::event::{KeyCode, KeyEvent};

use crate::config::ControlsSettings;
use crate::error::DeviceFault;
use crate::playback::{Intent, PlaybackState};

use super::controller::Input;

/// Presentation-local state: list cursor and dismissed warning.
#[derive(Debug, Default)]
pub struct View {
    pub cursor: usize,
    dismissed: Option<DeviceFault>,
    followed: Option<usize>,
}

impl View {
    /// Follow the playing track with the cursor when it changes, and forget
    /// a dismissal once the error it hid is cleared.
    pub fn observe(&mut self, state: &PlaybackState) {
        if self.followed != Some(state.current) {
            self.followed = Some(state.current);
            self.cursor = state.current;
        }
        if state.last_error.is_none() {
            self.dismissed = None;
        }
    }

    /// The warning to show, unless the user dismissed it.
    pub fn warning<'a>(&self, state: &'a PlaybackState) -> Option<&'a DeviceFault> {
        state
            .last_error
            .as_ref()
            .filter(|fault| self.dismissed.as_ref() != Some(*fault))
    }

    fn dismiss(&mut self, state: &PlaybackState) {
        self.dismissed = state.last_error.clone();
    }
}

/// Round to whole percent so repeated steps land exactly on 0 and 1.
fn step_volume(base: f64, delta: f64) -> f64 {
    (((base + delta) * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

fn scrub(state: &PlaybackState, delta: f64) -> Option<Input> {
    let duration = state.duration.filter(|d| *d > 0.0)?;
    Some(Input::Intent(Intent::Seek((state.elapsed + delta) / duration)))
}

/// Map a key press to an input for the queue.
///
/// Cursor movement and warning dismissal stay in `view` and yield `None`.
pub fn key_to_input(
    key: KeyEvent,
    controls: &ControlsSettings,
    state: &PlaybackState,
    len: usize,
    view: &mut View,
) -> Option<Input> {
    let scrub_secs = controls.scrub_seconds as f64;

    match key.code {
        KeyCode::Char('q') => Some(Input::Quit),

        KeyCode::Char('j') | KeyCode::Down => {
            if len > 0 {
                view.cursor = (view.cursor + 1) % len;
            }
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if len > 0 {
                view.cursor = if view.cursor == 0 || view.cursor >= len {
                    len - 1
                } else {
                    view.cursor - 1
                };
            }
            None
        }
        KeyCode::Char('g') | KeyCode::Home => {
            view.cursor = 0;
            None
        }
        KeyCode::Char('G') | KeyCode::End => {
            view.cursor = len.saturating_sub(1);
            None
        }
        KeyCode::Enter => (len > 0).then(|| Input::Intent(Intent::SelectTrack(view.cursor))),

        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Input::Intent(Intent::TogglePlayPause)),
        KeyCode::Char('l') => Some(Input::Intent(Intent::Next)),
        KeyCode::Char('h') => Some(Input::Intent(Intent::Previous)),
        KeyCode::Char('L') => scrub(state, scrub_secs),
        KeyCode::Char('H') => scrub(state, -scrub_secs),

        KeyCode::Char('+') | KeyCode::Char('=') => Some(Input::Intent(Intent::SetVolume(
            step_volume(state.output_volume(), controls.volume_step),
        ))),
        KeyCode::Char('-') => Some(Input::Intent(Intent::SetVolume(step_volume(
            state.output_volume(),
            -controls.volume_step,
        )))),
        KeyCode::Char('m') => Some(Input::Intent(Intent::ToggleMute)),
        KeyCode::Char('r') => Some(Input::Intent(Intent::ToggleRepeat)),
        KeyCode::Char('s') => Some(Input::Intent(Intent::ToggleShuffle)),

        KeyCode::Char('t') => Some(Input::ToggleTheme),
        KeyCode::Char('x') => {
            view.dismiss(state);
            None
        }
        _ => None,
    }
}
