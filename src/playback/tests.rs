use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::error::DeviceFault;

/// Hands out a fixed sequence of indices.
struct Scripted(VecDeque<usize>);

impl Scripted {
    fn new(seq: &[usize]) -> Self {
        Self(seq.iter().copied().collect())
    }
}

impl RandomSource for Scripted {
    fn index_below(&mut self, _len: usize) -> usize {
        self.0.pop_front().unwrap_or(0)
    }
}

fn apply(state: &PlaybackState, event: Event, len: usize) -> Transition {
    transition(state, event, len, &mut Scripted::new(&[]))
}

fn run(mut state: PlaybackState, events: &[Event], len: usize) -> PlaybackState {
    for e in events {
        state = apply(&state, e.clone(), len).state;
    }
    state
}

#[test]
fn next_without_modes_cycles_through_catalog() {
    let mut state = PlaybackState::default();
    let mut seen = Vec::new();
    for _ in 0..3 {
        let t = apply(&state, Event::Next, 3);
        assert_eq!(t.cue, Some(Cue::Load));
        state = t.state;
        seen.push(state.current);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.is_playing);
    }
    assert_eq!(seen, vec![1, 2, 0]);
}

#[test]
fn next_is_cyclic_for_any_catalog_size() {
    for n in 1..8 {
        let mut state = PlaybackState::default();
        for step in 0..(2 * n) {
            let before = state.current;
            state = apply(&state, Event::Next, n).state;
            assert_eq!(state.current, (before + 1) % n, "n={n} step={step}");
        }
    }
}

#[test]
fn repeat_keeps_index_and_rewinds() {
    for n in 1..5 {
        let mut state = PlaybackState {
            repeat: true,
            shuffle: true,
            current: n - 1,
            elapsed: 42.0,
            ..PlaybackState::default()
        };
        for _ in 0..3 {
            let t = apply(&state, Event::Next, n);
            assert_eq!(t.cue, Some(Cue::Restart));
            assert_eq!(t.state.current, n - 1);
            assert_eq!(t.state.elapsed, 0.0);
            assert!(t.state.is_playing);
            state = t.state;
            state.elapsed = 10.0;
        }
    }
}

#[test]
fn device_ended_behaves_like_next() {
    let state = PlaybackState {
        current: 1,
        elapsed: 200.0,
        ..PlaybackState::default()
    };
    assert_eq!(
        apply(&state, Event::DeviceEnded, 3),
        apply(&state, Event::Next, 3)
    );
}

#[test]
fn shuffle_uses_the_injected_random_source() {
    let state = PlaybackState {
        shuffle: true,
        ..PlaybackState::default()
    };
    let mut rng = Scripted::new(&[2, 0, 1]);
    let a = transition(&state, Event::Next, 3, &mut rng).state;
    assert_eq!(a.current, 2);
    let b = transition(&a, Event::Next, 3, &mut rng).state;
    assert_eq!(b.current, 0);
    let c = transition(&b, Event::Next, 3, &mut rng).state;
    assert_eq!(c.current, 1);
}

#[test]
fn shuffle_may_pick_the_current_track_and_restarts_it() {
    let state = PlaybackState {
        shuffle: true,
        current: 1,
        elapsed: 30.0,
        duration: Some(100.0),
        ..PlaybackState::default()
    };
    let t = transition(&state, Event::Next, 3, &mut Scripted::new(&[1]));
    assert_eq!(t.state.current, 1);
    assert_eq!(t.state.elapsed, 0.0);
    assert_eq!(t.state.duration, Some(100.0));
    assert_eq!(t.cue, Some(Cue::Restart));
}

#[test]
fn seeded_shuffle_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = PlaybackState {
        shuffle: true,
        ..PlaybackState::default()
    };
    for _ in 0..200 {
        state = transition(&state, Event::Next, 5, &mut rng).state;
        assert!(state.current < 5);
    }
}

#[test]
fn previous_restarts_past_three_seconds() {
    let state = PlaybackState {
        current: 1,
        elapsed: 5.0,
        is_playing: false,
        ..PlaybackState::default()
    };
    let t = apply(&state, Event::Previous, 3);
    assert_eq!(t.state.current, 1);
    assert_eq!(t.state.elapsed, 0.0);
    assert!(!t.state.is_playing);
    assert_eq!(t.cue, Some(Cue::Restart));

    let early = PlaybackState {
        elapsed: 1.0,
        ..state
    };
    let t = apply(&early, Event::Previous, 3);
    assert_eq!(t.state.current, 0);
    assert!(t.state.is_playing);
    assert_eq!(t.cue, Some(Cue::Load));
}

#[test]
fn previous_wraps_and_ignores_shuffle() {
    let state = PlaybackState {
        shuffle: true,
        ..PlaybackState::default()
    };
    let t = transition(&state, Event::Previous, 4, &mut Scripted::new(&[1, 1, 1]));
    assert_eq!(t.state.current, 3);
}

#[test]
fn single_track_next_and_previous_restart_in_place() {
    let state = PlaybackState {
        elapsed: 2.0,
        ..PlaybackState::default()
    };
    for event in [Event::Next, Event::Previous] {
        let t = apply(&state, event, 1);
        assert_eq!(t.state.current, 0);
        assert_eq!(t.state.elapsed, 0.0);
        assert_eq!(t.cue, Some(Cue::Restart));
    }
}

#[test]
fn empty_catalog_ignores_track_events() {
    let state = PlaybackState::default();
    for event in [
        Event::SelectTrack(0),
        Event::TogglePlayPause,
        Event::Next,
        Event::Previous,
        Event::DeviceEnded,
        Event::Seek(0.5),
    ] {
        let t = apply(&state, event, 0);
        assert_eq!(t.state, state);
        assert_eq!(t.cue, None);
        assert!(!t.count_play);
    }
}

#[test]
fn select_track_out_of_range_is_a_no_op() {
    let state = PlaybackState::default();
    let t = apply(&state, Event::SelectTrack(3), 3);
    assert_eq!(t.state, state);
    assert_eq!(t.cue, None);
}

#[test]
fn select_track_plays_from_the_top_and_clears_error() {
    let state = PlaybackState {
        elapsed: 50.0,
        duration: Some(120.0),
        last_error: Some(DeviceFault::new(2, "network")),
        ..PlaybackState::default()
    };
    let t = apply(&state, Event::SelectTrack(2), 3);
    assert_eq!(t.state.current, 2);
    assert_eq!(t.state.elapsed, 0.0);
    assert_eq!(t.state.duration, None);
    assert!(t.state.is_playing);
    assert!(t.state.last_error.is_none());
    assert_eq!(t.cue, Some(Cue::Load));
}

#[test]
fn reselecting_a_failed_track_reloads_it() {
    let state = PlaybackState {
        last_error: Some(DeviceFault::new(4, "unsupported")),
        ..PlaybackState::default()
    };
    let t = apply(&state, Event::SelectTrack(0), 3);
    assert_eq!(t.cue, Some(Cue::Load));
    assert!(t.state.is_playing);
    assert!(t.state.last_error.is_none());
}

#[test]
fn play_from_the_start_counts_once_confirmed_but_resume_does_not() {
    let fresh = PlaybackState::default();
    let t = apply(&fresh, Event::TogglePlayPause, 2);
    assert!(t.state.is_playing);
    assert!(t.state.pending_count);
    assert!(!t.count_play);

    let t = apply(&t.state, Event::DeviceTimeUpdate(0.2), 2);
    assert!(t.count_play);
    assert!(!t.state.pending_count);
    let t = apply(&t.state, Event::DeviceTimeUpdate(0.4), 2);
    assert!(!t.count_play);

    let paused_mid = PlaybackState {
        elapsed: 12.0,
        ..PlaybackState::default()
    };
    let t = apply(&paused_mid, Event::TogglePlayPause, 2);
    assert!(t.state.is_playing);
    assert!(!t.state.pending_count);
    let t = apply(&t.state, Event::DeviceReady, 2);
    assert!(!t.count_play);

    // Pausing never counts.
    let playing = PlaybackState {
        is_playing: true,
        ..PlaybackState::default()
    };
    let t = apply(&playing, Event::TogglePlayPause, 2);
    assert!(!t.state.is_playing);
    assert!(!t.count_play);
}

#[test]
fn count_eligibility_uses_the_state_before_the_toggle() {
    let mut state = PlaybackState::default();
    let mut counted = 0;
    let script = [
        Event::TogglePlayPause,
        Event::DeviceTimeUpdate(4.0),
        Event::TogglePlayPause,
        Event::TogglePlayPause,
        Event::DeviceTimeUpdate(9.0),
        Event::TogglePlayPause,
        Event::TogglePlayPause,
    ];
    for e in script {
        let t = apply(&state, e, 2);
        counted += usize::from(t.count_play);
        state = t.state;
    }
    assert_eq!(counted, 1);
}

#[test]
fn seek_clamps_to_duration_and_cues_device() {
    let state = PlaybackState {
        duration: Some(200.0),
        ..PlaybackState::default()
    };
    let t = apply(&state, Event::Seek(0.25), 1);
    assert_eq!(t.state.elapsed, 50.0);
    assert_eq!(t.cue, Some(Cue::Seek(50.0)));

    let t = apply(&state, Event::Seek(1.7), 1);
    assert_eq!(t.state.elapsed, 200.0);
    let t = apply(&state, Event::Seek(-0.3), 1);
    assert_eq!(t.state.elapsed, 0.0);
}

#[test]
fn seek_without_known_duration_is_ignored() {
    let state = PlaybackState::default();
    let t = apply(&state, Event::Seek(0.5), 1);
    assert_eq!(t.state, state);
    assert_eq!(t.cue, None);
}

#[test]
fn seek_echo_does_not_move_elapsed_again() {
    let state = PlaybackState {
        duration: Some(100.0),
        is_playing: true,
        ..PlaybackState::default()
    };
    let seeked = apply(&state, Event::Seek(0.4), 1).state;
    let echoed = apply(&seeked, Event::DeviceTimeUpdate(40.1), 1).state;
    assert_eq!(echoed.elapsed, seeked.elapsed);
    assert_eq!(echoed.pending_seek, None);

    // Later updates flow normally.
    let later = apply(&echoed, Event::DeviceTimeUpdate(41.0), 1).state;
    assert_eq!(later.elapsed, 41.0);
}

#[test]
fn time_update_never_exceeds_duration() {
    let state = PlaybackState {
        duration: Some(10.0),
        ..PlaybackState::default()
    };
    let t = apply(&state, Event::DeviceTimeUpdate(12.0), 1);
    assert_eq!(t.state.elapsed, 10.0);

    let late = PlaybackState {
        elapsed: 30.0,
        ..PlaybackState::default()
    };
    let t = apply(&late, Event::DeviceDurationKnown(20.0), 1);
    assert_eq!(t.state.duration, Some(20.0));
    assert_eq!(t.state.elapsed, 20.0);

    let t = apply(&late, Event::DeviceDurationKnown(f64::INFINITY), 1);
    assert_eq!(t.state, late);
}

#[test]
fn set_volume_zero_mutes_and_unmute_restores_level() {
    let state = PlaybackState::default();
    let state = run(state, &[Event::SetVolume(0.6), Event::SetVolume(0.0)], 1);
    assert!(state.muted);
    assert_eq!(state.output_volume(), 0.0);

    let state = apply(&state, Event::ToggleMute, 1).state;
    assert!(!state.muted);
    assert_eq!(state.volume, 0.6);
    assert_eq!(state.output_volume(), 0.6);
}

#[test]
fn set_volume_clamps_and_unmutes() {
    let state = PlaybackState {
        muted: true,
        ..PlaybackState::default()
    };
    let t = apply(&state, Event::SetVolume(3.0), 1);
    assert_eq!(t.state.volume, 1.0);
    assert!(!t.state.muted);

    let t = apply(&state, Event::SetVolume(f64::NAN), 1);
    assert_eq!(t.state, state);
}

#[test]
fn toggle_mute_preserves_volume() {
    let state = PlaybackState {
        volume: 0.3,
        ..PlaybackState::default()
    };
    let muted = apply(&state, Event::ToggleMute, 1).state;
    assert!(muted.muted);
    assert_eq!(muted.volume, 0.3);
    assert_eq!(muted.output_volume(), 0.0);
}

#[test]
fn modes_toggle_independently() {
    let state = run(
        PlaybackState::default(),
        &[Event::ToggleRepeat, Event::ToggleShuffle],
        1,
    );
    assert!(state.repeat && state.shuffle);
    let state = apply(&state, Event::ToggleRepeat, 1).state;
    assert!(!state.repeat && state.shuffle);
}

#[test]
fn device_error_stops_and_ready_clears() {
    let playing = PlaybackState {
        is_playing: true,
        elapsed: 33.0,
        ..PlaybackState::default()
    };
    let failed = apply(&playing, Event::DeviceError(DeviceFault::new(2, "network")), 1).state;
    assert!(!failed.is_playing);
    assert_eq!(failed.elapsed, 33.0);
    assert_eq!(failed.last_error.as_ref().map(|e| e.code), Some(2));

    let ready = apply(&failed, Event::DeviceReady, 1).state;
    assert!(ready.last_error.is_none());
    assert!(!ready.is_playing);
}

#[test]
fn new_state_with_zero_volume_starts_muted() {
    let state = PlaybackState::new(0.0, false, true);
    assert!(state.muted);
    assert_eq!(state.volume, 1.0);
    assert!(state.shuffle);

    let state = PlaybackState::new(1.5, true, false);
    assert_eq!(state.volume, 1.0);
    assert!(!state.muted);
    assert!(state.repeat);
}

#[test]
fn rejected_play_is_never_counted() {
    let mut state = PlaybackState::default();
    let mut counted = 0;
    for _ in 0..3 {
        let t = apply(&state, Event::TogglePlayPause, 2);
        counted += usize::from(t.count_play);
        let t = apply(&t.state, Event::DeviceError(DeviceFault::new(3, "decode")), 2);
        counted += usize::from(t.count_play);
        assert!(!t.state.pending_count);
        state = t.state;
    }
    assert_eq!(counted, 0);
}

#[test]
fn ready_confirms_a_pending_play() {
    let started = apply(&PlaybackState::default(), Event::TogglePlayPause, 2).state;
    let t = apply(&started, Event::DeviceReady, 2);
    assert!(t.count_play);

    // Changing track before confirmation drops the pending count.
    let t = apply(&started, Event::Next, 2);
    assert!(!t.state.pending_count);
    assert!(!apply(&t.state, Event::DeviceReady, 2).count_play);
}

#[test]
fn seek_echo_still_confirms_a_pending_play() {
    let state = PlaybackState {
        pending_seek: Some(0.0),
        ..PlaybackState::default()
    };
    let started = apply(&state, Event::TogglePlayPause, 1).state;
    let t = apply(&started, Event::DeviceTimeUpdate(0.1), 1);
    assert!(t.count_play);
    assert_eq!(t.state.elapsed, 0.0);
    assert_eq!(t.state.pending_seek, None);
}

#[test]
fn failed_single_track_reloads_on_next_previous_and_ended() {
    let failed = apply(
        &PlaybackState {
            is_playing: true,
            ..PlaybackState::default()
        },
        Event::DeviceError(DeviceFault::new(3, "decode")),
        1,
    )
    .state;

    for event in [Event::Next, Event::Previous, Event::DeviceEnded] {
        let t = apply(&failed, event.clone(), 1);
        assert_eq!(t.cue, Some(Cue::Load), "{event:?}");
        assert_eq!(t.state.current, 0);
        assert!(t.state.is_playing);
        assert!(t.state.last_error.is_none());
        assert_eq!(t.state.duration, None);
        assert_eq!(t.state.pending_seek, None);
    }
}

#[test]
fn shuffle_or_repeat_onto_a_failed_track_reloads_it() {
    let failed = PlaybackState {
        current: 1,
        shuffle: true,
        last_error: Some(DeviceFault::new(2, "network")),
        ..PlaybackState::default()
    };
    let t = transition(&failed, Event::Next, 3, &mut Scripted::new(&[1]));
    assert_eq!(t.state.current, 1);
    assert_eq!(t.cue, Some(Cue::Load));

    let repeating = PlaybackState {
        repeat: true,
        shuffle: false,
        ..failed
    };
    let t = apply(&repeating, Event::DeviceEnded, 3);
    assert_eq!(t.state.current, 1);
    assert_eq!(t.cue, Some(Cue::Load));
}
