//! UI rendering for the terminal user interface.
//!
//! Everything here reads a [`Screen`] snapshot and draws it with `ratatui`;
//! nothing in this module changes playback state.

use std::collections::BTreeMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::{ControlsSettings, UiSettings};
use crate::error::DeviceFault;
use crate::library::{Artwork, Catalog};
use crate::playback::PlaybackState;
use crate::store::Theme;

/// Key bindings shown in the footer, in display order. `H/L` is filled in
/// from config.
const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("enter", "play selected"),
    ("space/p", "play/pause"),
    ("h/l", "prev/next"),
    ("H/L", ""),
    ("+/-", "volume"),
    ("m", "mute"),
    ("r", "repeat"),
    ("s", "shuffle"),
    ("t", "theme"),
    ("x", "dismiss"),
    ("q", "quit"),
];

/// Everything one frame needs.
pub struct Screen<'a> {
    pub state: &'a PlaybackState,
    pub catalog: &'a Catalog,
    pub counts: &'a BTreeMap<String, u64>,
    /// Parallel to the catalog.
    pub artwork: &'a [Artwork],
    pub theme: Theme,
    pub cursor: usize,
    pub warning: Option<&'a DeviceFault>,
    /// Why the catalog is empty, if loading failed.
    pub load_error: Option<&'a str>,
    pub ui: &'a UiSettings,
    pub controls: &'a ControlsSettings,
}

struct Palette {
    base: Style,
    accent: Style,
    warning: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            base: Style::default().fg(Color::Gray).bg(Color::Black),
            accent: Style::default().fg(Color::Cyan).bg(Color::Black),
            warning: Style::default().fg(Color::Black).bg(Color::Yellow),
        },
        Theme::Light => Palette {
            base: Style::default().fg(Color::Black).bg(Color::White),
            accent: Style::default().fg(Color::Blue).bg(Color::White),
            warning: Style::default().fg(Color::White).bg(Color::Red),
        },
    }
}

/// Format seconds as `m:ss`. Unknown or negative values read `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let secs = seconds.floor() as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn controls_text(scrub_seconds: u64) -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| {
            if *k == "H/L" {
                format!("[H/L] scrub -/+{scrub_seconds}s")
            } else {
                format!("[{k}] {v}")
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn volume_text(state: &PlaybackState) -> String {
    if state.muted {
        "Muted".to_string()
    } else {
        format!("Vol {:.0}%", state.volume * 100.0)
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}

/// Banner lines: the catalog load error, then the device fault. Only the
/// fault can be dismissed.
fn warning_lines(screen: &Screen) -> Vec<String> {
    let load = screen
        .load_error
        .map(|msg| format!("Could not load catalog: {msg}"));
    let fault = screen
        .warning
        .map(|fault| format!("Playback failed ({}): {}  [x] dismiss", fault.code, fault.message));
    load.into_iter().chain(fault).collect()
}

/// Title line and status line for the now-playing box.
fn now_playing_lines(screen: &Screen) -> Vec<Line<'static>> {
    let state = screen.state;
    let Some(track) = screen.catalog.get(state.current) else {
        return vec![Line::from("No tracks")];
    };

    let artist = if track.artist.trim().is_empty() {
        "Unknown artist"
    } else {
        track.artist.as_str()
    };
    let status = [
        (if state.is_playing { "Playing" } else { "Paused" }).to_string(),
        volume_text(state),
        format!("Repeat: {}", on_off(state.repeat)),
        format!("Shuffle: {}", on_off(state.shuffle)),
    ]
    .join(" • ");

    vec![
        Line::from(format!("{} - {}", track.title, artist)),
        Line::from(status),
    ]
}

/// Visible window of `total` rows centred on `selected` when possible.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn draw_tracks(frame: &mut Frame, area: Rect, screen: &Screen, colors: &Palette) {
    let tracks = screen.catalog.tracks();
    let total = tracks.len();
    let selected = screen.cursor.min(total.saturating_sub(1));
    let (start, end) = visible_window(total, area.height.saturating_sub(2) as usize, selected);

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, track)| {
            let i = start + offset;
            let marker = if i == screen.state.current { "▶ " } else { "  " };
            let art = match screen.artwork.get(i) {
                Some(a) if a.is_available() => "♫ ",
                _ => "  ",
            };
            let plays = screen.counts.get(&track.id).copied().unwrap_or(0);
            let line = format!("{marker}{art}{}  ({plays} plays)", track.display());
            if i == screen.state.current {
                ListItem::new(line).style(colors.accent)
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .style(colors.base)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the whole UI for one frame.
pub fn draw(frame: &mut Frame, screen: &Screen) {
    let colors = palette(screen.theme);
    frame.render_widget(Block::default().style(colors.base), frame.area());

    let warning = warning_lines(screen);
    let banner_height = if warning.is_empty() {
        0
    } else {
        warning.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(screen.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .style(colors.accent)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tryza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    if !warning.is_empty() {
        let lines: Vec<Line> = warning.into_iter().map(Line::from).collect();
        let banner = Paragraph::new(lines)
            .style(colors.warning)
            .block(Block::default().borders(Borders::ALL).title(" warning "))
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, chunks[1]);
    }

    let now_playing = Paragraph::new(now_playing_lines(screen))
        .style(colors.base)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" now playing "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[2]);

    let state = screen.state;
    let total = state.duration.map_or_else(|| "0:00".to_string(), format_time);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(colors.accent)
        .ratio(state.progress())
        .label(format!("{} / {}", format_time(state.elapsed), total));
    frame.render_widget(gauge, chunks[3]);

    draw_tracks(frame, chunks[4], screen, &colors);

    let footer = Paragraph::new(controls_text(screen.controls.scrub_seconds))
        .style(colors.base)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}
