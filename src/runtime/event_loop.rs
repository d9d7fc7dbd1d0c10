use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config;
use crate::device::AudioDevice;
use crate::library::Artwork;
use crate::playback::RandomSource;
use crate::ui::{self, Screen};

use super::controller::{Controller, Flow, Input};
use super::keys::{View, key_to_input};

/// Main terminal loop: drains the input queue, redraws, then turns key
/// presses into queued inputs. Returns `Ok(())` when shutdown is requested.
pub fn run<D: AudioDevice, R: RandomSource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller<D, R>,
    artwork: &[Artwork],
    load_error: Option<&str>,
    tx: &Sender<Input>,
    rx: &Receiver<Input>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = View::default();

    loop {
        // Device callbacks and intents share this queue; apply in arrival order.
        while let Ok(input) = rx.try_recv() {
            if controller.handle(input) == Flow::Quit {
                return Ok(());
            }
        }

        view.observe(controller.state());

        let counts = controller.play_counts();
        let screen = Screen {
            state: controller.state(),
            catalog: controller.catalog(),
            counts: &counts,
            artwork,
            theme: controller.theme(),
            cursor: view.cursor,
            warning: view.warning(controller.state()),
            load_error,
            ui: &settings.ui,
            controls: &settings.controls,
        };
        terminal.draw(|f| ui::draw(f, &screen))?;

        if event::poll(Duration::from_millis(50))? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let len = controller.catalog().len();
                if let Some(input) =
                    key_to_input(key, &settings.controls, controller.state(), len, &mut view)
                {
                    let _ = tx.send(input);
                }
            }
        }
    }
}
