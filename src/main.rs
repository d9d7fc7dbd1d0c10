mod config;
mod device;
mod error;
mod library;
mod playback;
mod runtime;
mod store;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
