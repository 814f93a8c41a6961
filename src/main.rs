mod app;
mod audio;
mod config;
mod error;
mod grid;
mod library;
mod logging;
mod runtime;
mod state;
mod transport;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
