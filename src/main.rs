use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use parasys::app::App;
use parasys::config::load_config;
use parasys::event::EventHandler;
use parasys::logging;
use parasys::system::collector::Collector;
use parasys::terminal::TerminalSurface;
use tracing::error;

/// Refreshes every second until `q` is pressed or the process is interrupted.
#[derive(Parser)]
#[command(
    name = "parasys",
    version,
    about = "Live CPU and memory gauges with the top processes by CPU and by memory"
)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let _cli = Cli::parse();

    let config = load_config();
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("parasys: logging disabled: {err}");
    }

    let mut collector = Collector::new();

    let mut surface = match TerminalSurface::acquire() {
        Ok(surface) => surface,
        Err(err) => {
            error!(%err, "terminal unavailable");
            eprintln!("parasys: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut app = App::new(&config);
    let mut events = EventHandler::new();
    let result = app.run(&mut collector, &mut surface, &mut events).await;
    let cleanup = app.shutdown(&mut surface);

    result?;
    cleanup?;
    Ok(ExitCode::SUCCESS)
}
