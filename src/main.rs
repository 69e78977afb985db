use anyhow::Result;
use clap::{ArgAction, Parser};
use eframe::egui;
use tracing::info;

use climpt::app::{ClimptApp, NORMAL_SIZE};
use climpt::logging;

#[derive(Parser, Debug)]
#[command(name = "climpt", version, about = "Clipboard prompt manager")]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    quiet: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so the JSONL file is flushed on exit.
    let _logging_guard = logging::init(cli.verbose, cli.quiet);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Climpt")
            .with_app_id("climpt")
            .with_inner_size([NORMAL_SIZE.x, NORMAL_SIZE.y])
            .with_min_inner_size([320.0, 400.0])
            .with_transparent(true),
        ..Default::default()
    };

    eframe::run_native(
        "Climpt",
        options,
        Box::new(|cc| Ok(Box::new(ClimptApp::new(cc)))),
    )
    .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    info!(event_type = "app_lifecycle", action = "exited", "Normal shutdown");
    Ok(())
}
