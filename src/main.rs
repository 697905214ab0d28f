mod app;
mod ui;

use app::MandateApp;
use clap::Parser;
use eframe::egui;
use rusty_mandate::config::DashboardConfig;
use rusty_mandate::state::AppState;

/// Interactive dashboard over constituency-wise election results.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    config: DashboardConfig,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::new(cli.config);
    state.load_configured();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Mandate – Election Analytics",
        options,
        Box::new(|_cc| Ok(Box::new(MandateApp::new(state)))),
    )
}
