//! wandb-watch simulator - Main Entry Point
//!
//! Hosts the watch app in a desktop window and feeds it from a simulated
//! companion running on its own thread.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wandb_watch::{
    app::DisplayShape,
    companion::{Companion, Fixture},
    config::AppConfig,
    simulator::{window_size, SimulatorApp},
};

#[derive(Debug, Parser)]
#[command(name = "wandb-watch-sim", version, about = "Watch metric viewer simulator")]
struct Cli {
    /// Config file (defaults to the platform data directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON fixture with runs and metrics
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Simulate a round 180x180 display
    #[arg(long)]
    round: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wandb_watch=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting wandb-watch simulator");

    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    if let Some(fixture) = cli.fixture {
        config.companion.fixture = Some(fixture);
    }
    if cli.round {
        config.display.shape = DisplayShape::Round;
        config.display.width = 180;
        config.display.height = 180;
    }

    let fixture = match &config.companion.fixture {
        Some(path) => Fixture::load(path)?,
        None => Fixture::demo(),
    };

    let (companion, link) = Companion::new(fixture, config.latency());
    let stop = companion.stop_handle();
    let companion_handle = std::thread::spawn(move || companion.run());

    let settings = config.watch_settings();
    let scale = config.simulator.scale;
    let dark_mode = config.simulator.dark_mode;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size(&settings, scale))
            .with_resizable(false)
            .with_title("wandb-watch"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "wandb-watch",
        native_options,
        Box::new(move |cc| {
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }
            Ok(Box::new(SimulatorApp::new(settings, link, scale)))
        }),
    );

    tracing::info!("Shutting down...");
    stop.store(false, std::sync::atomic::Ordering::SeqCst);
    if companion_handle.join().is_err() {
        tracing::warn!("companion thread panicked");
    }

    result.map_err(|e| anyhow::anyhow!("simulator window failed: {}", e))
}
