//! Launch Dashboard - SpaceX launch records explorer
//!
//! Loads the public launch records CSV and shows success rates per site and
//! payload mass against launch outcome, filtered by site and payload range.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod stats;

use config::{DashboardConfig, CONFIG_FILE};
use data::{source_for, DashboardContext};
use eframe::egui;
use gui::DashboardApp;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default configuration");
        DashboardConfig::default()
    });
    let context = DashboardContext::new(source_for(&config.source_url), config.cache_ttl());

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Launch Analytics Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Launch Analytics Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, context, &config)))),
    )
}
