//! Vesting dashboard: transaction history with pending stake-request cancellation

use eframe::egui;

mod app;
mod bridge;
mod history_table;
mod rows;
mod ui;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting vesting-dash");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vesting Dashboard")
            .with_inner_size([1000.0, 640.0])
            .with_min_inner_size([420.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "vesting-dash",
        native_options,
        Box::new(|cc| Ok(Box::new(app::App::new(cc)))),
    )
}
