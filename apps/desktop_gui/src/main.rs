//! Desktop commission editor over a Supabase-style PostgREST backend.
//!
//! The UI thread runs egui; a dedicated worker thread owns the HTTP client
//! and a tokio runtime. The two sides talk over bounded crossbeam channels.

mod backend_bridge;
mod controller;
mod ui;

use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::CommissionDeskApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    backend_bridge::runtime::launch(cmd_rx, ui_tx);

    // Read once on the UI thread so the top bar can show which project the
    // worker will talk to.
    let project_url = client_core::config::load_settings().project_url;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Commission Desk")
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Commission Desk",
        options,
        Box::new(move |cc| {
            let persisted = ui::app::load_persisted_settings(cc.storage);
            Ok(Box::new(CommissionDeskApp::new(
                cmd_tx,
                ui_rx,
                persisted,
                project_url,
            )))
        }),
    )
}
