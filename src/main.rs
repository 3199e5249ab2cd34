//! Native ThoughtFlow dashboard.
//!
//! A desktop front end for the agent analysis backend: chat with the
//! agent, inspect its reasoning patterns, and watch the knowledge graph
//! grow.

mod analysis;
mod api;
mod app;
mod chat;
mod graph;
mod settings;
mod theme;

use eframe::egui;
use tracing_subscriber;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_title("ThoughtFlow"),
        persist_window: true, // Persist window state and egui memory between sessions
        ..Default::default()
    };

    eframe::run_native(
        "ThoughtFlow",
        options,
        Box::new(|cc| Ok(Box::new(app::ThoughtFlowApp::new(cc)))),
    )
}
