//! Main application state and the three-panel shell.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

use eframe::egui::{self, Align, Layout, Margin, RichText};

use crate::analysis::AnalysisPanel;
use crate::api::ApiClient;
use crate::chat::ChatPanel;
use crate::graph::{GraphData, GraphView};
use crate::settings::Settings;
use crate::theme::{self, ThemeMode};

/// Main dashboard application
pub struct ThoughtFlowApp {
    // Panels
    chat: ChatPanel,
    analysis: AnalysisPanel,
    graph: GraphView,
    graph_receiver: Option<Receiver<Result<GraphData, String>>>,

    // Shell state
    theme: ThemeMode,
    /// Monotonic refresh counter. Stays at zero through the initial
    /// load; only real refreshes start the graph animation.
    refresh_serial: u64,

    // Settings persistence
    settings: Settings,
    settings_dirty: bool,
    last_settings_save: Instant,
}

impl ThoughtFlowApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_settings(Settings::load())
    }

    fn with_settings(settings: Settings) -> Self {
        let theme = ThemeMode::from_dark_flag(settings.dark_mode);

        let mut app = Self {
            chat: ChatPanel::new(),
            analysis: AnalysisPanel::new(),
            graph: GraphView::new(),
            graph_receiver: None,
            theme,
            refresh_serial: 0,
            settings,
            settings_dirty: false,
            last_settings_save: Instant::now(),
        };

        // Initial load; the refresh counter stays at zero so no burst
        app.analysis.refresh(&app.settings.api_base);
        app.fetch_graph();
        app
    }

    /// Mark settings as needing to be saved
    fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Save settings if dirty and enough time has passed (debounce)
    fn maybe_save_settings(&mut self) {
        if self.settings_dirty && self.last_settings_save.elapsed().as_secs() >= 2 {
            self.settings.save();
            self.settings_dirty = false;
            self.last_settings_save = Instant::now();
        }
    }

    fn fetch_graph(&mut self) {
        let (tx, rx) = mpsc::channel();
        let base = self.settings.api_base.clone();
        std::thread::spawn(move || {
            let client = ApiClient::new(base);
            let _ = tx.send(client.fetch_graph());
        });
        // Replacing the receiver abandons any slower fetch still in flight
        self.graph_receiver = Some(rx);
    }

    /// A chat exchange succeeded: bump the counter, re-fetch the two
    /// read-only surfaces, and start the burst right away against
    /// whatever dataset is on screen. Failed exchanges never get here.
    fn refresh(&mut self) {
        self.refresh_serial += 1;
        tracing::debug!("Refresh {} triggered", self.refresh_serial);
        self.analysis.refresh(&self.settings.api_base);
        self.fetch_graph();
        self.graph.trigger_burst();
    }

    fn poll_graph(&mut self) {
        let Some(rx) = &self.graph_receiver else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(data)) => {
                self.graph_receiver = None;
                self.graph.set_data(data);
            }
            Ok(Err(err)) => {
                // Keep showing the last good dataset
                self.graph_receiver = None;
                tracing::warn!("Graph fetch failed: {}", err);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.graph_receiver = None;
            }
        }
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        let mode = self.theme;
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(theme::bg::panel(mode))
                    .inner_margin(Margin::symmetric(16.0, 10.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        RichText::new("ThoughtFlow")
                            .strong()
                            .color(theme::accent::primary(mode)),
                    );
                    ui.label(
                        RichText::new("agent analysis dashboard")
                            .small()
                            .color(theme::text::muted(mode)),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button(self.theme.toggle_icon()).clicked() {
                            self.theme = self.theme.toggled();
                            self.settings.dark_mode = self.theme.is_dark();
                            self.mark_settings_dirty();
                        }
                    });
                });
            });
    }

    fn render_chat_panel(&mut self, ctx: &egui::Context) {
        let mode = self.theme;
        egui::SidePanel::left("chat_panel")
            .frame(panel_frame(mode))
            .default_width(340.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                panel_title(ui, "\"Thought\" interface", mode, self.chat.is_busy());
                self.chat.show(ui, mode, &self.settings.api_base);
            });
    }

    fn render_graph_panel(&mut self, ctx: &egui::Context) {
        let mode = self.theme;
        egui::SidePanel::right("graph_panel")
            .frame(panel_frame(mode))
            .default_width(680.0)
            .min_width(400.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Knowledge Graph Visualization")
                            .strong()
                            .color(theme::text::primary(mode)),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("⟳ Recenter").clicked() {
                            self.graph.recenter();
                        }
                        if ui
                            .checkbox(&mut self.settings.show_labels, "Labels")
                            .changed()
                        {
                            self.mark_settings_dirty();
                        }
                        if self.graph_receiver.is_some() {
                            ui.spinner();
                        }
                    });
                });
                ui.add_space(6.0);
                ui.separator();
                ui.add_space(6.0);
                self.graph.show(ui, mode, self.settings.show_labels);
            });
    }

    fn render_analysis_panel(&mut self, ctx: &egui::Context) {
        let mode = self.theme;
        egui::CentralPanel::default()
            .frame(panel_frame(mode))
            .show(ctx, |ui| {
                panel_title(ui, "Analysis Output", mode, self.analysis.is_loading());
                self.analysis.show(ui, mode);
            });
    }
}

impl eframe::App for ThoughtFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maybe_save_settings();

        // Fold in background results first so this frame renders fresh
        if self.chat.poll() {
            self.refresh();
        }
        self.analysis.poll();
        self.poll_graph();

        // Keep polling while anything is in flight
        if self.chat.is_busy() || self.analysis.is_loading() || self.graph_receiver.is_some() {
            ctx.request_repaint();
        }

        ctx.set_visuals(self.theme.visuals());

        self.render_header(ctx);
        self.render_chat_panel(ctx);
        self.render_graph_panel(ctx);
        self.render_analysis_panel(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Force save settings on exit
        if self.settings_dirty {
            self.settings.save();
        }
    }
}

fn panel_frame(mode: ThemeMode) -> egui::Frame {
    egui::Frame::none()
        .fill(theme::bg::panel(mode))
        .stroke(egui::Stroke::new(1.0, theme::border::subtle(mode)))
        .inner_margin(Margin::same(12.0))
}

fn panel_title(ui: &mut egui::Ui, title: &str, mode: ThemeMode, busy: bool) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(title)
                .strong()
                .color(theme::text::primary(mode)),
        );
        if busy {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.spinner();
            });
        }
    });
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(6.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_serial_is_monotonic() {
        let mut app = ThoughtFlowApp::with_settings(Settings::default());
        assert_eq!(app.refresh_serial, 0);

        app.refresh();
        app.refresh();
        assert_eq!(app.refresh_serial, 2);
    }

    #[test]
    fn test_initial_load_starts_fetches_without_refresh() {
        let app = ThoughtFlowApp::with_settings(Settings::default());
        assert_eq!(app.refresh_serial, 0);
        assert!(app.graph_receiver.is_some());
        assert!(app.analysis.is_loading());
    }
}
