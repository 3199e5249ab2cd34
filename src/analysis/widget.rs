//! Analysis panel: success pattern cards and raw pattern sections.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use egui::{Frame, Margin, RichText, Rounding, ScrollArea, Stroke, Ui};

use super::types::{sequence_chips, AnalysisData, SequenceItem, SuccessPattern};
use crate::api::ApiClient;
use crate::theme::{self, ThemeMode};

pub struct AnalysisPanel {
    data: Option<AnalysisData>,
    pending: Option<Receiver<Result<AnalysisData, String>>>,
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self {
            data: None,
            pending: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a background fetch. Replacing the receiver abandons any
    /// slower fetch still in flight, so stale results never land.
    pub fn refresh(&mut self, api_base: &str) {
        let (tx, rx) = mpsc::channel();
        let base = api_base.to_string();
        thread::spawn(move || {
            let client = ApiClient::new(base);
            let _ = tx.send(client.fetch_analysis());
        });
        self.pending = Some(rx);
    }

    pub fn poll(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(data)) => {
                self.pending = None;
                self.data = Some(data);
            }
            Ok(Err(err)) => {
                self.pending = None;
                tracing::warn!("Analysis fetch failed: {}", err);
                self.data = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
            }
        }
    }

    pub fn show(&mut self, ui: &mut Ui, mode: ThemeMode) {
        let Some(data) = &self.data else {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.4);
                if self.is_loading() {
                    ui.spinner();
                } else {
                    ui.label(
                        RichText::new("No analysis data available")
                            .italics()
                            .color(theme::text::muted(mode)),
                    );
                }
            });
            return;
        };

        ScrollArea::vertical()
            .id_salt("analysis_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(patterns) = &data.successful_patterns {
                    ui.label(
                        RichText::new("Metrics")
                            .strong()
                            .color(theme::accent::primary(mode)),
                    );
                    ui.add_space(6.0);
                    for pattern in patterns {
                        render_pattern_card(ui, pattern, mode);
                        ui.add_space(8.0);
                    }
                }

                render_json_section(ui, "Reasoning Patterns", &data.reasoning_patterns, true, mode);
                ui.add_space(4.0);
                render_json_section(
                    ui,
                    "Tool Usage Patterns",
                    &data.tool_usage_patterns,
                    false,
                    mode,
                );
            });
    }
}

impl Default for AnalysisPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn render_pattern_card(ui: &mut Ui, pattern: &SuccessPattern, mode: ThemeMode) {
    Frame::none()
        .fill(theme::bg::surface(mode))
        .rounding(Rounding::same(8.0))
        .inner_margin(Margin::same(10.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new(&pattern.strategy)
                    .strong()
                    .color(theme::text::primary(mode)),
            );

            if !pattern.thought_sequence.is_empty() {
                ui.add_space(6.0);
                ui.label(
                    RichText::new("Thought Sequence")
                        .small()
                        .color(theme::text::muted(mode)),
                );
                ui.horizontal_wrapped(|ui| {
                    for item in sequence_chips(&pattern.thought_sequence) {
                        match item {
                            SequenceItem::Step(text) => filled_chip(ui, &text, mode),
                            SequenceItem::Separator => {
                                ui.label(
                                    RichText::new("→").color(theme::text::muted(mode)),
                                );
                            }
                        }
                    }
                });
            }

            if !pattern.indicators.is_empty() {
                ui.add_space(6.0);
                ui.label(
                    RichText::new("Indicators")
                        .small()
                        .color(theme::text::muted(mode)),
                );
                ui.horizontal_wrapped(|ui| {
                    for indicator in &pattern.indicators {
                        outlined_chip(ui, indicator, mode);
                    }
                });
            }
        });
}

fn filled_chip(ui: &mut Ui, text: &str, mode: ThemeMode) {
    Frame::none()
        .fill(theme::bg::interactive(mode))
        .rounding(Rounding::same(10.0))
        .inner_margin(Margin::symmetric(8.0, 3.0))
        .show(ui, |ui| {
            ui.label(
                RichText::new(text)
                    .small()
                    .color(theme::text::primary(mode)),
            );
        });
}

fn outlined_chip(ui: &mut Ui, text: &str, mode: ThemeMode) {
    Frame::none()
        .stroke(Stroke::new(1.0, theme::border::strong(mode)))
        .rounding(Rounding::same(10.0))
        .inner_margin(Margin::symmetric(8.0, 3.0))
        .show(ui, |ui| {
            ui.label(
                RichText::new(text)
                    .small()
                    .color(theme::text::secondary(mode)),
            );
        });
}

fn render_json_section(
    ui: &mut Ui,
    title: &str,
    value: &serde_json::Value,
    open: bool,
    mode: ThemeMode,
) {
    egui::CollapsingHeader::new(RichText::new(title).strong())
        .default_open(open)
        .show(ui, |ui| {
            if value.is_null() {
                ui.label(
                    RichText::new("No data yet")
                        .italics()
                        .color(theme::text::muted(mode)),
                );
                return;
            }
            let body = serde_json::to_string_pretty(value).unwrap_or_default();
            ui.label(
                RichText::new(body)
                    .monospace()
                    .size(11.0)
                    .color(theme::text::secondary(mode)),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_fetch_installs_data() {
        let mut panel = AnalysisPanel::new();
        let (tx, rx) = mpsc::channel();
        panel.pending = Some(rx);

        tx.send(Ok(AnalysisData::default())).unwrap();
        panel.poll();

        assert!(panel.data.is_some());
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_failed_fetch_clears_data_for_empty_state() {
        let mut panel = AnalysisPanel::new();
        panel.data = Some(AnalysisData::default());
        let (tx, rx) = mpsc::channel();
        panel.pending = Some(rx);

        tx.send(Err("boom".to_string())).unwrap();
        panel.poll();

        assert!(panel.data.is_none());
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_empty_channel_keeps_loading() {
        let mut panel = AnalysisPanel::new();
        let (tx, rx) = mpsc::channel::<Result<AnalysisData, String>>();
        panel.pending = Some(rx);

        panel.poll();
        assert!(panel.is_loading());
        drop(tx);
    }
}
