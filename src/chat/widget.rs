//! Chat panel: transcript bubbles, thinking traces, and the input row.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use egui::{
    Align, Button, Frame, Key, Layout, Margin, RichText, Rounding, ScrollArea, TextEdit, Ui,
};

use super::types::{ChatMessage, ChatRole, ProcessReply, Transcript};
use crate::api::ApiClient;
use crate::theme::{self, ThemeMode};

pub struct ChatPanel {
    transcript: Transcript,
    input: String,
    /// In-flight request, if any. Replacing or dropping the receiver
    /// abandons the request; the worker thread just fails to send.
    pending: Option<Receiver<Result<ProcessReply, String>>>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Poll the in-flight request. Returns true when a successful reply
    /// landed this frame, which is the cue to refresh the other panels.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.transcript.apply_reply(result)
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.transcript
                    .apply_reply(Err("worker thread dropped".to_string()))
            }
        }
    }

    fn submit(&mut self, api_base: &str) {
        if self.pending.is_some() {
            return;
        }
        let message = self.input.trim().to_string();
        self.input.clear();
        if message.is_empty() {
            return;
        }

        self.transcript.push_user(message.clone());

        let (tx, rx) = mpsc::channel();
        let base = api_base.to_string();
        thread::spawn(move || {
            let client = ApiClient::new(base);
            let _ = tx.send(client.process_message(&message));
        });
        self.pending = Some(rx);
    }

    pub fn show(&mut self, ui: &mut Ui, mode: ThemeMode, api_base: &str) {
        let busy = self.is_busy();

        ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
            // Input row claims the bottom edge; transcript fills the rest
            let mut submit = false;
            ui.horizontal(|ui| {
                let edit = TextEdit::multiline(&mut self.input)
                    .desired_rows(2)
                    .hint_text("Ask about the agent's thinking...")
                    .desired_width(ui.available_width() - 64.0);
                let edit_response = ui.add_enabled(!busy, edit);

                // Enter sends, Shift+Enter inserts a newline
                if edit_response.has_focus()
                    && ui.input(|i| i.key_pressed(Key::Enter) && !i.modifiers.shift)
                {
                    submit = true;
                }
                if ui.add_enabled(!busy, Button::new("Send")).clicked() {
                    submit = true;
                }
                if submit {
                    edit_response.request_focus();
                }
            });
            ui.add_space(6.0);

            if submit {
                self.submit(api_base);
            }

            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                ScrollArea::vertical()
                    .id_salt("chat_scroll")
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if self.transcript.is_empty() && !busy {
                            ui.vertical_centered(|ui| {
                                ui.add_space(ui.available_height() * 0.4);
                                ui.label(
                                    RichText::new("Ready to dissect the mind of an agent?")
                                        .italics()
                                        .color(theme::text::muted(mode)),
                                );
                            });
                            return;
                        }

                        for (i, msg) in self.transcript.messages.iter().enumerate() {
                            // Trace entries sit tight under their reply
                            if i > 0 && msg.role != ChatRole::Thinking {
                                ui.add_space(6.0);
                            }
                            render_message(ui, i, msg, mode);
                        }

                        if busy {
                            ui.add_space(6.0);
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(
                                    RichText::new("Processing...")
                                        .small()
                                        .color(theme::text::muted(mode)),
                                );
                            });
                        }
                    });
            });
        });
    }
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn render_message(ui: &mut Ui, index: usize, msg: &ChatMessage, mode: ThemeMode) {
    let max_width = ui.available_width() * 0.78;
    match msg.role {
        ChatRole::User => {
            ui.with_layout(Layout::right_to_left(Align::TOP), |ui| {
                bubble(
                    ui,
                    max_width,
                    theme::accent::primary(mode),
                    theme::text::on_accent(mode),
                    &msg.content,
                );
            });
        }
        ChatRole::Assistant => {
            bubble(
                ui,
                max_width,
                theme::bg::surface(mode),
                theme::text::primary(mode),
                &msg.content,
            );
        }
        ChatRole::Thinking => {
            egui::CollapsingHeader::new(
                RichText::new("🧠 Lets get technical!")
                    .small()
                    .color(theme::accent::secondary(mode)),
            )
            .id_salt(index)
            .default_open(false)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(&msg.content)
                        .monospace()
                        .size(11.0)
                        .color(theme::text::secondary(mode)),
                );
            });
        }
    }
}

fn bubble(ui: &mut Ui, max_width: f32, fill: egui::Color32, text: egui::Color32, content: &str) {
    Frame::none()
        .fill(fill)
        .rounding(Rounding::same(8.0))
        .inner_margin(Margin::symmetric(10.0, 8.0))
        .show(ui, |ui| {
            ui.set_max_width(max_width);
            ui.label(RichText::new(content).color(text));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::types::FALLBACK_MESSAGE;

    fn reply(text: &str) -> ProcessReply {
        ProcessReply {
            response: text.to_string(),
            thinking_trace: String::new(),
        }
    }

    #[test]
    fn test_poll_without_pending_request_is_inert() {
        let mut panel = ChatPanel::new();
        assert!(!panel.poll());
        assert!(panel.transcript.is_empty());
    }

    #[test]
    fn test_poll_applies_reply_and_requests_refresh() {
        let mut panel = ChatPanel::new();
        let (tx, rx) = mpsc::channel();
        panel.pending = Some(rx);

        tx.send(Ok(reply("done"))).unwrap();
        assert!(panel.poll());
        assert!(!panel.is_busy());
        assert_eq!(panel.transcript.messages.len(), 2);
        assert_eq!(panel.transcript.messages[0].role, ChatRole::Assistant);
        assert_eq!(panel.transcript.messages[1].role, ChatRole::Thinking);
    }

    #[test]
    fn test_poll_keeps_waiting_while_channel_is_empty() {
        let mut panel = ChatPanel::new();
        let (tx, rx) = mpsc::channel::<Result<ProcessReply, String>>();
        panel.pending = Some(rx);

        assert!(!panel.poll());
        assert!(panel.is_busy());
        drop(tx);
    }

    #[test]
    fn test_dead_worker_becomes_fallback_reply() {
        let mut panel = ChatPanel::new();
        let (tx, rx) = mpsc::channel::<Result<ProcessReply, String>>();
        panel.pending = Some(rx);
        drop(tx);

        assert!(!panel.poll());
        assert!(!panel.is_busy());
        assert_eq!(panel.transcript.messages.len(), 1);
        assert_eq!(panel.transcript.messages[0].content, FALLBACK_MESSAGE);
    }
}
