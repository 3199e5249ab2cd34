//! Chat surface: transcript state and the conversation panel.

pub mod types;
pub mod widget;

pub use types::{ChatMessage, ChatRole, ProcessReply, Transcript};
pub use widget::ChatPanel;
