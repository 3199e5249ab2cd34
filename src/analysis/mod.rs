//! Analysis surface: mined pattern payloads and their panel.

pub mod types;
pub mod widget;

pub use types::{AnalysisData, SuccessPattern};
pub use widget::AnalysisPanel;
