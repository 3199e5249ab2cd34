//! Graph data structures, force layout, and the animated canvas.

pub mod animation;
pub mod layout;
pub mod types;
pub mod widget;

pub use types::{GraphData, GraphLink, GraphNode, GraphState};
pub use widget::GraphView;
