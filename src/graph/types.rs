//! Graph data types matching the API response.

use crate::theme::{self, ThemeMode};
use egui::{Pos2, Vec2};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Kind of a node in the knowledge graph. The backend emits "session"
/// for session roots and various other tags for thoughts and tools;
/// everything that is not a session maps to Other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    Session,
    #[default]
    Other,
}

impl NodeKind {
    pub fn color(&self, mode: ThemeMode) -> egui::Color32 {
        match self {
            NodeKind::Session => theme::node::session(mode),
            NodeKind::Other => theme::node::other(mode),
        }
    }
}

/// A node in the knowledge graph
#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Raw type tag from the backend ("session", "thought", ...)
    #[serde(rename = "type", default)]
    pub node_type: String,
}

impl GraphNode {
    /// Collapse the open-ended type tag into the two-color lookup.
    pub fn kind(&self) -> NodeKind {
        if self.node_type == "session" {
            NodeKind::Session
        } else {
            NodeKind::Other
        }
    }

    /// Label if the backend provided one, otherwise the id.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// A directed edge between two nodes, by id
#[derive(Debug, Clone, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

impl GraphLink {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.source, &self.target)
    }
}

/// Stable identity for an edge, derived from its endpoint ids. Survives
/// wholesale dataset replacement, unlike any pointer-based identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey(String);

impl EdgeKey {
    pub fn new(source: &str, target: &str) -> Self {
        Self(format!("{}->{}", source, target))
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complete graph dataset from the API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Runtime state for the rendered graph: layout positions plus hover
#[derive(Default)]
pub struct GraphState {
    /// Node positions in graph space
    pub positions: HashMap<String, Pos2>,
    /// Node velocities for physics
    pub velocities: HashMap<String, Vec2>,
    /// Current data
    pub data: GraphData,
    /// Node ID -> index into data.nodes
    pub node_index: HashMap<String, usize>,
    /// Currently hovered node ID
    pub hovered_node: Option<String>,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset wholesale. Positions of surviving nodes are
    /// kept so a re-fetch never scrambles the layout; new nodes start at
    /// small random offsets around the given center.
    pub fn load(&mut self, data: GraphData, center: Pos2) {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        self.node_index.clear();

        for (i, node) in data.nodes.iter().enumerate() {
            self.node_index.insert(node.id.clone(), i);

            if !self.positions.contains_key(&node.id) {
                let offset = Vec2::new(rng.gen_range(-120.0..120.0), rng.gen_range(-120.0..120.0));
                self.positions.insert(node.id.clone(), center + offset);
                self.velocities.insert(node.id.clone(), Vec2::ZERO);
            }
        }

        // Drop layout state for nodes that disappeared
        let index = &self.node_index;
        self.positions.retain(|id, _| index.contains_key(id));
        self.velocities.retain(|id, _| index.contains_key(id));
        if let Some(hovered) = &self.hovered_node {
            if !self.node_index.contains_key(hovered) {
                self.hovered_node = None;
            }
        }

        self.data = data;
    }

    pub fn get_pos(&self, id: &str) -> Option<Pos2> {
        self.positions.get(id).copied()
    }

    /// Bounding box of all node positions, if any exist
    pub fn bounds(&self) -> Option<egui::Rect> {
        let mut iter = self.positions.values();
        let first = *iter.next()?;
        let mut rect = egui::Rect::from_min_max(first, first);
        for p in iter {
            rect.extend_with(*p);
        }
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> GraphData {
        serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "s1", "label": "Session: s1", "type": "session"},
                    {"id": "t1", "label": "first thought", "type": "thought"}
                ],
                "links": [
                    {"source": "s1", "target": "t1"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_node_type_maps_to_other() {
        let data = sample_data();
        assert_eq!(data.nodes[0].kind(), NodeKind::Session);
        assert_eq!(data.nodes[1].kind(), NodeKind::Other);
    }

    #[test]
    fn test_edge_key_is_stable_across_clones() {
        let data = sample_data();
        let key_a = data.links[0].key();
        let key_b = data.links[0].clone().key();
        assert_eq!(key_a, key_b);
        assert_eq!(key_a.to_string(), "s1->t1");
    }

    #[test]
    fn test_missing_fields_default() {
        let data: GraphData = serde_json::from_str(r#"{"nodes": [{"id": "n"}]}"#).unwrap();
        assert_eq!(data.nodes[0].kind(), NodeKind::Other);
        assert_eq!(data.nodes[0].display_label(), "n");
        assert!(data.links.is_empty());
    }

    #[test]
    fn test_load_preserves_surviving_positions() {
        let mut state = GraphState::new();
        let center = Pos2::new(400.0, 300.0);

        state.load(sample_data(), center);
        let s1_before = state.get_pos("s1").unwrap();

        // Re-fetch with one node added: s1 must not move
        let mut bigger = sample_data();
        bigger.nodes.push(GraphNode {
            id: "t2".into(),
            label: "second thought".into(),
            node_type: "thought".into(),
        });
        bigger.links.push(GraphLink {
            source: "t1".into(),
            target: "t2".into(),
        });
        state.load(bigger, center);

        assert_eq!(state.get_pos("s1").unwrap(), s1_before);
        assert!(state.get_pos("t2").is_some());
        assert_eq!(state.data.nodes.len(), 3);
    }

    #[test]
    fn test_load_drops_vanished_nodes() {
        let mut state = GraphState::new();
        let center = Pos2::new(0.0, 0.0);
        state.load(sample_data(), center);
        state.hovered_node = Some("t1".into());

        let only_session: GraphData = serde_json::from_str(
            r#"{"nodes": [{"id": "s1", "type": "session"}], "links": []}"#,
        )
        .unwrap();
        state.load(only_session, center);

        assert!(state.get_pos("t1").is_none());
        assert!(state.hovered_node.is_none());
    }
}
