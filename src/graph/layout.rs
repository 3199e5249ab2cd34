//! Force-directed graph layout.
//!
//! A small spring embedder:
//! - Repulsion between all node pairs (Coulomb's law)
//! - Attraction along links (Hooke's law)
//! - Centering force toward the view center
//! - Damping to settle the simulation
//!
//! Datasets here are conversation-sized (session roots plus their
//! thoughts), so repulsion is computed pairwise.

use super::types::GraphState;
use egui::{Pos2, Vec2};
use std::collections::HashMap;

/// Force-directed layout parameters
pub struct ForceLayout {
    /// Repulsion strength between nodes
    pub repulsion: f32,
    /// Attraction strength along links
    pub attraction: f32,
    /// Centering force strength
    pub centering: f32,
    /// Damping factor (0.0 - 1.0)
    pub damping: f32,
    /// Minimum distance to prevent division by zero
    pub min_distance: f32,
    /// Maximum velocity
    pub max_velocity: f32,
    /// Ideal link length
    pub ideal_length: f32,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            repulsion: 9000.0,
            attraction: 0.08,
            centering: 0.0005, // Gentle pull so orphan nodes stay on screen
            damping: 0.88,
            min_distance: 25.0,
            max_velocity: 50.0,
            ideal_length: 110.0,
        }
    }
}

impl ForceLayout {
    /// Run one iteration of the force simulation
    pub fn step(&self, state: &mut GraphState, center: Pos2) {
        if state.data.nodes.is_empty() {
            return;
        }

        let node_ids: Vec<String> = state.data.nodes.iter().map(|n| n.id.clone()).collect();
        let local_index: HashMap<&str, usize> = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();

        let mut forces: Vec<Vec2> = vec![Vec2::ZERO; node_ids.len()];

        // Pairwise repulsion
        for i in 0..node_ids.len() {
            let Some(&pos_i) = state.positions.get(&node_ids[i]) else {
                continue;
            };
            for j in (i + 1)..node_ids.len() {
                let Some(&pos_j) = state.positions.get(&node_ids[j]) else {
                    continue;
                };
                let delta = pos_i - pos_j;
                let distance = delta.length().max(self.min_distance);
                let push = delta / distance * (self.repulsion / (distance * distance));
                forces[i] += push;
                forces[j] -= push;
            }
        }

        // Attraction along links toward the ideal length
        for link in &state.data.links {
            let (Some(&si), Some(&ti)) = (
                local_index.get(link.source.as_str()),
                local_index.get(link.target.as_str()),
            ) else {
                continue;
            };
            let (Some(&source_pos), Some(&target_pos)) = (
                state.positions.get(&link.source),
                state.positions.get(&link.target),
            ) else {
                continue;
            };

            let delta = target_pos - source_pos;
            let distance = delta.length().max(1.0);
            let displacement = distance - self.ideal_length;
            let force = delta / distance * (displacement * self.attraction);
            forces[si] += force;
            forces[ti] -= force;
        }

        // Centering force
        for (i, id) in node_ids.iter().enumerate() {
            if let Some(&pos) = state.positions.get(id) {
                forces[i] += (center - pos) * self.centering;
            }
        }

        // Apply forces and update positions
        for (i, id) in node_ids.iter().enumerate() {
            if let Some(vel) = state.velocities.get_mut(id) {
                *vel = (*vel + forces[i]) * self.damping;

                // Clamp velocity
                if vel.length() > self.max_velocity {
                    *vel = vel.normalized() * self.max_velocity;
                }

                if let Some(pos) = state.positions.get_mut(id) {
                    *pos += *vel;
                }
            }
        }
    }

    /// Check if the simulation has settled
    pub fn is_settled(&self, state: &GraphState) -> bool {
        if state.velocities.is_empty() {
            return true;
        }
        let total: f32 = state.velocities.values().map(|v| v.length()).sum();
        let avg = total / state.velocities.len() as f32;
        avg < 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{GraphData, GraphLink, GraphNode};
    use egui::pos2;

    fn make_state(positions: &[(&str, Pos2)], links: &[(&str, &str)]) -> GraphState {
        let mut state = GraphState::new();
        let mut data = GraphData::default();
        for (i, (id, pos)) in positions.iter().enumerate() {
            data.nodes.push(GraphNode {
                id: (*id).into(),
                label: String::new(),
                node_type: "thought".into(),
            });
            state.node_index.insert((*id).into(), i);
            state.positions.insert((*id).into(), *pos);
            state.velocities.insert((*id).into(), Vec2::ZERO);
        }
        for (source, target) in links {
            data.links.push(GraphLink {
                source: (*source).into(),
                target: (*target).into(),
            });
        }
        state.data = data;
        state
    }

    #[test]
    fn test_linked_nodes_pull_together() {
        let mut state = make_state(
            &[("a", pos2(0.0, 0.0)), ("b", pos2(600.0, 0.0))],
            &[("a", "b")],
        );
        let layout = ForceLayout::default();
        let before = (state.get_pos("b").unwrap() - state.get_pos("a").unwrap()).length();

        for _ in 0..10 {
            layout.step(&mut state, pos2(300.0, 0.0));
        }

        let after = (state.get_pos("b").unwrap() - state.get_pos("a").unwrap()).length();
        assert!(after < before, "expected {} < {}", after, before);
    }

    #[test]
    fn test_unlinked_nodes_push_apart() {
        let mut state = make_state(&[("a", pos2(0.0, 0.0)), ("b", pos2(10.0, 0.0))], &[]);
        let layout = ForceLayout::default();
        let before = (state.get_pos("b").unwrap() - state.get_pos("a").unwrap()).length();

        for _ in 0..10 {
            layout.step(&mut state, pos2(5.0, 0.0));
        }

        let after = (state.get_pos("b").unwrap() - state.get_pos("a").unwrap()).length();
        assert!(after > before, "expected {} > {}", after, before);
    }

    #[test]
    fn test_empty_graph_steps_safely() {
        let mut state = GraphState::new();
        let layout = ForceLayout::default();
        layout.step(&mut state, pos2(0.0, 0.0));
        assert!(layout.is_settled(&state));
    }

    #[test]
    fn test_settle_detection() {
        let mut state = make_state(&[("a", pos2(0.0, 0.0))], &[]);
        let layout = ForceLayout::default();
        assert!(layout.is_settled(&state));

        state.velocities.insert("a".into(), Vec2::new(30.0, 0.0));
        assert!(!layout.is_settled(&state));
    }
}
