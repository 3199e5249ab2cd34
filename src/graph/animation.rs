//! Edge highlight animation for the graph panel.
//!
//! Two-phase choreography driven from the frame loop: a short frantic
//! "burst" right after a refresh, then a steady ambient state with
//! directional particles and a slow rotating highlight window. The
//! schedule lives in a single owned `Phase` value; re-triggering
//! replaces it wholesale, so a stale ticker cannot survive a restart.

use super::types::{EdgeKey, GraphLink};
use rand::Rng;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// How long the burst phase runs after a refresh
pub const BURST_DURATION: Duration = Duration::from_millis(3000);

/// Tick interval while bursting
pub const BURST_TICK: Duration = Duration::from_millis(100);

/// Particles per edge once the graph goes ambient
pub const PASSIVE_PARTICLE_COUNT: usize = 4;

/// Edge fractions per second traveled by a directional particle
pub const PARTICLE_SPEED: f32 = 0.6;

/// Current schedule. Exactly one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Bursting { started: Instant, last_tick: Instant },
    Passive { last_tick: Instant, cursor: usize },
}

/// Tick interval for the passive rotation: 5000 / (edge_count / 3) ms.
/// None when there are no edges to rotate over.
fn passive_tick_interval(edge_count: usize) -> Option<Duration> {
    if edge_count == 0 {
        return None;
    }
    Some(Duration::from_secs_f64(15.0 / edge_count as f64))
}

/// Step the rotating cursor forward, resetting to zero once it would
/// run past the edge count.
fn advance_cursor(cursor: usize, step: usize, edge_count: usize) -> usize {
    let next = cursor + step;
    if next >= edge_count {
        0
    } else {
        next
    }
}

pub struct EdgeAnimator {
    phase: Phase,
    /// Burst flicker selection, rebuilt every burst tick
    burst_active: HashSet<EdgeKey>,
    /// Passive rotating window
    passive_window: HashSet<EdgeKey>,
    /// Directional particles per edge; sticky once Passive has set it
    particle_count: usize,
}

impl EdgeAnimator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            burst_active: HashSet::new(),
            passive_window: HashSet::new(),
            particle_count: 0,
        }
    }

    /// Enter the burst phase, tearing down whatever ran before. The
    /// first flicker batch is selected immediately so the highlight
    /// starts the same frame the refresh lands.
    pub fn trigger_burst(&mut self, now: Instant, links: &[GraphLink], rng: &mut impl Rng) {
        self.passive_window.clear();
        self.pick_burst_batch(links, rng);
        self.phase = Phase::Bursting {
            started: now,
            last_tick: now,
        };
    }

    /// Advance the schedule to `now`. Called once per frame.
    pub fn advance(&mut self, now: Instant, links: &[GraphLink], rng: &mut impl Rng) {
        match self.phase {
            Phase::Idle => {}
            Phase::Bursting { started, last_tick } => {
                if now.duration_since(started) >= BURST_DURATION {
                    self.enter_passive(now);
                } else if now.duration_since(last_tick) >= BURST_TICK {
                    self.pick_burst_batch(links, rng);
                    self.phase = Phase::Bursting {
                        started,
                        last_tick: now,
                    };
                }
            }
            Phase::Passive { last_tick, cursor } => {
                let Some(interval) = passive_tick_interval(links.len()) else {
                    return;
                };
                if now.duration_since(last_tick) >= interval {
                    let step = rng.gen_range(2..=4);
                    let cursor = advance_cursor(cursor, step, links.len());
                    self.select_passive_window(cursor, links, rng);
                    self.phase = Phase::Passive {
                        last_tick: now,
                        cursor,
                    };
                }
            }
        }
    }

    fn enter_passive(&mut self, now: Instant) {
        self.burst_active.clear();
        self.passive_window.clear();
        self.particle_count = PASSIVE_PARTICLE_COUNT;
        self.phase = Phase::Passive {
            last_tick: now,
            cursor: 0,
        };
    }

    /// Pick 2-4 random edges, uniformly with replacement, as this
    /// tick's flicker batch.
    fn pick_burst_batch(&mut self, links: &[GraphLink], rng: &mut impl Rng) {
        self.burst_active.clear();
        if links.is_empty() {
            return;
        }
        let batch = rng.gen_range(2..=4);
        for _ in 0..batch {
            let link = &links[rng.gen_range(0..links.len())];
            self.burst_active.insert(link.key());
        }
    }

    /// Mark a contiguous window of 2-4 edges starting at the cursor,
    /// wrapping modulo the edge count.
    fn select_passive_window(&mut self, cursor: usize, links: &[GraphLink], rng: &mut impl Rng) {
        self.passive_window.clear();
        if links.is_empty() {
            return;
        }
        let span = rng.gen_range(2..=4);
        for i in 0..span {
            let link = &links[(cursor + i) % links.len()];
            self.passive_window.insert(link.key());
        }
    }

    pub fn is_bursting(&self) -> bool {
        matches!(self.phase, Phase::Bursting { .. })
    }

    pub fn is_passive(&self) -> bool {
        matches!(self.phase, Phase::Passive { .. })
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Is this edge in the current burst flicker batch?
    pub fn is_burst_active(&self, key: &EdgeKey) -> bool {
        self.is_bursting() && self.burst_active.contains(key)
    }

    /// Is this edge inside the passive rotating window?
    pub fn in_passive_window(&self, key: &EdgeKey) -> bool {
        self.is_passive() && self.passive_window.contains(key)
    }

    /// Whether the frame loop should keep repainting for this animator
    pub fn needs_repaint(&self) -> bool {
        !matches!(self.phase, Phase::Idle) || self.particle_count > 0
    }
}

impl Default for EdgeAnimator {
    fn default() -> Self {
        Self::new()
    }
}
