//! Interactive knowledge graph canvas.
//!
//! Owns the camera and ties the force layout and edge animation into
//! the frame loop. Panning and zooming move the viewport only; node
//! positions live in graph space and survive both camera moves and
//! window resizes.

use std::time::{Duration, Instant};

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

use super::animation::{EdgeAnimator, PARTICLE_SPEED};
use super::layout::ForceLayout;
use super::types::{GraphData, GraphState};
use crate::theme::{self, stroke_width, ThemeMode};

/// Node core radius in graph units
const NODE_RADIUS: f32 = 6.0;

/// Zoom applied when focusing a clicked node
const FOCUS_ZOOM: f32 = 2.5;
const FOCUS_DURATION: Duration = Duration::from_millis(1000);

const FIT_DURATION: Duration = Duration::from_millis(400);
/// Screen-space padding kept around a fitted graph
const FIT_PADDING: f32 = 80.0;

#[derive(Clone, Copy)]
struct CameraAnim {
    from_pan: Vec2,
    to_pan: Vec2,
    from_zoom: f32,
    to_zoom: f32,
    started: Instant,
    duration: Duration,
}

/// Viewport state. Pan is in screen space, applied after zoom, so a
/// drag moves the graph 1:1 at any zoom level.
struct Camera {
    pan: Vec2,
    zoom: f32,
    anim: Option<CameraAnim>,
}

impl Camera {
    fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            anim: None,
        }
    }

    fn animate_to(&mut self, to_pan: Vec2, to_zoom: f32, duration: Duration, now: Instant) {
        self.anim = Some(CameraAnim {
            from_pan: self.pan,
            to_pan,
            from_zoom: self.zoom,
            to_zoom,
            started: now,
            duration,
        });
    }

    /// Step the in-flight animation, if any, with smoothstep easing.
    fn tick(&mut self, now: Instant) {
        let Some(anim) = self.anim else { return };
        let t = now.duration_since(anim.started).as_secs_f32() / anim.duration.as_secs_f32();
        if t >= 1.0 {
            self.pan = anim.to_pan;
            self.zoom = anim.to_zoom;
            self.anim = None;
            return;
        }
        let s = t * t * (3.0 - 2.0 * t);
        self.pan = anim.from_pan + (anim.to_pan - anim.from_pan) * s;
        self.zoom = anim.from_zoom + (anim.to_zoom - anim.from_zoom) * s;
    }

    /// Manual input takes over from whatever animation was running
    fn cancel(&mut self) {
        self.anim = None;
    }

    fn is_animating(&self) -> bool {
        self.anim.is_some()
    }
}

/// Pan and zoom that frame the given bounds inside the viewport
fn fit_camera(bounds: Rect, viewport: Rect) -> (Vec2, f32) {
    let zoom_x = viewport.width() / (bounds.width() + FIT_PADDING);
    let zoom_y = viewport.height() / (bounds.height() + FIT_PADDING);
    let zoom = zoom_x.min(zoom_y).clamp(0.05, 2.0);
    let pan = (viewport.center() - bounds.center()) * zoom;
    (pan, zoom)
}

pub struct GraphView {
    pub state: GraphState,
    layout: ForceLayout,
    animator: EdgeAnimator,
    camera: Camera,
    /// Fit once the layout settles after new data lands
    fit_when_settled: bool,
    /// Fit on the next frame regardless of settling
    fit_requested: bool,
    /// At least one dataset has been installed
    loaded: bool,
    /// Center used to seed positions before the first frame measures
    seed_center: Pos2,
}

impl GraphView {
    pub fn new() -> Self {
        Self {
            state: GraphState::new(),
            layout: ForceLayout::default(),
            animator: EdgeAnimator::new(),
            camera: Camera::new(),
            fit_when_settled: false,
            fit_requested: false,
            loaded: false,
            seed_center: Pos2::new(600.0, 400.0),
        }
    }

    /// Install a freshly fetched dataset. Surviving nodes keep their
    /// positions; the view re-fits once the layout settles.
    pub fn set_data(&mut self, data: GraphData) {
        self.state.load(data, self.seed_center);
        self.fit_when_settled = true;
        self.loaded = true;
    }

    /// Kick off the burst animation for a new refresh. Ignored until a
    /// dataset has actually arrived.
    pub fn trigger_burst(&mut self) {
        if !self.loaded {
            return;
        }
        self.animator
            .trigger_burst(Instant::now(), &self.state.data.links, &mut rand::thread_rng());
    }

    pub fn recenter(&mut self) {
        self.fit_requested = true;
    }

    fn start_fit(&mut self, viewport: Rect, now: Instant) {
        if let Some(bounds) = self.state.bounds() {
            let (pan, zoom) = fit_camera(bounds, viewport);
            self.camera.animate_to(pan, zoom, FIT_DURATION, now);
        }
    }

    pub fn show(&mut self, ui: &mut Ui, mode: ThemeMode, show_labels: bool) -> Response {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let center = rect.center();
        self.seed_center = center;
        let now = Instant::now();

        // Phases advance on elapsed time even with nothing to draw
        self.animator
            .advance(now, &self.state.data.links, &mut rand::thread_rng());

        if self.state.data.is_empty() {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No graph data available",
                FontId::proportional(14.0),
                theme::text::muted(mode),
            );
            if self.animator.needs_repaint() {
                ui.ctx().request_repaint();
            }
            return response;
        }

        // Gather input deltas first (allows simultaneous pan+zoom on trackpad)
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        let zoom_delta = ui.input(|i| i.zoom_delta());
        let hover_pos = response.hover_pos();

        if response.dragged_by(egui::PointerButton::Primary) {
            self.camera.cancel();
            self.camera.pan += response.drag_delta();
        }

        if scroll_delta != Vec2::ZERO && response.hovered() {
            self.camera.cancel();
            self.camera.pan += scroll_delta;
        }

        // Pinch-to-zoom and Ctrl+scroll, anchored at the cursor
        if let Some(cursor_pos) = hover_pos {
            if zoom_delta != 1.0 {
                self.camera.cancel();
                let new_zoom = (self.camera.zoom * zoom_delta).clamp(0.05, 5.0);
                let cursor_offset = cursor_pos - center - self.camera.pan;
                let zoom_factor = 1.0 - new_zoom / self.camera.zoom;
                self.camera.pan += cursor_offset * zoom_factor;
                self.camera.zoom = new_zoom;
            }
        }

        self.layout.step(&mut self.state, center);
        self.camera.tick(now);

        if self.fit_when_settled && self.layout.is_settled(&self.state) {
            self.fit_when_settled = false;
            self.fit_requested = true;
        }
        if self.fit_requested {
            self.fit_requested = false;
            self.start_fit(rect, now);
        }

        let pan = self.camera.pan;
        let zoom = self.camera.zoom;
        let transform = |pos: Pos2| -> Pos2 { center + (pos - center) * zoom + pan };

        // Edges first, behind nodes
        for link in &self.state.data.links {
            let source_pos = match self.state.get_pos(&link.source) {
                Some(p) => transform(p),
                None => continue,
            };
            let target_pos = match self.state.get_pos(&link.target) {
                Some(p) => transform(p),
                None => continue,
            };

            let key = link.key();
            let (color, width) = if self.animator.is_burst_active(&key) {
                // Glow underlay first, hot stroke on top
                painter.line_segment(
                    [source_pos, target_pos],
                    theme::stroke(
                        theme::edge::active_glow(mode),
                        stroke_width::EDGE_GLOW * zoom,
                    ),
                );
                (theme::edge::active(mode), stroke_width::EDGE_ACTIVE)
            } else if self.animator.in_passive_window(&key) {
                (theme::edge::passive_window(mode), stroke_width::EDGE)
            } else {
                (theme::edge::base(mode), stroke_width::EDGE)
            };
            painter.line_segment([source_pos, target_pos], theme::stroke(color, width * zoom));
            draw_arrow_head(&painter, source_pos, target_pos, color, zoom);
        }

        // Directional particles
        let particle_count = self.animator.particle_count();
        if particle_count > 0 {
            let t = ui.input(|i| i.time) as f32;
            let particle_color = theme::edge::particle(mode);
            for link in &self.state.data.links {
                let (Some(source), Some(target)) = (
                    self.state.get_pos(&link.source),
                    self.state.get_pos(&link.target),
                ) else {
                    continue;
                };
                let source = transform(source);
                let target = transform(target);
                for k in 0..particle_count {
                    let frac =
                        (t * PARTICLE_SPEED + k as f32 / particle_count as f32).fract();
                    let p = source + (target - source) * frac;
                    painter.circle_filled(p, 2.0 * zoom, particle_color);
                }
            }
        }

        // Hover pick: closest node within pick range of the pointer
        let mut new_hovered = None;
        if let Some(pointer) = hover_pos {
            let pick_radius = NODE_RADIUS * zoom + 4.0;
            let mut best = f32::MAX;
            for node in &self.state.data.nodes {
                if let Some(pos) = self.state.get_pos(&node.id) {
                    let dist = transform(pos).distance(pointer);
                    if dist <= pick_radius && dist < best {
                        best = dist;
                        new_hovered = Some(node.id.clone());
                    }
                }
            }
        }
        self.state.hovered_node = new_hovered;

        // Nodes: halo passes then the solid core
        for node in &self.state.data.nodes {
            let Some(pos) = self.state.get_pos(&node.id) else {
                continue;
            };
            let screen_pos = transform(pos);
            let color = node.kind().color(mode);

            painter.circle_filled(screen_pos, 12.0 * zoom, color.gamma_multiply(0.10));
            painter.circle_filled(screen_pos, 8.0 * zoom, color.gamma_multiply(0.30));
            painter.circle_filled(screen_pos, NODE_RADIUS * zoom, color);

            let is_hovered = self.state.hovered_node.as_deref() == Some(node.id.as_str());
            if show_labels || is_hovered {
                draw_label(&painter, screen_pos, node.display_label(), mode, zoom);
            }
        }

        // Click focuses the node under the cursor
        if response.clicked() {
            if let Some(id) = self.state.hovered_node.clone() {
                if let Some(pos) = self.state.get_pos(&id) {
                    let pan = (center - pos) * FOCUS_ZOOM;
                    self.camera.animate_to(pan, FOCUS_ZOOM, FOCUS_DURATION, now);
                }
            }
        }

        if self.animator.needs_repaint()
            || self.camera.is_animating()
            || !self.layout.is_settled(&self.state)
        {
            ui.ctx().request_repaint();
        }

        response
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new()
    }
}

/// Arrow head at the target end of an edge, backed off the node circle.
fn draw_arrow_head(painter: &Painter, from: Pos2, to: Pos2, color: Color32, zoom: f32) {
    let dir = to - from;
    if dir.length() < 1.0 {
        return;
    }
    let dir = dir.normalized();
    let arrow_len = 6.0 * zoom;
    let tip = to - dir * (NODE_RADIUS * zoom + 2.0);
    let base = tip - dir * arrow_len;
    let perp = Vec2::new(-dir.y, dir.x) * arrow_len * 0.5;
    painter.add(egui::Shape::convex_polygon(
        vec![tip, base + perp, base - perp],
        color,
        Stroke::NONE,
    ));
}

/// Label below the node on a translucent backdrop. Font size stays in
/// screen units so labels remain readable at any zoom.
fn draw_label(painter: &Painter, node_pos: Pos2, text: &str, mode: ThemeMode, zoom: f32) {
    let color = theme::node::label_text(mode);
    let galley = painter.layout_no_wrap(text.to_owned(), FontId::proportional(11.0), color);
    let anchor = node_pos + Vec2::new(0.0, NODE_RADIUS * zoom + 6.0);
    let text_rect = Align2::CENTER_TOP.anchor_size(anchor, galley.size());
    painter.rect_filled(text_rect.expand(3.0), 3.0, theme::node::label_bg(mode));
    painter.galley(text_rect.min, galley, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_animation_reaches_target() {
        let mut camera = Camera::new();
        let t0 = Instant::now();
        camera.animate_to(Vec2::new(100.0, 0.0), 2.5, Duration::from_millis(1000), t0);
        assert!(camera.is_animating());

        camera.tick(t0 + Duration::from_millis(500));
        assert!(camera.pan.x > 0.0 && camera.pan.x < 100.0);
        assert!(camera.zoom > 1.0 && camera.zoom < 2.5);

        camera.tick(t0 + Duration::from_millis(1100));
        assert_eq!(camera.pan, Vec2::new(100.0, 0.0));
        assert_eq!(camera.zoom, 2.5);
        assert!(!camera.is_animating());
    }

    #[test]
    fn test_camera_smoothstep_midpoint() {
        let mut camera = Camera::new();
        let t0 = Instant::now();
        camera.animate_to(Vec2::new(100.0, 0.0), 1.0, Duration::from_millis(1000), t0);

        // smoothstep(0.5) == 0.5, so the midpoint is exact
        camera.tick(t0 + Duration::from_millis(500));
        assert!((camera.pan.x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_cancel_freezes_camera() {
        let mut camera = Camera::new();
        let t0 = Instant::now();
        camera.animate_to(Vec2::new(100.0, 0.0), 2.0, Duration::from_millis(1000), t0);
        camera.tick(t0 + Duration::from_millis(300));
        let frozen_pan = camera.pan;
        let frozen_zoom = camera.zoom;

        camera.cancel();
        camera.tick(t0 + Duration::from_millis(900));
        assert_eq!(camera.pan, frozen_pan);
        assert_eq!(camera.zoom, frozen_zoom);
    }

    #[test]
    fn test_burst_before_first_dataset_is_ignored() {
        let mut view = GraphView::new();
        view.trigger_burst();
        assert!(!view.animator.is_bursting());
    }

    #[test]
    fn test_burst_engages_once_data_has_landed() {
        let mut view = GraphView::new();
        view.set_data(GraphData::default());
        view.trigger_burst();
        assert!(view.animator.is_bursting());
    }

    #[test]
    fn test_fit_camera_centers_bounds() {
        let bounds = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(200.0, 100.0));
        let viewport = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(1000.0, 800.0));
        let (pan, zoom) = fit_camera(bounds, viewport);

        // The bounds center lands on the viewport center under the
        // camera transform
        let center = viewport.center();
        let screen = center + (bounds.center() - center) * zoom + pan;
        assert!((screen - center).length() < 1e-3);

        // Fitted content stays inside the viewport
        assert!(bounds.width() * zoom <= viewport.width());
        assert!(bounds.height() * zoom <= viewport.height());
    }
}
