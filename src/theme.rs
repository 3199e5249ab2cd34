//! Theme palettes for the dashboard.
//!
//! Two palettes (dark and light) built around the backend dashboard's
//! indigo family. Everything that draws should source colors from here
//! so the header toggle restyles the whole window consistently.

use egui::Color32;

/// Color scheme for the whole window, toggled from the header.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// Icon for the header toggle: shows what clicking switches to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "🌙",
        }
    }

    /// Base egui visuals with our fills layered on top.
    pub fn visuals(self) -> egui::Visuals {
        let mut visuals = match self {
            ThemeMode::Dark => egui::Visuals::dark(),
            ThemeMode::Light => egui::Visuals::light(),
        };
        visuals.panel_fill = bg::window(self);
        visuals.window_fill = bg::panel(self);
        visuals.extreme_bg_color = bg::interactive(self);
        visuals.selection.bg_fill = accent::primary(self).gamma_multiply(0.4);
        visuals
    }
}

/// Background colors for different layers
pub mod bg {
    use super::*;

    /// Window backdrop - darkest layer
    pub fn window(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(4, 11, 19),
            ThemeMode::Light => Color32::from_rgb(245, 247, 250),
        }
    }

    /// Panel backgrounds - slightly lifted from the backdrop
    pub fn panel(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(10, 25, 41),
            ThemeMode::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Card/elevated surface backgrounds (bubbles, metric cards)
    pub fn surface(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(16, 35, 56),
            ThemeMode::Light => Color32::from_rgb(237, 242, 248),
        }
    }

    /// Interactive element backgrounds (inputs, chips)
    pub fn interactive(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(22, 44, 69),
            ThemeMode::Light => Color32::from_rgb(227, 234, 243),
        }
    }
}

/// Primary accent family
pub mod accent {
    use super::*;

    /// Main accent: buttons, user bubbles, the title
    pub fn primary(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(74, 144, 226),
            ThemeMode::Light => Color32::from_rgb(13, 71, 161),
        }
    }

    /// Softer companion accent for secondary chrome
    pub fn secondary(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(83, 75, 174),
            ThemeMode::Light => Color32::from_rgb(84, 114, 211),
        }
    }
}

/// Text colors at different emphasis levels
pub mod text {
    use super::*;

    pub fn primary(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(236, 239, 244),
            ThemeMode::Light => Color32::from_rgb(28, 32, 38),
        }
    }

    pub fn secondary(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(176, 186, 200),
            ThemeMode::Light => Color32::from_rgb(85, 95, 110),
        }
    }

    /// Low contrast for watermarks and placeholders
    pub fn muted(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(110, 122, 140),
            ThemeMode::Light => Color32::from_rgb(140, 150, 165),
        }
    }

    /// Text on top of an accent-filled surface (user bubble, send button)
    pub fn on_accent(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(240, 246, 255),
            ThemeMode::Light => Color32::from_rgb(250, 252, 255),
        }
    }
}

/// Border colors
pub mod border {
    use super::*;

    /// Subtle panel/card outline
    pub fn subtle(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgba_unmultiplied(26, 35, 126, 51),
            ThemeMode::Light => Color32::from_rgba_unmultiplied(13, 71, 161, 25),
        }
    }

    /// Emphasized outline for focused or outlined elements
    pub fn strong(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgba_unmultiplied(74, 144, 226, 120),
            ThemeMode::Light => Color32::from_rgba_unmultiplied(13, 71, 161, 90),
        }
    }
}

/// Graph node palette, keyed by node type
pub mod node {
    use super::*;

    pub fn session(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(74, 144, 226),
            ThemeMode::Light => Color32::from_rgb(13, 71, 161),
        }
    }

    pub fn other(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(53, 122, 189),
            ThemeMode::Light => Color32::from_rgb(26, 35, 126),
        }
    }

    /// Label text under a node
    pub fn label_text(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(236, 239, 244),
            ThemeMode::Light => Color32::from_rgb(26, 35, 126),
        }
    }

    /// Backdrop box behind a node label
    pub fn label_bg(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgba_unmultiplied(10, 25, 41, 230),
            ThemeMode::Light => Color32::from_rgba_unmultiplied(255, 255, 255, 242),
        }
    }
}

/// Graph edge palette
pub mod edge {
    use super::*;

    /// Resting stroke for every edge
    pub fn base(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgba_unmultiplied(74, 144, 226, 102),
            ThemeMode::Light => Color32::from_rgba_unmultiplied(13, 71, 161, 76),
        }
    }

    /// Hot stroke for burst-active edges
    pub fn active(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(255, 64, 129),
            ThemeMode::Light => Color32::from_rgb(213, 0, 249),
        }
    }

    /// Wide translucent underlay behind a burst-active edge
    pub fn active_glow(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgba_unmultiplied(255, 64, 129, 76),
            ThemeMode::Light => Color32::from_rgba_unmultiplied(213, 0, 249, 76),
        }
    }

    /// Gentle lift for the passive rotating window
    pub fn passive_window(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgba_unmultiplied(74, 144, 226, 170),
            ThemeMode::Light => Color32::from_rgba_unmultiplied(13, 71, 161, 140),
        }
    }

    /// Directional particles riding the edges
    pub fn particle(mode: ThemeMode) -> Color32 {
        match mode {
            ThemeMode::Dark => Color32::from_rgb(74, 144, 226),
            ThemeMode::Light => Color32::from_rgb(13, 71, 161),
        }
    }
}

/// Helper to create a stroke with consistent styling
pub fn stroke(color: Color32, width: f32) -> egui::Stroke {
    egui::Stroke::new(width, color)
}

/// Edge stroke widths
pub mod stroke_width {
    /// Resting edge
    pub const EDGE: f32 = 2.0;

    /// Burst-active edge (doubled)
    pub const EDGE_ACTIVE: f32 = 4.0;

    /// Glow underlay behind a burst-active edge
    pub const EDGE_GLOW: f32 = 6.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
        assert!(ThemeMode::from_dark_flag(true).is_dark());
        assert!(!ThemeMode::from_dark_flag(false).is_dark());
    }

    #[test]
    fn test_node_palette_distinct() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            assert_ne!(node::session(mode), node::other(mode));
        }
        assert_ne!(node::session(ThemeMode::Dark), node::session(ThemeMode::Light));
    }

    #[test]
    fn test_active_edge_differs_from_base() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            assert_ne!(edge::active(mode), edge::base(mode));
        }
        assert!(stroke_width::EDGE_ACTIVE == 2.0 * stroke_width::EDGE);
    }
}
