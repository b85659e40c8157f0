//! On-chart status panel bound to the enable flag.
//!
//! The panel is a title plus one button. Every change of the flag goes
//! through [`StatusPanel::set_enabled`], which always redraws, so the display
//! never disagrees with the flag.

use serde::{Deserialize, Serialize};
use tracing::debug;

use sltp_core::{HorizontalCorner, PanelConfig, VerticalCorner};

const PANEL_WIDTH: u32 = 200;
const PANEL_MIN_HEIGHT: u32 = 45;
const TITLE: &str = "Fixed SL/TP";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelColor {
    White,
    Navy,
    Khaki,
    DarkGreen,
    DarkRed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margin {
    /// Offsets apply only on the sides the panel is anchored to.
    #[must_use]
    pub const fn for_corner(
        horizontal: HorizontalCorner,
        vertical: VerticalCorner,
        x_offset: i32,
        y_offset: i32,
    ) -> Self {
        let (left, right) = match horizontal {
            HorizontalCorner::Left => (x_offset, 0),
            HorizontalCorner::Right => (0, x_offset),
            HorizontalCorner::Center => (0, 0),
        };
        let (top, bottom) = match vertical {
            VerticalCorner::Top => (y_offset, 0),
            VerticalCorner::Bottom => (0, y_offset),
            VerticalCorner::Center => (0, 0),
        };
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Everything a chart needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    pub base_name: String,
    pub label_name: String,
    pub button_name: String,
    pub horizontal: HorizontalCorner,
    pub vertical: VerticalCorner,
    pub margin: Margin,
    pub width: u32,
    pub min_height: u32,
    pub background: PanelColor,
    pub title: String,
    pub title_font_size: u32,
    pub title_foreground: PanelColor,
    pub title_background: PanelColor,
    pub button_text: String,
    pub button_font_size: u32,
    pub button_foreground: PanelColor,
    pub button_background: PanelColor,
}

impl PanelView {
    #[must_use]
    pub fn render(config: &PanelConfig, enabled: bool) -> Self {
        Self {
            base_name: format!("{}-P-BAS", config.name),
            label_name: format!("{}-P-LAB", config.name),
            button_name: format!("{}-P-ENADIS", config.name),
            horizontal: config.horizontal,
            vertical: config.vertical,
            margin: Margin::for_corner(
                config.horizontal,
                config.vertical,
                config.x_offset,
                config.y_offset,
            ),
            width: PANEL_WIDTH,
            min_height: PANEL_MIN_HEIGHT,
            background: PanelColor::White,
            title: TITLE.to_string(),
            title_font_size: config.font_size + 2,
            title_foreground: PanelColor::Navy,
            title_background: PanelColor::Khaki,
            button_text: if enabled { "ENABLED" } else { "DISABLED" }.to_string(),
            button_font_size: config.font_size,
            button_foreground: PanelColor::White,
            button_background: if enabled {
                PanelColor::DarkGreen
            } else {
                PanelColor::DarkRed
            },
        }
    }
}

/// Where the panel is drawn.
pub trait ChartCanvas: Send {
    /// Draw or replace the panel named `view.base_name`.
    fn draw(&mut self, view: &PanelView);

    /// Remove the panel named `base_name`, if present.
    fn remove(&mut self, base_name: &str);
}

/// Canvas that renders to the log, only when the view changes.
#[derive(Debug, Default)]
pub struct TracingCanvas {
    last: Option<PanelView>,
}

impl ChartCanvas for TracingCanvas {
    fn draw(&mut self, view: &PanelView) {
        if self.last.as_ref() != Some(view) {
            tracing::info!(panel = view.base_name, status = view.button_text, "Panel updated");
            self.last = Some(view.clone());
        }
    }

    fn remove(&mut self, base_name: &str) {
        if self.last.take().is_some() {
            tracing::info!(panel = base_name, "Panel removed");
        }
    }
}

/// Canvas that keeps the current view in memory.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    current: Option<PanelView>,
    draws: usize,
}

impl MemoryCanvas {
    /// The panel as currently shown, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&PanelView> {
        self.current.as_ref()
    }

    /// Number of draw calls received.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.draws
    }
}

impl ChartCanvas for MemoryCanvas {
    fn draw(&mut self, view: &PanelView) {
        self.current = Some(view.clone());
        self.draws += 1;
    }

    fn remove(&mut self, base_name: &str) {
        if self
            .current
            .as_ref()
            .is_some_and(|view| view.base_name == base_name)
        {
            self.current = None;
        }
    }
}

/// The enable flag and its on-chart display.
pub struct StatusPanel<C: ChartCanvas> {
    config: PanelConfig,
    enabled: bool,
    canvas: C,
}

impl<C: ChartCanvas> StatusPanel<C> {
    #[must_use]
    pub const fn new(config: PanelConfig, enabled: bool, canvas: C) -> Self {
        Self {
            config,
            enabled,
            canvas,
        }
    }

    /// Clear any stale panel with the same name, then draw if shown.
    pub fn attach(&mut self) {
        self.canvas.remove(&self.base_name());
        self.refresh();
    }

    /// Remove the panel from the chart.
    pub fn detach(&mut self) {
        self.canvas.remove(&self.base_name());
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Set the flag and redraw.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        debug!(enabled, "Enable flag set");
        self.refresh();
    }

    /// Flip the flag (a button click) and redraw. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Redraw the panel from the current flag, if the panel is shown.
    pub fn refresh(&mut self) {
        if self.config.show {
            let view = self.view();
            self.canvas.draw(&view);
        }
    }

    #[must_use]
    pub fn view(&self) -> PanelView {
        PanelView::render(&self.config, self.enabled)
    }

    pub const fn canvas(&self) -> &C {
        &self.canvas
    }

    fn base_name(&self) -> String {
        format!("{}-P-BAS", self.config.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(show: bool, enabled: bool) -> StatusPanel<MemoryCanvas> {
        let config = PanelConfig {
            show,
            ..PanelConfig::default()
        };
        StatusPanel::new(config, enabled, MemoryCanvas::default())
    }

    #[test]
    fn view_reflects_flag() {
        let config = PanelConfig::default();
        let on = PanelView::render(&config, true);
        let off = PanelView::render(&config, false);

        assert_eq!(on.button_text, "ENABLED");
        assert_eq!(on.button_background, PanelColor::DarkGreen);
        assert_eq!(off.button_text, "DISABLED");
        assert_eq!(off.button_background, PanelColor::DarkRed);
        assert_eq!(on.title, "Fixed SL/TP");
    }

    #[test]
    fn names_and_fonts_follow_config() {
        let config = PanelConfig {
            name: "EA1".to_string(),
            font_size: 12,
            ..PanelConfig::default()
        };
        let view = PanelView::render(&config, false);
        assert_eq!(view.base_name, "EA1-P-BAS");
        assert_eq!(view.label_name, "EA1-P-LAB");
        assert_eq!(view.button_name, "EA1-P-ENADIS");
        assert_eq!(view.title_font_size, 14);
        assert_eq!(view.button_font_size, 12);
    }

    #[test]
    fn margin_follows_corner() {
        let top_left = Margin::for_corner(HorizontalCorner::Left, VerticalCorner::Top, 20, 30);
        assert_eq!(
            top_left,
            Margin {
                left: 20,
                top: 30,
                right: 0,
                bottom: 0
            }
        );

        let bottom_right =
            Margin::for_corner(HorizontalCorner::Right, VerticalCorner::Bottom, 20, 30);
        assert_eq!(
            bottom_right,
            Margin {
                left: 0,
                top: 0,
                right: 20,
                bottom: 30
            }
        );

        let centered = Margin::for_corner(HorizontalCorner::Center, VerticalCorner::Center, 5, 5);
        assert_eq!(centered, Margin::default());
    }

    #[test]
    fn toggle_flips_flag_and_redraws_immediately() {
        let mut panel = panel(true, false);
        panel.attach();
        assert_eq!(panel.canvas().current().unwrap().button_text, "DISABLED");

        assert!(panel.toggle());
        assert!(panel.enabled());
        assert_eq!(panel.canvas().current().unwrap().button_text, "ENABLED");

        assert!(!panel.toggle());
        assert_eq!(panel.canvas().current().unwrap().button_text, "DISABLED");
        assert_eq!(panel.canvas().draws(), 3);
    }

    #[test]
    fn hidden_panel_still_tracks_flag() {
        let mut panel = panel(false, false);
        panel.attach();
        panel.toggle();

        assert!(panel.enabled());
        assert!(panel.canvas().current().is_none());
        assert_eq!(panel.canvas().draws(), 0);
    }

    #[test]
    fn detach_removes_panel() {
        let mut panel = panel(true, true);
        panel.attach();
        panel.detach();
        assert!(panel.canvas().current().is_none());
    }
}
