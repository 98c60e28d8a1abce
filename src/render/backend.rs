//! Painting surface abstraction for cell renderers.
//!
//! `CellCanvas` covers the handful of Canvas 2D operations a cell needs,
//! so renderers stay pure functions over a trait object and can be driven
//! by the browser context or by a recording surface in tests.

use crate::types::Theme;

/// Cell rectangle in logical (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Drawing operations a cell renderer may use.
///
/// The host sets the cell font (`Theme::base_font_full`) before invoking a
/// renderer; `measure_text` and `middle_center_bias` apply to that font.
pub trait CellCanvas {
    fn set_fill_style(&mut self, color: &str);

    fn set_font(&mut self, font: &str);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;

    /// Offset that centers glyphs drawn with a `middle` baseline.
    fn middle_center_bias(&mut self) -> f64 {
        0.0
    }
}

/// Arguments for a single cell draw call.
pub struct DrawArgs<'a> {
    pub ctx: &'a mut dyn CellCanvas,
    pub rect: CellRect,
    pub theme: &'a Theme,
}
