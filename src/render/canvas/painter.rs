//! `CellCanvas` over a browser `CanvasRenderingContext2d`.
//!
//! Note: the host applies DPR scaling to the context, so all coordinates
//! are logical (CSS) pixels.

use std::collections::HashMap;
use web_sys::CanvasRenderingContext2d;

use super::width_cache::{TextWidthCache, WIDTH_CACHE_CAP};
use crate::render::backend::CellCanvas;

/// Glyph sample covering cap height and descenders.
const BIAS_SAMPLE: &str = "ABCi09jgqpy";

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    widths: TextWidthCache,
    biases: HashMap<String, f64>,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        let font = ctx.font();
        Self {
            ctx,
            widths: TextWidthCache::new(font, WIDTH_CACHE_CAP),
            biases: HashMap::new(),
        }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Drop memoized widths and biases, e.g. after web fonts finish loading.
    pub fn clear_caches(&mut self) {
        self.widths.clear();
        self.biases.clear();
    }
}

impl CellCanvas for CanvasPainter {
    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    /// Always forwarded: the host changes the context font between cells.
    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
        self.widths.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        if let Some(width) = self.widths.get(text) {
            return width;
        }
        let width = self
            .ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0);
        self.widths.insert(text, width);
        width
    }

    fn middle_center_bias(&mut self) -> f64 {
        if let Some(bias) = self.biases.get(self.widths.font()) {
            return *bias;
        }
        let bias = self
            .ctx
            .measure_text(BIAS_SAMPLE)
            .map(|m| (m.actual_bounding_box_ascent() - m.actual_bounding_box_descent()) / 2.0)
            .unwrap_or(0.0);
        self.biases.insert(self.widths.font().to_string(), bias);
        bias
    }
}
