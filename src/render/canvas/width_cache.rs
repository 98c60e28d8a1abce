//! Text widths for the painter's current font.
//!
//! Cells of one grid share a font, so widths are keyed by text alone and the
//! whole table is dropped when the font changes. When the table is full it
//! starts over rather than tracking recency.

use std::collections::HashMap;

/// Upper bound on remembered widths.
pub(crate) const WIDTH_CACHE_CAP: usize = 4096;

pub(crate) struct TextWidthCache {
    font: String,
    widths: HashMap<String, f64>,
    cap: usize,
}

impl TextWidthCache {
    pub(crate) fn new(font: String, cap: usize) -> Self {
        Self {
            font,
            widths: HashMap::new(),
            cap,
        }
    }

    pub(crate) fn font(&self) -> &str {
        &self.font
    }

    /// Switch fonts. Widths measured under another font are discarded.
    pub(crate) fn set_font(&mut self, font: &str) {
        if self.font != font {
            self.font.clear();
            self.font.push_str(font);
            self.widths.clear();
        }
    }

    pub(crate) fn get(&self, text: &str) -> Option<f64> {
        self.widths.get(text).copied()
    }

    pub(crate) fn insert(&mut self, text: &str, width: f64) {
        if self.cap == 0 {
            return;
        }
        if self.widths.len() >= self.cap && !self.widths.contains_key(text) {
            self.widths.clear();
        }
        self.widths.insert(text.to_string(), width);
    }

    pub(crate) fn clear(&mut self) {
        self.widths.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.widths.len()
    }
}
