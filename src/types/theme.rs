use serde::{Deserialize, Serialize};

/// Theme tokens supplied by the host grid.
///
/// Values are opaque CSS strings; this crate passes them through and never
/// derives new colors from them. Every field has a default so hosts may
/// send partial themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub text_dark: String,
    pub text_light: String,
    pub bg_cell: String,
    pub bg_cell_medium: String,
    pub accent_color: String,
    pub accent_fg: String,
    pub font_family: String,
    /// Font size used inside the editor overlay, e.g. `"13px"`.
    pub editor_font_size: String,
    /// Font size/style prefix used on the canvas, e.g. `"13px"`.
    pub base_font_style: String,
    pub cell_horizontal_padding: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_dark: "#313139".to_string(),
            text_light: "#B2B2B2".to_string(),
            bg_cell: "#FFFFFF".to_string(),
            bg_cell_medium: "#FAFAFB".to_string(),
            accent_color: "#4F5DFF".to_string(),
            accent_fg: "#FFFFFF".to_string(),
            font_family: "Inter, Roboto, -apple-system, BlinkMacSystemFont, avenir next, avenir, \
                          segoe ui, helvetica neue, helvetica, Ubuntu, noto, arial, sans-serif"
                .to_string(),
            editor_font_size: "13px".to_string(),
            base_font_style: "13px".to_string(),
            cell_horizontal_padding: 8.0,
        }
    }
}

impl Theme {
    /// Canvas font string for cell text.
    pub fn base_font_full(&self) -> String {
        format!("{} {}", self.base_font_style, self.font_family)
    }

    /// CSS font shorthand for the editor overlay.
    pub fn editor_font(&self) -> String {
        format!("{} {}", self.editor_font_size, self.font_family)
    }
}
