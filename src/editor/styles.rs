//! Style declarations for the editor overlay.
//!
//! The selection widget and the closed text box are styled from theme
//! tokens only; values are passed through untouched.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::Theme;

/// CSS property → value.
pub type StyleDecls = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorStyles {
    /// Read-only-looking text box shown while closed (and when read-only).
    pub text_box: StyleDecls,
    pub control: StyleDecls,
    pub input: StyleDecls,
    pub single_value: StyleDecls,
    pub placeholder: StyleDecls,
    pub menu: StyleDecls,
    pub option: StyleDecls,
    pub option_focused: StyleDecls,
    pub option_selected: StyleDecls,
}

fn decls<const N: usize>(pairs: [(&'static str, &str); N]) -> StyleDecls {
    pairs
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}

impl EditorStyles {
    pub fn from_theme(theme: &Theme) -> Self {
        let font_family = theme.font_family.as_str();
        let font_size = theme.editor_font_size.as_str();

        Self {
            text_box: decls([
                ("background-color", theme.bg_cell.as_str()),
                ("color", theme.text_dark.as_str()),
                ("font-family", font_family),
                ("font-size", font_size),
                ("border", "none"),
                ("outline", "none"),
                ("width", "100%"),
                ("cursor", "default"),
            ]),
            control: decls([
                ("background-color", theme.bg_cell.as_str()),
                ("border", "none"),
                ("box-shadow", "none"),
                ("min-height", "unset"),
            ]),
            input: decls([
                ("color", theme.text_dark.as_str()),
                ("font-family", font_family),
                ("font-size", font_size),
            ]),
            single_value: decls([("color", theme.text_dark.as_str())]),
            placeholder: decls([("color", theme.text_light.as_str())]),
            menu: decls([
                ("background-color", theme.bg_cell.as_str()),
                ("color", theme.text_dark.as_str()),
                ("font-family", font_family),
                ("font-size", font_size),
            ]),
            option: decls([
                ("background-color", theme.bg_cell.as_str()),
                ("color", theme.text_dark.as_str()),
            ]),
            option_focused: decls([("background-color", theme.bg_cell_medium.as_str())]),
            option_selected: decls([
                ("background-color", theme.accent_color.as_str()),
                ("color", theme.accent_fg.as_str()),
            ]),
        }
    }
}
