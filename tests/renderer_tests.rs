//! Cell renderer and registry tests
//!
//! Draw/measure geometry, dispatch by kind, and the agreement between what
//! is drawn and what is measured.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{dropdown_cell, RecordingCanvas};
use dropdown_cell::render::{CellRect, DrawArgs};
use dropdown_cell::{
    CellPayload, CellRegistry, CellRenderer, CustomCell, DropdownRenderer, Theme,
    DROPDOWN_CELL_KIND,
};
use serde_json::json;
use test_case::test_case;

fn other_cell(kind: &str) -> CustomCell {
    let mut cell = dropdown_cell(None, &[]);
    cell.data = CellPayload::Other {
        kind: kind.into(),
        raw: json!({"kind": kind}),
    };
    cell
}

fn draw(cell: &CustomCell, rect: CellRect, theme: &Theme, canvas: &mut RecordingCanvas) -> bool {
    let mut args = DrawArgs {
        ctx: canvas,
        rect,
        theme,
    };
    CellRegistry::default().draw(&mut args, cell)
}

// ============================================================================
// Draw
// ============================================================================

#[test]
fn test_draw_value_left_aligned_and_centered() {
    let theme = Theme::default();
    let mut canvas = RecordingCanvas {
        bias: 0.5,
        ..RecordingCanvas::default()
    };
    let cell = dropdown_cell(Some("Apple"), &["Apple"]);

    let handled = draw(&cell, CellRect::new(100.0, 40.0, 120.0, 34.0), &theme, &mut canvas);

    assert!(handled);
    assert_eq!(canvas.texts, vec![("Apple".to_string(), 108.0, 57.5)]);
    assert_eq!(canvas.fill_style.as_deref(), Some(theme.text_dark.as_str()));
}

#[test_case(None ; "absent value")]
#[test_case(Some("") ; "empty value")]
fn test_draw_without_value_paints_nothing(value: Option<&str>) {
    let theme = Theme::default();
    let mut canvas = RecordingCanvas::default();
    let cell = dropdown_cell(value, &["Apple"]);

    let handled = draw(&cell, CellRect::new(0.0, 0.0, 80.0, 30.0), &theme, &mut canvas);

    assert!(handled);
    assert!(canvas.texts.is_empty());
}

#[test]
fn test_draw_uses_theme_padding_and_color() {
    let theme = Theme {
        text_dark: "#101010".into(),
        cell_horizontal_padding: 4.0,
        ..Theme::default()
    };
    let mut canvas = RecordingCanvas::default();
    let cell = dropdown_cell(Some("Kiwi"), &[]);

    draw(&cell, CellRect::new(10.0, 0.0, 50.0, 20.0), &theme, &mut canvas);

    assert_eq!(canvas.texts[0].1, 14.0);
    assert_eq!(canvas.texts[0].2, 10.0);
    assert_eq!(canvas.fill_style.as_deref(), Some("#101010"));
}

#[test]
fn test_draw_does_not_clip_long_values() {
    let theme = Theme::default();
    let mut canvas = RecordingCanvas::default();
    let long = "a very long value that overflows the cell";
    let cell = dropdown_cell(Some(long), &[]);

    draw(&cell, CellRect::new(0.0, 0.0, 20.0, 20.0), &theme, &mut canvas);

    assert_eq!(canvas.texts[0].0, long);
}

// ============================================================================
// Measure
// ============================================================================

#[test_case(Some("Apple"), 7.0, 8.0 => 51.0 ; "five chars default padding")]
#[test_case(Some("ab"), 10.0, 4.0 => 28.0 ; "custom padding")]
#[test_case(None, 7.0, 8.0 => 0.0 ; "absent value")]
#[test_case(Some(""), 7.0, 8.0 => 0.0 ; "empty value")]
fn test_measure(value: Option<&str>, char_width: f64, padding: f64) -> f64 {
    let theme = Theme {
        cell_horizontal_padding: padding,
        ..Theme::default()
    };
    let mut canvas = RecordingCanvas {
        char_width,
        ..RecordingCanvas::default()
    };
    CellRegistry::default().measure(&mut canvas, &dropdown_cell(value, &[]), &theme)
}

#[test]
fn test_measure_matches_drawn_text() {
    let theme = Theme::default();
    let cell = dropdown_cell(Some("Banana"), &[]);

    let mut drawn = RecordingCanvas::default();
    draw(&cell, CellRect::new(0.0, 0.0, 200.0, 30.0), &theme, &mut drawn);
    let mut measured = RecordingCanvas::default();
    let width = CellRegistry::default().measure(&mut measured, &cell, &theme);

    assert_eq!(measured.measured, vec![drawn.texts[0].0.clone()]);
    let text_x = drawn.texts[0].1;
    assert_eq!(width, text_x * 2.0 + 7.0 * 6.0);
}

// ============================================================================
// Registry dispatch
// ============================================================================

#[test]
fn test_default_registry_holds_dropdown() {
    let registry = CellRegistry::default();
    assert_eq!(registry.len(), 1);
    assert!(CellRegistry::new().is_empty());

    let cell = dropdown_cell(Some("x"), &[]);
    let renderer = registry.find(&cell).expect("dropdown renderer");
    assert_eq!(renderer.kind(), DROPDOWN_CELL_KIND);
}

#[test]
fn test_unmatched_cell_falls_through() {
    let registry = CellRegistry::default();
    let cell = other_cell("star-cell");
    let theme = Theme::default();
    let mut canvas = RecordingCanvas::default();

    assert!(registry.find(&cell).is_none());
    assert!(!draw(&cell, CellRect::new(0.0, 0.0, 10.0, 10.0), &theme, &mut canvas));
    assert_eq!(registry.measure(&mut canvas, &cell, &theme), 0.0);
    assert!(registry.provide_editor(&cell).is_none());
    assert!(registry.on_paste("x", &cell).is_none());
    assert!(registry.on_delete(&cell).is_none());
    assert!(canvas.texts.is_empty());
}

#[test]
fn test_first_registration_wins() {
    struct Shadow;

    impl CellRenderer for Shadow {
        fn kind(&self) -> &'static str {
            DROPDOWN_CELL_KIND
        }
        fn draw(&self, _args: &mut DrawArgs<'_>, _cell: &CustomCell) -> bool {
            false
        }
        fn measure(
            &self,
            _ctx: &mut dyn dropdown_cell::render::CellCanvas,
            _cell: &CustomCell,
            _theme: &Theme,
        ) -> f64 {
            -1.0
        }
        fn provide_editor(&self, _cell: &CustomCell) -> Option<dropdown_cell::ProvideEditor> {
            None
        }
        fn on_paste(&self, _pasted: &str, _cell: &CustomCell) -> Option<CustomCell> {
            None
        }
        fn on_delete(&self, _cell: &CustomCell) -> Option<CustomCell> {
            None
        }
    }

    let mut registry = CellRegistry::new();
    registry.register(Box::new(Shadow));
    registry.register(Box::new(DropdownRenderer));

    let cell = dropdown_cell(Some("x"), &[]);
    let mut canvas = RecordingCanvas::default();
    assert_eq!(registry.measure(&mut canvas, &cell, &Theme::default()), -1.0);
}

#[test]
fn test_provide_editor_disables_padding() {
    let registry = CellRegistry::default();
    let cell = dropdown_cell(Some("Apple"), &[]);

    let provided = registry.provide_editor(&cell).expect("editor hookup");
    assert!(provided.disable_padding);

    let deleted = (provided.deleted_value)(&cell);
    assert_eq!(
        deleted.as_dropdown().unwrap().value.as_deref(),
        Some("")
    );
}

#[test]
fn test_provided_factory_builds_editor() {
    use common::{editor_props, finish_recorder, ManualScheduler};
    use dropdown_cell::EditorMode;

    let registry = CellRegistry::default();
    let cell = dropdown_cell(Some("Apple"), &["Apple"]);
    let provided = registry.provide_editor(&cell).unwrap();

    let scheduler = ManualScheduler::new();
    let (on_finished, _) = finish_recorder();
    let editor = (provided.editor)(editor_props(cell, &scheduler, on_finished)).unwrap();
    assert_eq!(editor.mode(), EditorMode::ClosedWithValue);
}
