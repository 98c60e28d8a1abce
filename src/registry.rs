//! Cell-type registry.
//!
//! The host keeps an ordered list of renderers and dispatches each custom
//! cell to the first one whose `is_match` holds. Every renderer exposes the
//! same fixed capability set: match, draw, measure, editor, paste, delete.

use crate::editor::{DropdownEditor, EditorProps};
use crate::error::Result;
use crate::render::{draw_dropdown, measure_dropdown, CellCanvas, DrawArgs};
use crate::types::{self, CellPayload, CustomCell, Theme, DROPDOWN_CELL_KIND};

/// Builds the editor for an activated cell.
pub type EditorFactory = fn(EditorProps) -> Result<DropdownEditor>;

/// Editor hookup returned by [`CellRenderer::provide_editor`].
#[derive(Clone, Copy)]
pub struct ProvideEditor {
    pub editor: EditorFactory,
    /// The editor draws edge to edge; the host should skip its own padding.
    pub disable_padding: bool,
    /// Transform applied by the host's delete pipeline.
    pub deleted_value: fn(&CustomCell) -> CustomCell,
}

/// Capabilities of one custom cell kind.
pub trait CellRenderer {
    /// Discriminant in the host's dispatch table.
    fn kind(&self) -> &'static str;

    fn is_match(&self, cell: &CustomCell) -> bool {
        cell.kind() == self.kind()
    }

    /// Paint a non-editing cell. Returns whether the draw was handled.
    fn draw(&self, args: &mut DrawArgs<'_>, cell: &CustomCell) -> bool;

    /// Width needed for column auto-sizing.
    fn measure(&self, ctx: &mut dyn CellCanvas, cell: &CustomCell, theme: &Theme) -> f64;

    fn provide_editor(&self, cell: &CustomCell) -> Option<ProvideEditor>;

    /// Clipboard paste; `None` if this renderer does not handle the cell.
    fn on_paste(&self, pasted: &str, cell: &CustomCell) -> Option<CustomCell>;

    /// Delete key; `None` if this renderer does not handle the cell.
    fn on_delete(&self, cell: &CustomCell) -> Option<CustomCell>;
}

/// Renderer for `input-dropdown-cell`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropdownRenderer;

impl CellRenderer for DropdownRenderer {
    fn kind(&self) -> &'static str {
        DROPDOWN_CELL_KIND
    }

    fn is_match(&self, cell: &CustomCell) -> bool {
        matches!(cell.data, CellPayload::Dropdown(_))
    }

    fn draw(&self, args: &mut DrawArgs<'_>, cell: &CustomCell) -> bool {
        match cell.as_dropdown() {
            Some(data) => draw_dropdown(args, data),
            None => false,
        }
    }

    fn measure(&self, ctx: &mut dyn CellCanvas, cell: &CustomCell, theme: &Theme) -> f64 {
        cell.as_dropdown()
            .map_or(0.0, |data| measure_dropdown(ctx, data, theme))
    }

    fn provide_editor(&self, cell: &CustomCell) -> Option<ProvideEditor> {
        cell.as_dropdown()?;
        Some(ProvideEditor {
            editor: DropdownEditor::new,
            disable_padding: true,
            deleted_value: types::deleted_value,
        })
    }

    fn on_paste(&self, pasted: &str, cell: &CustomCell) -> Option<CustomCell> {
        let data = cell.as_dropdown()?;
        Some(CustomCell {
            data: CellPayload::Dropdown(types::on_paste(pasted, data)),
            ..cell.clone()
        })
    }

    fn on_delete(&self, cell: &CustomCell) -> Option<CustomCell> {
        cell.as_dropdown()?;
        Some(types::deleted_value(cell))
    }
}

/// Ordered list of cell renderers; first match wins.
pub struct CellRegistry {
    renderers: Vec<Box<dyn CellRenderer>>,
}

impl Default for CellRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DropdownRenderer));
        registry
    }
}

impl CellRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Append a renderer. Earlier registrations take precedence.
    pub fn register(&mut self, renderer: Box<dyn CellRenderer>) {
        self.renderers.push(renderer);
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn find(&self, cell: &CustomCell) -> Option<&dyn CellRenderer> {
        self.renderers
            .iter()
            .find(|r| r.is_match(cell))
            .map(|r| &**r)
    }

    /// Draw with the matching renderer. `false` if nothing matched, so the
    /// host falls back to its own drawing.
    pub fn draw(&self, args: &mut DrawArgs<'_>, cell: &CustomCell) -> bool {
        self.find(cell).is_some_and(|r| r.draw(args, cell))
    }

    pub fn measure(&self, ctx: &mut dyn CellCanvas, cell: &CustomCell, theme: &Theme) -> f64 {
        self.find(cell)
            .map_or(0.0, |r| r.measure(ctx, cell, theme))
    }

    pub fn provide_editor(&self, cell: &CustomCell) -> Option<ProvideEditor> {
        self.find(cell)?.provide_editor(cell)
    }

    pub fn on_paste(&self, pasted: &str, cell: &CustomCell) -> Option<CustomCell> {
        self.find(cell)?.on_paste(pasted, cell)
    }

    pub fn on_delete(&self, cell: &CustomCell) -> Option<CustomCell> {
        self.find(cell)?.on_delete(cell)
    }
}
