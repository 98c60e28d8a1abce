//! Draw and measure for dropdown cells.
//!
//! Both run for every visible cell on every paint, so they do no I/O, hold
//! no state and never fail.

use super::backend::{CellCanvas, DrawArgs};
use crate::types::{DropdownCellData, Theme};

/// Paint the cell value, left-aligned and vertically centered.
///
/// Paints nothing when the cell has no value. Always reports the draw as
/// handled.
pub fn draw_dropdown(args: &mut DrawArgs<'_>, data: &DropdownCellData) -> bool {
    let Some(value) = data.display_value() else {
        return true;
    };

    let rect = args.rect;
    let x = rect.x + args.theme.cell_horizontal_padding;
    let y = rect.center_y() + args.ctx.middle_center_bias();

    args.ctx.set_fill_style(&args.theme.text_dark);
    args.ctx.fill_text(value, x, y);
    true
}

/// Width the cell needs: text width plus padding on both sides, or 0.
pub fn measure_dropdown(ctx: &mut dyn CellCanvas, data: &DropdownCellData, theme: &Theme) -> f64 {
    match data.display_value() {
        Some(value) => ctx.measure_text(value) + theme.cell_horizontal_padding * 2.0,
        None => 0.0,
    }
}
