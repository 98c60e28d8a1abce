//! dropdown-cell - searchable dropdown cells for canvas data grids
//!
//! A custom cell kind (`input-dropdown-cell`) for a host grid that paints
//! cells on a 2D canvas and overlays an editor on activation:
//! - Stateless draw/measure of the current value
//! - Editor state machine (closed, searching, read-only) with a one-frame
//!   commit yield
//! - Debounced asynchronous option loading
//! - Paste and delete adapters for the host's clipboard pipeline
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { DropdownCellType, DropdownEditorHandle } from 'dropdown-cell';
//! await init();
//! const cellType = new DropdownCellType(theme);
//! if (cellType.isMatch(cell)) cellType.draw(ctx, cell, x, y, w, h);
//! const editor = new DropdownEditorHandle(cell, onFinishedEditing, null, theme);
//! ```

pub mod editor;
pub mod error;
pub mod registry;
pub mod render;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

use wasm_bindgen::prelude::*;

pub use editor::{DropdownEditor, EditOutcome, EditorConfig, EditorMode, EditorProps, EditorView};
pub use error::{DropdownError, Result};
pub use registry::{CellRegistry, CellRenderer, DropdownRenderer, ProvideEditor};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use wasm::{DropdownCellType, DropdownEditorHandle};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
