//! Cell rendering.
//!
//! This module provides:
//! - The `CellCanvas` painting trait and draw arguments
//! - Pure draw/measure routines for dropdown cells
//! - A Canvas 2D implementation of `CellCanvas` (wasm32)

pub mod backend;
pub mod canvas;
pub mod cell;

// Re-export commonly used types
pub use backend::{CellCanvas, CellRect, DrawArgs};
pub use cell::{draw_dropdown, measure_dropdown};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
