//! Canvas 2D painting surface.
//!
//! The browser context is only available on wasm32; the width cache is
//! target-independent.

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod width_cache;
#[cfg(target_arch = "wasm32")]
mod painter;

#[cfg(target_arch = "wasm32")]
pub use painter::CanvasPainter;
