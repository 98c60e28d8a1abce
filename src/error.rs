//! Structured error types for the dropdown cell.
//!
//! Errors never reach the grid's paint pass: draw and measure are total, and
//! fetch failures are logged and swallowed by the editor. What remains are
//! decode failures at the host boundary and the fetcher's own error type.

/// All errors that can occur while decoding cells or loading options.
#[derive(Debug, thiserror::Error)]
pub enum DropdownError {
    /// The option provider failed or returned something unusable.
    #[error("Option fetch failed: {0}")]
    Fetch(String),

    /// A cell, theme or option payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The cell handed to an editor or adapter is not a dropdown cell.
    #[error("Unsupported cell kind: {0}")]
    UnsupportedCell(String),

    /// A JavaScript exception crossed into Rust.
    #[error("JavaScript error: {0}")]
    Js(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DropdownError>;

impl From<serde_json::Error> for DropdownError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<String> for DropdownError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for DropdownError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DropdownError> for wasm_bindgen::JsValue {
    fn from(e: DropdownError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<serde_wasm_bindgen::Error> for DropdownError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
