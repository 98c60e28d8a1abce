//! Data types shared by the renderer, the editor and the host bridge.

mod cell;
mod option;
mod theme;

pub use cell::*;
pub use option::{normalize_options, DropdownOption, SelectOption};
pub(crate) use option::scalar_string;
pub use theme::*;
