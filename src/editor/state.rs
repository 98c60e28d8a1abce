//! Editor-local state and the view model derived from it.

use serde::Serialize;
use std::rc::Rc;

use super::scheduler::TimerId;
use crate::types::{normalize_options, CustomCell, DropdownOption, SelectOption};

/// What the editor currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorMode {
    /// Read-only-looking text box with the current value; focus opens search.
    ClosedWithValue,
    /// Searchable select with the menu open.
    Searching,
    /// Disabled text entry. Entered once for read-only cells, never left.
    ReadOnly,
}

/// How an edit session ended, or that it has not.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Committed(CustomCell),
    Cancelled,
    StillEditing,
}

/// Progress of the single commit a session may make.
#[derive(Debug, Clone)]
pub(crate) enum CommitState {
    None,
    /// Selected, waiting for the frame yield before notifying the host.
    Pending(CustomCell),
    /// Host has been notified.
    Emitted(CustomCell),
}

/// Custom rendering slots the selection widget should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSlots {
    pub dropdown_indicator: bool,
    pub indicator_separator: bool,
    /// Render the menu in a floating layer so it escapes canvas clipping.
    pub menu_in_floating_layer: bool,
}

impl Default for SelectSlots {
    fn default() -> Self {
        Self {
            dropdown_indicator: false,
            indicator_separator: false,
            menu_in_floating_layer: true,
        }
    }
}

/// Everything the external selection widget is handed while searching.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectProps {
    pub options: Vec<SelectOption>,
    /// Highlighted option; `None` when the value is not among `options`.
    pub value: Option<SelectOption>,
    pub input_value: String,
    pub auto_focus: bool,
    pub menu_is_open: bool,
    pub slots: SelectSlots,
}

/// View model for one render of the editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum EditorView {
    ReadOnly { text: String },
    ClosedWithValue { text: String },
    Searching(SelectProps),
}

pub(crate) struct EditorState {
    /// Cell as it was when the session started.
    pub(crate) cell: CustomCell,
    pub(crate) read_only: bool,
    pub(crate) selected_value: Option<String>,
    pub(crate) search_text: String,
    pub(crate) displayed_options: Vec<DropdownOption>,
    pub(crate) is_searching: bool,
    pub(crate) pending_timer: Option<TimerId>,
    /// Sequence number of the most recently dispatched fetch.
    pub(crate) fetch_seq: u64,
    /// Sequence number of the newest fetch whose result was applied.
    pub(crate) applied_seq: u64,
    pub(crate) commit: CommitState,
    pub(crate) torn_down: bool,
    pub(crate) on_change: Option<Rc<dyn Fn()>>,
}

impl EditorState {
    pub(crate) fn new(
        cell: CustomCell,
        value: Option<String>,
        allowed_values: Vec<DropdownOption>,
        initial_input: Option<String>,
    ) -> Self {
        Self {
            read_only: cell.read_only,
            cell,
            selected_value: value,
            search_text: initial_input.unwrap_or_default(),
            displayed_options: allowed_values,
            is_searching: false,
            pending_timer: None,
            fetch_seq: 0,
            applied_seq: 0,
            commit: CommitState::None,
            torn_down: false,
            on_change: None,
        }
    }

    fn has_value(&self) -> bool {
        self.selected_value.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Mode is re-derived on every render: no value always means searching.
    pub(crate) fn mode(&self) -> EditorMode {
        if self.read_only {
            EditorMode::ReadOnly
        } else if self.is_searching || !self.has_value() {
            EditorMode::Searching
        } else {
            EditorMode::ClosedWithValue
        }
    }

    pub(crate) fn view(&self) -> EditorView {
        match self.mode() {
            EditorMode::ReadOnly => EditorView::ReadOnly {
                text: self.selected_value.clone().unwrap_or_default(),
            },
            EditorMode::ClosedWithValue => EditorView::ClosedWithValue {
                text: self.selected_value.clone().unwrap_or_default(),
            },
            EditorMode::Searching => {
                let options = normalize_options(&self.displayed_options);
                let value = self.selected_value.as_deref().and_then(|selected| {
                    options
                        .iter()
                        .find(|opt| opt.value.as_deref() == Some(selected))
                        .cloned()
                });
                EditorView::Searching(SelectProps {
                    options,
                    value,
                    input_value: self.search_text.clone(),
                    auto_focus: true,
                    menu_is_open: true,
                    slots: SelectSlots::default(),
                })
            }
        }
    }

    pub(crate) fn has_committed(&self) -> bool {
        !matches!(self.commit, CommitState::None)
    }

    /// Mark a pending commit emitted and hand back the cell to deliver.
    pub(crate) fn take_pending(&mut self) -> Option<CustomCell> {
        let CommitState::Pending(cell) = &self.commit else {
            return None;
        };
        let cell = cell.clone();
        self.commit = CommitState::Emitted(cell.clone());
        Some(cell)
    }
}
