//! Interactive editor for dropdown cells.
//!
//! `DropdownEditor` is created when the host activates a cell and lives for
//! one edit session. It owns the local selection/search state, runs the
//! debounced option fetch, and notifies the host at most once:
//! - Selecting an option commits after a one-frame yield
//! - Teardown during that yield delivers the commit immediately
//! - Blur, or teardown without a selection, commits nothing
//! - Read-only cells never notify the host
//!
//! Scheduled callbacks hold weak references, so anything that fires after
//! the editor is gone is a no-op.

pub mod config;
mod fetch;
pub mod scheduler;
mod state;
pub mod styles;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::error::{DropdownError, Result};
use crate::types::{CustomCell, DropdownOption, OptionFetcher, SelectOption, Theme};

pub use config::{EditorConfig, StaleResponsePolicy, DEFAULT_DEBOUNCE_MS};
pub use scheduler::{Scheduler, TimerId};
pub use state::{EditOutcome, EditorMode, EditorView, SelectProps, SelectSlots};
pub use styles::EditorStyles;

#[cfg(target_arch = "wasm32")]
pub use scheduler::BrowserScheduler;

use state::{CommitState, EditorState};

/// Host callback receiving the committed cell.
pub type FinishedEditing = Rc<dyn Fn(Option<CustomCell>)>;

/// What the host hands an editor on activation.
pub struct EditorProps {
    pub cell: CustomCell,
    pub on_finished_editing: FinishedEditing,
    /// Keystroke (or text) that activated the editor, if any.
    pub initial_input: Option<String>,
    pub scheduler: Rc<dyn Scheduler>,
    pub theme: Theme,
    pub config: EditorConfig,
}

pub(crate) struct EditorInner {
    pub(crate) state: RefCell<EditorState>,
    pub(crate) scheduler: Rc<dyn Scheduler>,
    pub(crate) fetcher: Option<OptionFetcher>,
    pub(crate) config: EditorConfig,
    on_finished_editing: FinishedEditing,
    styles: EditorStyles,
}

/// One live edit session over a dropdown cell.
pub struct DropdownEditor {
    inner: Rc<EditorInner>,
}

impl DropdownEditor {
    /// Start a session. Fails if the cell is not a dropdown cell.
    pub fn new(props: EditorProps) -> Result<Self> {
        let EditorProps {
            cell,
            on_finished_editing,
            initial_input,
            scheduler,
            theme,
            config,
        } = props;

        let data = cell
            .as_dropdown()
            .ok_or_else(|| DropdownError::UnsupportedCell(cell.kind().to_string()))?;
        let value = data.value.clone();
        let allowed_values = data.allowed_values.clone();
        let fetcher = data.fetch_options.clone();
        let read_only = cell.read_only;

        let inner = Rc::new(EditorInner {
            state: RefCell::new(EditorState::new(cell, value, allowed_values, initial_input)),
            scheduler,
            fetcher,
            config,
            on_finished_editing,
            styles: EditorStyles::from_theme(&theme),
        });
        let editor = Self { inner };
        debug!(mode = ?editor.mode(), "dropdown editor activated");

        if !read_only {
            fetch::restart_debounce(&editor.inner);
        }
        Ok(editor)
    }

    pub fn mode(&self) -> EditorMode {
        self.inner.state.borrow().mode()
    }

    /// View model for the current render.
    pub fn view(&self) -> EditorView {
        self.inner.state.borrow().view()
    }

    pub fn styles(&self) -> &EditorStyles {
        &self.inner.styles
    }

    pub fn selected_value(&self) -> Option<String> {
        self.inner.state.borrow().selected_value.clone()
    }

    pub fn search_text(&self) -> String {
        self.inner.state.borrow().search_text.clone()
    }

    pub fn displayed_options(&self) -> Vec<DropdownOption> {
        self.inner.state.borrow().displayed_options.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.inner.state.borrow().is_searching
    }

    /// Called whenever asynchronously loaded options replace the list.
    pub fn set_on_change(&self, on_change: Rc<dyn Fn()>) {
        self.inner.state.borrow_mut().on_change = Some(on_change);
    }

    /// The closed text box gained focus: open the search widget.
    pub fn focus(&self) {
        let mut s = self.inner.state.borrow_mut();
        if s.read_only || s.has_committed() {
            return;
        }
        if !s.is_searching {
            s.is_searching = true;
            debug!("dropdown editor searching");
        }
    }

    /// Search text changed in the widget.
    pub fn input_change(&self, text: &str) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.read_only || s.torn_down || s.has_committed() {
                return;
            }
            if s.search_text == text {
                return;
            }
            s.search_text = text.to_string();
        }
        fetch::restart_debounce(&self.inner);
    }

    /// The widget reported a selection. `None`, or an option without a
    /// value, means "nothing chosen" and is ignored. Only accepted while
    /// searching.
    pub fn select(&self, option: Option<&SelectOption>) {
        let Some(value) = option.and_then(|opt| opt.value.clone()) else {
            trace!("null selection ignored");
            return;
        };
        let timer = {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down || s.has_committed() || s.mode() != EditorMode::Searching {
                return;
            }
            let cell = s.cell.with_value(Some(value.clone()));
            s.selected_value = Some(value);
            s.is_searching = false;
            s.commit = CommitState::Pending(cell);
            s.pending_timer.take()
        };
        if let Some(id) = timer {
            self.inner.scheduler.clear_timeout(id);
        }

        // Yield one frame so the host finishes its focus handling before
        // it sees the new value.
        let weak = Rc::downgrade(&self.inner);
        self.inner
            .scheduler
            .request_frame(Box::new(move || emit_commit(&weak)));
    }

    /// Focus left the widget without a selection.
    pub fn blur(&self) {
        let mut s = self.inner.state.borrow_mut();
        if s.read_only {
            return;
        }
        s.is_searching = false;
    }

    /// Outcome so far. `StillEditing` until the commit has been delivered.
    pub fn outcome(&self) -> EditOutcome {
        let s = self.inner.state.borrow();
        match &s.commit {
            CommitState::Emitted(cell) => EditOutcome::Committed(cell.clone()),
            CommitState::None | CommitState::Pending(_) => EditOutcome::StillEditing,
        }
    }

    /// End the session and report how it ended.
    ///
    /// A selection whose frame yield has not fired yet is delivered through
    /// the callback before this returns; the late frame is then a no-op.
    pub fn teardown(self) -> EditOutcome {
        self.shutdown()
    }

    fn shutdown(&self) -> EditOutcome {
        let (timer, outcome, pending, first) = {
            let mut s = self.inner.state.borrow_mut();
            let first = !s.torn_down;
            s.torn_down = true;
            s.on_change = None;
            let pending = s.take_pending();
            let outcome = match &s.commit {
                CommitState::Pending(cell) | CommitState::Emitted(cell) => {
                    EditOutcome::Committed(cell.clone())
                }
                CommitState::None => EditOutcome::Cancelled,
            };
            (s.pending_timer.take(), outcome, pending, first)
        };
        if let Some(id) = timer {
            self.inner.scheduler.clear_timeout(id);
        }
        if first {
            debug!(committed = matches!(outcome, EditOutcome::Committed(_)), "dropdown editor torn down");
        }
        if let Some(cell) = pending {
            debug!("dropdown value committed at teardown");
            (self.inner.on_finished_editing)(Some(cell));
        }
        outcome
    }
}

impl Drop for DropdownEditor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn emit_commit(weak: &Weak<EditorInner>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let pending = {
        let mut s = inner.state.borrow_mut();
        if s.torn_down {
            return;
        }
        s.take_pending()
    };
    let Some(cell) = pending else {
        return;
    };
    debug!("dropdown value committed");
    (inner.on_finished_editing)(Some(cell));
}
