//! Common test utilities.
//!
//! - `ManualScheduler`: virtual clock for timers, frames and spawned futures
//! - `deferred`: a future resolved by hand, for racing option fetches
//! - `RecordingCanvas`: `CellCanvas` that records instead of painting
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

use dropdown_cell::editor::{EditorProps, FinishedEditing, Scheduler, TimerId};
use dropdown_cell::render::CellCanvas;
use dropdown_cell::{
    CustomCell, DropdownCellData, DropdownOption, EditorConfig, FetchFuture, OptionFetcher, Result,
    Theme,
};

// ============================================================================
// Scheduler
// ============================================================================

type Task = Pin<Box<dyn Future<Output = ()>>>;

struct PendingTimer {
    id: TimerId,
    due: u64,
    callback: Box<dyn FnOnce()>,
}

struct NoopWake;

impl Wake for NoopWake {
    fn wake(self: Arc<Self>) {}
}

/// Deterministic scheduler. Nothing runs until the test advances it.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<i32>,
    timers: RefCell<Vec<PendingTimer>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    tasks: RefCell<Vec<Task>>,
    cleared: RefCell<Vec<TimerId>>,
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Option<TimerId> {
        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get() + u64::from(delay_ms),
            callback,
        });
        Some(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|t| t.id != id);
        self.cleared.borrow_mut().push(id);
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push(callback);
    }

    fn spawn_local(&self, future: Pin<Box<dyn Future<Output = ()>>>) {
        self.tasks.borrow_mut().push(future);
    }
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Move the clock forward, firing due timers in order and polling any
    /// futures they spawn.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                due.map(|i| timers.remove(i))
            };
            let Some(timer) = next else { break };
            self.now.set(timer.due);
            (timer.callback)();
            self.run_tasks();
        }
        self.now.set(target);
    }

    /// Fire every queued frame callback. Returns how many ran.
    pub fn run_frames(&self) -> usize {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for frame in frames {
            frame();
        }
        self.run_tasks();
        count
    }

    /// Poll spawned futures until none can make progress.
    pub fn run_tasks(&self) {
        let waker = Waker::from(Arc::new(NoopWake));
        let mut cx = Context::from_waker(&waker);
        loop {
            let batch = std::mem::take(&mut *self.tasks.borrow_mut());
            if batch.is_empty() {
                return;
            }
            let mut progressed = false;
            let mut pending = Vec::new();
            for mut task in batch {
                match task.as_mut().poll(&mut cx) {
                    Poll::Ready(()) => progressed = true,
                    Poll::Pending => pending.push(task),
                }
            }
            let mut tasks = self.tasks.borrow_mut();
            if !tasks.is_empty() {
                progressed = true;
            }
            pending.append(&mut tasks);
            *tasks = pending;
            if !progressed {
                return;
            }
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn cleared_timers(&self) -> Vec<TimerId> {
        self.cleared.borrow().clone()
    }
}

// ============================================================================
// Deferred futures and fetchers
// ============================================================================

/// Future that completes once its `Resolver` is used.
pub struct Deferred<T> {
    slot: Rc<RefCell<Option<T>>>,
}

pub struct Resolver<T> {
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Future for Deferred<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<T> {
        match self.slot.borrow_mut().take() {
            Some(value) => Poll::Ready(value),
            None => Poll::Pending,
        }
    }
}

impl<T> Resolver<T> {
    pub fn resolve(self, value: T) {
        *self.slot.borrow_mut() = Some(value);
    }
}

pub fn deferred<T>() -> (Deferred<T>, Resolver<T>) {
    let slot = Rc::new(RefCell::new(None));
    (
        Deferred {
            slot: Rc::clone(&slot),
        },
        Resolver { slot },
    )
}

type FetchResult = Result<Vec<DropdownOption>>;

struct PendingFetch {
    query: String,
    resolver: Option<Resolver<FetchResult>>,
}

/// Calls made to a deferred fetcher, each resolved by the test.
#[derive(Default)]
pub struct FetchLog {
    calls: RefCell<Vec<PendingFetch>>,
}

impl FetchLog {
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.query.clone()).collect()
    }

    /// Resolve call `index`. Panics if it was already resolved.
    pub fn resolve(&self, index: usize, result: FetchResult) {
        let resolver = self.calls.borrow_mut()[index]
            .resolver
            .take()
            .expect("fetch already resolved");
        resolver.resolve(result);
    }
}

/// Fetcher whose responses are resolved by hand through the returned log.
pub fn deferred_fetcher() -> (OptionFetcher, Rc<FetchLog>) {
    let log = Rc::new(FetchLog::default());
    let calls = Rc::clone(&log);
    let fetcher: OptionFetcher = Rc::new(move |query: &str| -> FetchFuture {
        let (future, resolver) = deferred();
        calls.calls.borrow_mut().push(PendingFetch {
            query: query.to_string(),
            resolver: Some(resolver),
        });
        Box::pin(future)
    });
    (fetcher, log)
}

/// Option list made of bare identifiers.
pub fn options(values: &[&str]) -> Vec<DropdownOption> {
    values
        .iter()
        .map(|v| DropdownOption::Value((*v).to_string()))
        .collect()
}

// ============================================================================
// Cells and editor props
// ============================================================================

pub fn dropdown_cell(value: Option<&str>, allowed: &[&str]) -> CustomCell {
    CustomCell::dropdown(DropdownCellData::new(value, options(allowed)))
}

pub fn fetching_cell(value: Option<&str>, fetcher: OptionFetcher) -> CustomCell {
    CustomCell::dropdown(DropdownCellData::new(value, Vec::new()).with_fetcher(fetcher))
}

/// `on_finished_editing` that records every call.
pub fn finish_recorder() -> (FinishedEditing, Rc<RefCell<Vec<Option<CustomCell>>>>) {
    let calls: Rc<RefCell<Vec<Option<CustomCell>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let callback: FinishedEditing =
        Rc::new(move |cell: Option<CustomCell>| sink.borrow_mut().push(cell));
    (callback, calls)
}

pub fn editor_props(
    cell: CustomCell,
    scheduler: &Rc<ManualScheduler>,
    on_finished_editing: FinishedEditing,
) -> EditorProps {
    EditorProps {
        cell,
        on_finished_editing,
        initial_input: None,
        scheduler: Rc::clone(scheduler) as Rc<dyn Scheduler>,
        theme: Theme::default(),
        config: EditorConfig::default(),
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// Canvas stand-in: every glyph is `char_width` wide.
pub struct RecordingCanvas {
    pub char_width: f64,
    pub bias: f64,
    pub fill_style: Option<String>,
    pub font: Option<String>,
    pub texts: Vec<(String, f64, f64)>,
    pub measured: Vec<String>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            bias: 0.0,
            fill_style: None,
            font: None,
            texts: Vec::new(),
            measured: Vec::new(),
        }
    }
}

impl CellCanvas for RecordingCanvas {
    fn set_fill_style(&mut self, color: &str) {
        self.fill_style = Some(color.to_string());
    }

    fn set_font(&mut self, font: &str) {
        self.font = Some(font.to_string());
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.texts.push((text.to_string(), x, y));
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        self.measured.push(text.to_string());
        self.char_width * text.chars().count() as f64
    }

    fn middle_center_bias(&mut self) -> f64 {
        self.bias
    }
}
