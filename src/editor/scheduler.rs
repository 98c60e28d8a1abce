//! Event-loop hooks the editor needs from its host.
//!
//! The editor never blocks: debounce timers, the post-frame commit and
//! option fetches are all handed to a `Scheduler`. The browser
//! implementation maps them onto `setTimeout`, `requestAnimationFrame` and
//! `spawn_local`; tests drive a virtual clock instead.

use std::future::Future;
use std::pin::Pin;

/// Handle of a scheduled single-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Single-threaded scheduling primitives.
pub trait Scheduler {
    /// Run `callback` once after `delay_ms`. `None` if the timer could not
    /// be scheduled.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Option<TimerId>;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);

    /// Run `callback` after the current paint/layout cycle.
    fn request_frame(&self, callback: Box<dyn FnOnce()>);

    /// Drive `future` to completion on the UI thread.
    fn spawn_local(&self, future: Pin<Box<dyn Future<Output = ()>>>);
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScheduler;

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    use super::{Scheduler, TimerId};

    #[derive(Clone, Copy)]
    enum Slot {
        Timer,
        Frame,
    }

    #[derive(Default)]
    struct Registry {
        timers: HashMap<i32, Closure<dyn FnMut()>>,
        frames: HashMap<i32, Closure<dyn FnMut()>>,
        fired_timers: Vec<i32>,
        fired_frames: Vec<i32>,
    }

    impl Registry {
        /// Drop closures whose callbacks have finished running.
        fn reap(&mut self) {
            for id in self.fired_timers.drain(..) {
                self.timers.remove(&id);
            }
            for id in self.fired_frames.drain(..) {
                self.frames.remove(&id);
            }
        }
    }

    /// `Scheduler` backed by the browser window.
    ///
    /// Closures are kept alive until they have fired or been cancelled, then
    /// released on the next scheduling call.
    pub struct BrowserScheduler {
        registry: Rc<RefCell<Registry>>,
    }

    impl Default for BrowserScheduler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BrowserScheduler {
        pub fn new() -> Self {
            Self {
                registry: Rc::new(RefCell::new(Registry::default())),
            }
        }

        fn wrap(
            &self,
            slot: Slot,
            callback: Box<dyn FnOnce()>,
        ) -> (Closure<dyn FnMut()>, Rc<Cell<i32>>) {
            let pending = RefCell::new(Some(callback));
            let handle = Rc::new(Cell::new(0));
            let handle_for_cb = Rc::clone(&handle);
            let weak_registry: Weak<RefCell<Registry>> = Rc::downgrade(&self.registry);
            let closure = Closure::wrap(Box::new(move || {
                let callback = pending.borrow_mut().take();
                if let Some(callback) = callback {
                    callback();
                }
                // Marked only after the callback returns so a nested
                // scheduling call never drops the closure that is running.
                if let Some(registry) = weak_registry.upgrade() {
                    let mut r = registry.borrow_mut();
                    match slot {
                        Slot::Timer => r.fired_timers.push(handle_for_cb.get()),
                        Slot::Frame => r.fired_frames.push(handle_for_cb.get()),
                    }
                }
            }) as Box<dyn FnMut()>);
            (closure, handle)
        }
    }

    impl Scheduler for BrowserScheduler {
        fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Option<TimerId> {
            let window = web_sys::window()?;
            self.registry.borrow_mut().reap();
            let (closure, handle) = self.wrap(Slot::Timer, callback);
            let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
            let id = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay,
                )
                .ok()?;
            handle.set(id);
            self.registry.borrow_mut().timers.insert(id, closure);
            Some(TimerId(id))
        }

        fn clear_timeout(&self, id: TimerId) {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(id.0);
            }
            let mut r = self.registry.borrow_mut();
            r.timers.remove(&id.0);
            r.reap();
        }

        fn request_frame(&self, callback: Box<dyn FnOnce()>) {
            let Some(window) = web_sys::window() else {
                return;
            };
            self.registry.borrow_mut().reap();
            let (closure, handle) = self.wrap(Slot::Frame, callback);
            if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                handle.set(id);
                self.registry.borrow_mut().frames.insert(id, closure);
            }
        }

        fn spawn_local(&self, future: Pin<Box<dyn Future<Output = ()>>>) {
            wasm_bindgen_futures::spawn_local(future);
        }
    }

    impl Drop for BrowserScheduler {
        fn drop(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut r = self.registry.borrow_mut();
            for id in r.timers.keys() {
                window.clear_timeout_with_handle(*id);
            }
            for id in r.frames.keys() {
                let _ = window.cancel_animation_frame(*id);
            }
            r.timers.clear();
            r.frames.clear();
        }
    }
}
