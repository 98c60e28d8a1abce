//! Debounced option fetching.
//!
//! Each search-text change cancels the pending timer and, when a provider
//! exists and the query is non-empty, arms a new one. When the timer fires
//! the provider is called and its future driven by the scheduler. In-flight
//! fetches are never cancelled; how overlapping responses land is governed
//! by `StaleResponsePolicy`.

use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

use super::config::StaleResponsePolicy;
use super::EditorInner;
use crate::error::Result;
use crate::types::DropdownOption;

/// Cancel any pending debounce timer and re-arm it for the current query.
pub(crate) fn restart_debounce(inner: &Rc<EditorInner>) {
    let (previous, active) = {
        let mut s = inner.state.borrow_mut();
        let active = !s.torn_down && !s.search_text.is_empty() && inner.fetcher.is_some();
        (s.pending_timer.take(), active)
    };
    if let Some(id) = previous {
        inner.scheduler.clear_timeout(id);
    }
    if !active {
        return;
    }

    let weak = Rc::downgrade(inner);
    let delay_ms = inner.config.debounce_ms;
    let id = inner
        .scheduler
        .set_timeout(delay_ms, Box::new(move || dispatch_fetch(&weak)));
    if id.is_some() {
        debug!(delay_ms, "option fetch scheduled");
    }
    inner.state.borrow_mut().pending_timer = id;
}

fn dispatch_fetch(weak: &Weak<EditorInner>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let Some(fetcher) = inner.fetcher.as_ref() else {
        return;
    };
    let (query, seq) = {
        let mut s = inner.state.borrow_mut();
        if s.torn_down {
            return;
        }
        s.pending_timer = None;
        s.fetch_seq += 1;
        (s.search_text.clone(), s.fetch_seq)
    };

    debug!(seq, query = %query, "fetching dropdown options");
    let future = fetcher(&query);
    let weak = Weak::clone(weak);
    inner.scheduler.spawn_local(Box::pin(async move {
        let result = future.await;
        apply_fetch_result(&weak, seq, &query, result);
    }));
}

fn apply_fetch_result(
    weak: &Weak<EditorInner>,
    seq: u64,
    query: &str,
    result: Result<Vec<DropdownOption>>,
) {
    let Some(inner) = weak.upgrade() else {
        trace!(seq, "editor gone, dropping option response");
        return;
    };
    let on_change = {
        let mut s = inner.state.borrow_mut();
        if s.torn_down {
            trace!(seq, "editor torn down, dropping option response");
            return;
        }
        let options = match result {
            Ok(options) => options,
            Err(e) => {
                warn!(error = %e, seq, query, "failed to fetch dropdown options");
                return;
            }
        };
        if inner.config.stale_responses == StaleResponsePolicy::LatestRequestWins
            && seq < s.applied_seq
        {
            trace!(seq, applied = s.applied_seq, "discarding stale option response");
            return;
        }
        s.applied_seq = s.applied_seq.max(seq);
        s.displayed_options = options;
        s.on_change.clone()
    };
    if let Some(on_change) = on_change {
        on_change();
    }
}
