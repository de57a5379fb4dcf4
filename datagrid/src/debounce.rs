//! # Debounced Search Controller
//!
//! Turns raw keystrokes into at most one committed search per quiet period.
//! The displayed text follows every keystroke so the input never lags; the
//! commit waits until typing has stopped for [`DebounceConfig::delay`].
//!
//! The `pending` flag signals that a change is queued. It is cleared
//! `delay + settle_grace` after the last keystroke whether or not the
//! resulting request has completed.

use std::fmt;
use std::time::Duration;

/// Source of one-shot timers (gloo `Timeout` in the browser, a virtual
/// clock in tests)
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle;
}

/// A scheduled task. Cancelled when [`TimerHandle::cancel`] is called or the
/// handle is dropped; cancelling a timer that already fired is a no-op.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Timing of the search debounce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Quiet period before a value is committed
    pub delay: Duration,
    /// Extra time the pending flag stays up after the commit
    pub settle_grace: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            settle_grace: Duration::from_millis(100),
        }
    }
}

/// Debounce state of one search box
#[derive(Debug, Default)]
pub struct SearchDebouncer {
    config: DebounceConfig,
    displayed: String,
    pending: bool,
    commit_timer: Option<TimerHandle>,
    settle_timer: Option<TimerHandle>,
}

impl SearchDebouncer {
    pub fn new(config: DebounceConfig, initial: impl Into<String>) -> Self {
        Self {
            config,
            displayed: initial.into(),
            ..Self::default()
        }
    }

    /// Text currently shown in the search box
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// A commit is scheduled and has not fired yet
    pub fn is_scheduled(&self) -> bool {
        self.commit_timer.is_some()
    }

    /// Record a keystroke.
    ///
    /// Replaces any previously scheduled commit, so only the last value of a
    /// burst reaches `commit`. `settle` runs once the pending window closes.
    pub fn on_input(
        &mut self,
        text: String,
        scheduler: &dyn Scheduler,
        commit: Box<dyn FnOnce(String)>,
        settle: Box<dyn FnOnce()>,
    ) {
        self.displayed = text.clone();
        self.pending = true;

        if let Some(timer) = self.commit_timer.take() {
            timer.cancel();
        }
        if let Some(timer) = self.settle_timer.take() {
            timer.cancel();
        }

        self.commit_timer = Some(scheduler.schedule(self.config.delay, Box::new(move || commit(text))));
        self.settle_timer = Some(scheduler.schedule(self.config.delay + self.config.settle_grace, settle));
    }

    /// Called from the commit task once it has fired
    pub fn mark_committed(&mut self) {
        self.commit_timer = None;
    }

    /// Called from the settle task; closes the pending window
    pub fn settle(&mut self) {
        self.pending = false;
        self.settle_timer = None;
    }

    /// Adopt a value echoed by the server. Ignored while the user is typing.
    pub fn sync(&mut self, search: &str) -> bool {
        if self.pending || self.is_scheduled() {
            return false;
        }
        if self.displayed != search {
            self.displayed = search.to_string();
        }
        true
    }

    /// Drop any queued commit and show `search`
    pub fn reset(&mut self, search: &str) {
        self.commit_timer = None;
        self.settle_timer = None;
        self.pending = false;
        self.displayed = search.to_string();
    }
}
