//! Completion events for submitted work

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::Arc;

/// Completion signal of one submission (task or host access)
///
/// Cloning an event shares the same signal.
#[derive(Clone)]
pub struct Event {
    inner: Arc<EventInner>,
}

struct EventInner {
    done: Mutex<bool>,
    cond: Condvar,
}

impl Event {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(EventInner {
                done: Mutex::new(false),
                cond: Condvar::new(),
            }),
        }
    }

    /// An event that is already complete
    pub fn completed() -> Self {
        let event = Self::new();
        event.complete();
        event
    }

    pub(crate) fn complete(&self) {
        let mut done = self.inner.done.lock();
        *done = true;
        self.inner.cond.notify_all();
    }

    /// Block until the submission finished (successfully or not)
    pub fn wait(&self) {
        let mut done = self.inner.done.lock();
        while !*done {
            self.inner.cond.wait(&mut done);
        }
    }

    /// Non-blocking completion check
    pub fn is_complete(&self) -> bool {
        *self.inner.done.lock()
    }

    /// Whether two handles refer to the same submission
    pub fn same_as(&self, other: &Event) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// Completes its event when dropped, including on unwind
pub(crate) struct Completion(Event);

impl Completion {
    pub(crate) fn new(event: Event) -> Self {
        Self(event)
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.0.complete();
    }
}
