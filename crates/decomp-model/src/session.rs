//! Load sessions.
//!
//! A [`Session`] is shared by everything attached to one project. While a
//! bulk load is in progress, notifiers and collections attached to the
//! session hold their notifications back; each of them emits a single
//! "everything changed" notification once the load finishes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Shared load-state handle.
#[derive(Clone, Default)]
pub struct Session {
    inner: Rc<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    depth: Cell<u32>,
    epoch: Cell<u64>,
    replaying: Cell<bool>,
    deferred: RefCell<Vec<Box<dyn FnOnce(&Session)>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a load is in progress.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.inner.depth.get() > 0
    }

    /// Enter the loading state until the returned guard is finished or dropped.
    ///
    /// Guards nest; deferred notifications are flushed when the outermost
    /// guard ends.
    pub fn begin_load(&self) -> LoadGuard {
        if self.inner.depth.get() == 0 {
            self.inner.epoch.set(self.inner.epoch.get() + 1);
        }
        self.inner.depth.set(self.inner.depth.get() + 1);
        LoadGuard {
            session: self.clone(),
            active: true,
        }
    }

    /// Returns true if both handles refer to the same session.
    pub fn ptr_eq(&self, other: &Session) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the handlers running now were reached from a deferred
    /// end-of-load notification rather than from a live change.
    pub(crate) fn is_replaying(&self) -> bool {
        self.inner.replaying.get()
    }

    /// Run `emit` as the delivery of a deferred notification.
    pub(crate) fn replay(&self, emit: impl FnOnce()) {
        self.scoped(true, emit);
    }

    /// Run `emit` as the delivery of a live change. Handlers of a deferred
    /// notification may change other entities; those changes are live.
    pub(crate) fn live(&self, emit: impl FnOnce()) {
        self.scoped(false, emit);
    }

    fn scoped(&self, replaying: bool, emit: impl FnOnce()) {
        let previous = self.inner.replaying.replace(replaying);
        emit();
        self.inner.replaying.set(previous);
    }

    /// Identifies the current (or most recent) outermost load.
    pub(crate) fn epoch(&self) -> u64 {
        self.inner.epoch.get()
    }

    /// Queue a flush callback to run when loading completes.
    pub(crate) fn defer(&self, flush: Box<dyn FnOnce(&Session)>) {
        self.inner.deferred.borrow_mut().push(flush);
    }

    fn end_load(&self) {
        let depth = self.inner.depth.get().saturating_sub(1);
        self.inner.depth.set(depth);
        if depth > 0 {
            return;
        }
        // Flushing a collection reaches its owner, which may queue its own
        // flush for the first time; drain until nothing is left.
        loop {
            let pending = std::mem::take(&mut *self.inner.deferred.borrow_mut());
            if pending.is_empty() {
                break;
            }
            for flush in pending {
                flush(self);
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("loading", &self.is_loading())
            .field("deferred", &self.inner.deferred.borrow().len())
            .finish()
    }
}

/// Scope of a bulk load. Ending the scope flushes deferred notifications.
#[must_use = "the session stops loading as soon as the guard is dropped"]
pub struct LoadGuard {
    session: Session,
    active: bool,
}

impl LoadGuard {
    /// End the load explicitly.
    pub fn finish(mut self) {
        self.end();
    }

    fn end(&mut self) {
        if std::mem::replace(&mut self.active, false) {
            self.session.end_load();
        }
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_guards_flush_once_at_outermost_end() {
        let session = Session::new();
        let flushed = Rc::new(Cell::new(0));

        let outer = session.begin_load();
        let inner = session.begin_load();
        let counter = Rc::clone(&flushed);
        session.defer(Box::new(move |_| counter.set(counter.get() + 1)));

        inner.finish();
        assert!(session.is_loading());
        assert_eq!(flushed.get(), 0);

        drop(outer);
        assert!(!session.is_loading());
        assert_eq!(flushed.get(), 1);
    }
}
