//! One-shot memoized futures
//!
//! `Memo` stores the first future created for it as a `Shared` handle. Every
//! later request gets a clone of that same handle, whether the computation is
//! still pending or already resolved. The stored clone keeps the computation
//! alive, so dropping every caller-side handle only pauses it: the next caller
//! resumes the same work instead of starting over.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::future::Future;

pub type Pending<T> = Shared<BoxFuture<'static, T>>;

pub struct Memo<T> {
    slot: Mutex<Option<Pending<T>>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the stored future, creating it with `init` on the first call.
    ///
    /// `init` runs with the slot locked and must not call back into this memo.
    pub fn get_or_init<F, Fut>(&self, init: F) -> Pending<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut slot = self.slot.lock();
        if let Some(pending) = slot.as_ref() {
            return pending.clone();
        }
        let pending = init().boxed().shared();
        *slot = Some(pending.clone());
        pending
    }

    pub fn is_started(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// The resolved value, if the computation has completed.
    pub fn peek(&self) -> Option<T> {
        self.slot
            .lock()
            .as_ref()
            .and_then(|pending| pending.peek().cloned())
    }
}

impl<T> Default for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
