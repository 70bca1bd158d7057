use std::cell::RefCell;
use std::rc::Rc;

/// Single-assignment result slot shared between a spawned load task and the
/// frame loop.
///
/// Pending until `settle` is called; the settled result is handed out exactly
/// once by `take`. Later `settle` calls are ignored.
pub struct LoadSlot<T, E> {
    inner: Rc<RefCell<SlotState<T, E>>>,
}

enum SlotState<T, E> {
    Pending,
    Settled(Result<T, E>),
    Taken,
}

impl<T, E> Clone for LoadSlot<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E> Default for LoadSlot<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> LoadSlot<T, E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SlotState::Pending)),
        }
    }

    /// Store the outcome. Returns `false` if the slot was already settled.
    pub fn settle(&self, result: Result<T, E>) -> bool {
        let mut state = self.inner.borrow_mut();
        match *state {
            SlotState::Pending => {
                *state = SlotState::Settled(result);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.inner.borrow(), SlotState::Pending)
    }

    /// Hand out the settled result once.
    pub fn take(&self) -> Option<Result<T, E>> {
        let mut state = self.inner.borrow_mut();
        match std::mem::replace(&mut *state, SlotState::Taken) {
            SlotState::Settled(result) => Some(result),
            other => {
                *state = other;
                None
            }
        }
    }
}
