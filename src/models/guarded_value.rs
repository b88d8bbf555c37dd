use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Inner<T> {
    value: T,
    held: bool,
    /// Bumped by every operator write and every hold.
    writes: u64,
}

/// A displayed control value that an operator can hold while dragging.
///
/// While held, background refreshes through [`GuardedValue::try_set`] are
/// dropped and only the holder writes through [`GuardedValue::set`]. The
/// value and the held flag sit behind one lock so a reader never sees a value
/// written by both sides at once.
///
/// A refresh computed from a slow read should go through
/// [`GuardedValue::try_set_since`] with the [`GuardedValue::epoch`] taken
/// before the read, so a whole press/move/release that happened meanwhile is
/// not overwritten with the older value.
#[derive(Debug)]
pub struct GuardedValue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T: Copy> GuardedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value,
                held: false,
                writes: 0,
            }),
        }
    }

    // A panic elsewhere can't leave the pair half written, so a poisoned
    // lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> T {
        self.lock().value
    }

    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    /// Current write counter, to pass to [`GuardedValue::try_set_since`].
    pub fn epoch(&self) -> u64 {
        self.lock().writes
    }

    /// Mark the control as held by the operator.
    pub fn hold(&self) {
        let mut inner = self.lock();
        inner.held = true;
        inner.writes += 1;
    }

    /// Hand the control back to background refreshes.
    pub fn release(&self) {
        self.lock().held = false;
    }

    /// Write on behalf of the operator, held or not.
    pub fn set(&self, value: T) {
        let mut inner = self.lock();
        inner.value = value;
        inner.writes += 1;
    }

    /// Background refresh. Does nothing while the control is held.
    /// Returns whether the value was written.
    pub fn try_set(&self, value: T) -> bool {
        let mut inner = self.lock();
        if inner.held {
            return false;
        }
        inner.value = value;
        true
    }

    /// Background refresh of a value read at `epoch`. Does nothing while the
    /// control is held or if the operator touched it since `epoch`.
    /// Returns whether the value was written.
    pub fn try_set_since(&self, epoch: u64, value: T) -> bool {
        let mut inner = self.lock();
        if inner.held || inner.writes != epoch {
            return false;
        }
        inner.value = value;
        true
    }
}

impl<T: Copy + Default> Default for GuardedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
