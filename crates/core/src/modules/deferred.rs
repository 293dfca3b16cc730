use std::fmt;
use std::sync::{Arc, OnceLock};

/// A shared, write-once cell that is bound like a field of type `T`.
///
/// Clones observe the same cell. A provider can capture a clone in a closure before the
/// binder injects the value, and read it once the bind call has finished:
///
/// ```ignore
/// let store = self.store.clone();
/// self.client = Factory::new(move || Client::new(store.get().cloned()));
/// ```
pub struct Deferred<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> Deferred<T> {
    /// An empty cell
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// A cell that already holds `value`
    pub fn filled(value: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            cell: Arc::new(cell),
        }
    }

    /// The value, once some clone of this cell has been filled
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Fill the cell, handing `value` back if it was already filled.
    pub fn set(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Deferred").field(&self.cell.get()).finish()
    }
}
