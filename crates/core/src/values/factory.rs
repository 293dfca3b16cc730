use std::fmt;
use std::sync::Arc;

/// A cloneable zero-argument function value.
///
/// Clones share the same underlying function, so a factory provided once can be injected
/// into any number of fields.
pub struct Factory<T> {
    func: Arc<dyn Fn() -> T + Send + Sync>,
    memoized: bool,
}

impl<T> Factory<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            memoized: false,
        }
    }

    /// A factory whose function already caches its result.
    pub(crate) fn memoized<F>(func: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            memoized: true,
        }
    }

    pub fn call(&self) -> T {
        (self.func)()
    }

    /// Check if this factory runs its function at most once
    pub fn is_memoized(&self) -> bool {
        self.memoized
    }

    /// Check if both factories share the same function
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl<T: Clone + Send + Sync + 'static> Factory<T> {
    /// A factory that always returns a clone of `value`.
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone())
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
            memoized: self.memoized,
        }
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("returns", &std::any::type_name::<T>())
            .field("memoized", &self.memoized)
            .finish()
    }
}
