use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::values::Factory;

/// Memoizes a [`Factory`] so it runs at most once.
///
/// The first caller computes the value; every caller, including ones racing the first,
/// receives a clone of that same cached result.
pub struct Singleton<T> {
    factory: Factory<T>,
    cell: OnceLock<T>,
}

impl<T: Clone + Send + Sync + 'static> Singleton<T> {
    /// Wrap `factory`; it is not called until the first [`get`](Self::get).
    pub fn new(factory: Factory<T>) -> Self {
        Self {
            factory,
            cell: OnceLock::new(),
        }
    }

    /// The shared instance, running the factory on first use.
    pub fn get(&self) -> T {
        self.cell.get_or_init(|| self.factory.call()).clone()
    }

    /// Whether the factory has already run.
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }

    /// A factory that shares this singleton's cached result.
    pub fn into_factory(self) -> Factory<T> {
        let shared = Arc::new(self);
        Factory::memoized(move || shared.get())
    }
}

impl<T> fmt::Debug for Singleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("type", &std::any::type_name::<T>())
            .field("computed", &self.cell.get().is_some())
            .finish()
    }
}
