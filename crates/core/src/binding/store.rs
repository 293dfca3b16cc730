use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::binding::key::BindKey;

/// A bound value as held by the [`FieldStore`].
pub type StoredValue = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{key} already has a bound value")]
    Occupied { key: BindKey },
}

/// Thread-safe map from [`BindKey`] to the value bound under it.
///
/// Keys are written at most once and never removed.
#[derive(Default)]
pub struct FieldStore {
    entries: RwLock<HashMap<BindKey, StoredValue>>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `key`, rejecting a second write for the same key.
    pub fn set(&self, key: BindKey, value: StoredValue) -> Result<(), StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.entry(key) {
            Entry::Occupied(entry) => Err(StoreError::Occupied {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// The value bound to `key`, if any.
    pub fn get(&self, key: &BindKey) -> Option<StoredValue> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &BindKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldStore")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_distinguishes_missing_from_bound() {
        let store = FieldStore::new();
        let key = BindKey::named::<String>("greeting");
        assert!(store.get(&key).is_none());

        store.set(key.clone(), Arc::new("hello".to_string())).unwrap();
        let value = store.get(&key).expect("value should be bound");
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert!(store.contains(&key));
        assert!(!store.contains(&BindKey::of::<String>()));
    }

    #[test]
    fn test_second_write_is_rejected() {
        let store = FieldStore::new();
        let key = BindKey::of::<u32>();
        store.set(key.clone(), Arc::new(1u32)).unwrap();

        let err = store.set(key.clone(), Arc::new(2u32)).unwrap_err();
        assert!(matches!(err, StoreError::Occupied { key: ref k } if *k == key));
        let value = store.get(&key).unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let store = Arc::new(FieldStore::new());
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    let key = BindKey::named::<u32>(i.to_string());
                    store.set(key.clone(), Arc::new(i)).unwrap();
                    store.get(&key).and_then(|v| v.downcast_ref::<u32>().copied())
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Some(i as u32));
        }
        assert_eq!(store.len(), 8);
    }
}
