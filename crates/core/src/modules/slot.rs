use std::sync::Arc;

use crate::binding::{KeyType, StoredValue};
use crate::modules::Deferred;
use crate::producers::ProduceError;
use crate::values::{Bindable, Value, ValueKind};

/// Accessor for one module field.
///
/// A slot reads and writes the field without the binder knowing its concrete type.
pub trait Slot: Send {
    fn key_type(&self) -> KeyType;

    fn kind(&self) -> ValueKind;

    /// Check if an injected value can be written into the field
    fn is_writable(&self) -> bool;

    /// Assign a value built by a producer.
    fn set_produced(&mut self, value: Value) -> Result<(), ProduceError>;

    /// A copy of the field's current value to store, memoized when `singleton` is set.
    ///
    /// `None` when the field has nothing to provide yet.
    fn snapshot(&self, singleton: bool) -> Option<StoredValue>;

    /// Copy a stored value into the field. Returns false if it could not be written.
    fn inject(&mut self, value: &StoredValue) -> bool;
}

fn store<T: Bindable>(value: &T, singleton: bool) -> StoredValue {
    let value = value.clone();
    Arc::new(if singleton { value.memoize() } else { value })
}

impl<T: Bindable> Slot for &mut T {
    fn key_type(&self) -> KeyType {
        KeyType::of::<T>()
    }

    fn kind(&self) -> ValueKind {
        T::kind()
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn set_produced(&mut self, value: Value) -> Result<(), ProduceError> {
        **self = T::from_value(value)?;
        Ok(())
    }

    fn snapshot(&self, singleton: bool) -> Option<StoredValue> {
        Some(store(&**self, singleton))
    }

    fn inject(&mut self, value: &StoredValue) -> bool {
        match value.downcast_ref::<T>() {
            Some(value) => {
                **self = value.clone();
                true
            }
            None => false,
        }
    }
}

impl<T: Bindable> Slot for &T {
    fn key_type(&self) -> KeyType {
        KeyType::of::<T>()
    }

    fn kind(&self) -> ValueKind {
        T::kind()
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn set_produced(&mut self, _value: Value) -> Result<(), ProduceError> {
        Err(ProduceError::ReadOnly)
    }

    fn snapshot(&self, singleton: bool) -> Option<StoredValue> {
        Some(store(*self, singleton))
    }

    fn inject(&mut self, _value: &StoredValue) -> bool {
        false
    }
}

impl<T: Bindable> Slot for Deferred<T> {
    fn key_type(&self) -> KeyType {
        KeyType::of::<T>()
    }

    fn kind(&self) -> ValueKind {
        T::kind()
    }

    fn is_writable(&self) -> bool {
        !self.is_set()
    }

    fn set_produced(&mut self, value: Value) -> Result<(), ProduceError> {
        self.set(T::from_value(value)?)
            .map_err(|_| ProduceError::ReadOnly)
    }

    fn snapshot(&self, singleton: bool) -> Option<StoredValue> {
        self.get().map(|value| store(value, singleton))
    }

    fn inject(&mut self, value: &StoredValue) -> bool {
        match value.downcast_ref::<T>() {
            Some(value) => self.set(value.clone()).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mut_ref_slot_copies_values() {
        let mut target = String::new();
        let mut slot = &mut target;
        assert!(slot.is_writable());
        assert_eq!(slot.key_type(), KeyType::of::<String>());

        let stored: StoredValue = Arc::new("value".to_string());
        assert!(slot.inject(&stored));
        slot.set_produced(Value::String("produced".into())).unwrap();
        let snapshot = slot.snapshot(false).unwrap();
        assert_eq!(
            snapshot.downcast_ref::<String>().map(String::as_str),
            Some("produced")
        );
        assert_eq!(target, "produced");
    }

    #[test]
    fn test_shared_ref_slot_is_read_only() {
        let source = 5u32;
        let mut slot = &source;
        assert!(!slot.is_writable());
        assert!(matches!(
            slot.set_produced(Value::Uint(1)),
            Err(ProduceError::ReadOnly)
        ));
        assert!(!slot.inject(&(Arc::new(1u32) as StoredValue)));
        assert!(slot.snapshot(false).is_some());
    }

    #[test]
    fn test_deferred_slot_fills_once() {
        let deferred = Deferred::<u16>::new();
        let mut slot = deferred.clone();
        assert!(slot.is_writable());
        assert!(slot.snapshot(false).is_none());

        assert!(slot.inject(&(Arc::new(7u16) as StoredValue)));
        assert_eq!(deferred.get(), Some(&7));
        assert!(!slot.is_writable());
        assert!(!slot.inject(&(Arc::new(8u16) as StoredValue)));
    }

    #[test]
    fn test_wrong_type_is_not_injected() {
        let mut target = 0i32;
        let mut slot = &mut target;
        assert!(!slot.inject(&(Arc::new("x".to_string()) as StoredValue)));
        assert_eq!(target, 0);
    }
}
