use std::path::PathBuf;
use std::sync::Arc;

use crate::binding::Singleton;
use crate::producers::ProduceError;
use crate::values::{Factory, Value, ValueKind};

/// A type that can be provided and injected by the binder.
///
/// Producers build a [`Value`] for the field's [`kind`](Bindable::kind), which
/// [`from_value`](Bindable::from_value) converts into `Self`. Types no producer can build,
/// such as service handles, only need an empty impl and are provided by assignment:
///
/// ```ignore
/// impl Bindable for MyService {}
/// ```
pub trait Bindable: Clone + Send + Sync + 'static {
    fn kind() -> ValueKind {
        ValueKind::Opaque(std::any::type_name::<Self>())
    }

    fn from_value(_value: Value) -> Result<Self, ProduceError> {
        Err(ProduceError::UnsupportedKind { kind: Self::kind() })
    }

    /// Hook applied to a value provided with the `singleton` option.
    ///
    /// Only function values change; everything else is returned as is.
    fn memoize(self) -> Self {
        self
    }
}

fn mismatch<T: Bindable>(value: &Value) -> ProduceError {
    ProduceError::Mismatch {
        expected: T::kind(),
        found: value.describe(),
    }
}

fn decode<T: Bindable + serde::de::DeserializeOwned>(
    doc: serde_json::Value,
) -> Result<T, ProduceError> {
    serde_json::from_value(doc.clone()).map_err(|e| ProduceError::Parse {
        input: doc.to_string(),
        kind: T::kind(),
        reason: e.to_string(),
    })
}

impl Bindable for String {
    fn kind() -> ValueKind {
        ValueKind::String
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Document(serde_json::Value::String(s)) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bindable for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Document(serde_json::Value::Bool(b)) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

macro_rules! impl_bindable_integer {
    ($variant:ident => $($t:ty),+) => {
        $(
            impl Bindable for $t {
                fn kind() -> ValueKind {
                    ValueKind::$variant { bits: <$t>::BITS }
                }

                fn from_value(value: Value) -> Result<Self, ProduceError> {
                    let out_of_range = |v: String| ProduceError::OutOfRange {
                        value: v,
                        kind: Self::kind(),
                    };
                    match value {
                        Value::Int(i) => <$t>::try_from(i).map_err(|_| out_of_range(i.to_string())),
                        Value::Uint(u) => <$t>::try_from(u).map_err(|_| out_of_range(u.to_string())),
                        Value::Document(doc) => decode(doc),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }
            }
        )+
    };
}

impl_bindable_integer!(Int => i8, i16, i32, i64, isize);
impl_bindable_integer!(Uint => u8, u16, u32, u64, usize);

impl Bindable for f64 {
    fn kind() -> ValueKind {
        ValueKind::Float { bits: 64 }
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::Uint(u) => Ok(u as f64),
            Value::Document(doc) => decode(doc),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Bindable for f32 {
    fn kind() -> ValueKind {
        ValueKind::Float { bits: 32 }
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        let wide = f64::from_value(value).map_err(|e| match e {
            ProduceError::Mismatch { found, .. } => ProduceError::Mismatch {
                expected: Self::kind(),
                found,
            },
            other => other,
        })?;
        if wide.is_finite() && wide.abs() > f32::MAX as f64 {
            return Err(ProduceError::OutOfRange {
                value: wide.to_string(),
                kind: Self::kind(),
            });
        }
        Ok(wide as f32)
    }
}

impl Bindable for PathBuf {
    fn kind() -> ValueKind {
        ValueKind::String
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        String::from_value(value).map(PathBuf::from)
    }
}

impl Bindable for serde_json::Value {
    fn kind() -> ValueKind {
        ValueKind::Document
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        Ok(value.into_json())
    }
}

impl<T: Bindable> Bindable for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::sequence_of(T::kind())
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        match value {
            Value::Sequence(items) => items.into_iter().map(T::from_value).collect(),
            Value::Document(serde_json::Value::Array(items)) => items
                .into_iter()
                .map(|item| T::from_value(Value::Document(item)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<T: Bindable> Bindable for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        T::from_value(value).map(Some)
    }

    fn memoize(self) -> Self {
        self.map(T::memoize)
    }
}

impl<T: ?Sized + Send + Sync + 'static> Bindable for Arc<T> {}

impl<T: Bindable> Bindable for Factory<T> {
    fn kind() -> ValueKind {
        ValueKind::function_returning(T::kind())
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        match value {
            Value::Function(output) => T::from_value(*output).map(Factory::constant),
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn memoize(self) -> Self {
        if self.is_memoized() {
            return self;
        }
        Singleton::new(self).into_factory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_integer_range_checks() {
        assert_eq!(i8::from_value(Value::Int(-128)).unwrap(), -128);
        assert!(matches!(
            i8::from_value(Value::Int(128)),
            Err(ProduceError::OutOfRange { .. })
        ));
        assert!(matches!(
            u16::from_value(Value::Int(-1)),
            Err(ProduceError::OutOfRange { .. })
        ));
        assert_eq!(u64::from_value(Value::Uint(u64::MAX)).unwrap(), u64::MAX);
        assert_eq!(u32::kind(), ValueKind::Uint { bits: 32 });
    }

    #[test]
    fn test_mismatched_value_is_rejected() {
        let err = bool::from_value(Value::String("yes".into())).unwrap_err();
        assert!(matches!(
            err,
            ProduceError::Mismatch {
                expected: ValueKind::Bool,
                found: "string"
            }
        ));
    }

    #[test]
    fn test_sequences_and_documents() {
        let parsed = Vec::<u8>::from_value(Value::Sequence(vec![Value::Uint(1), Value::Int(2)]));
        assert_eq!(parsed.unwrap(), vec![1, 2]);

        let decoded = Vec::<String>::from_value(Value::Document(serde_json::json!(["a", "b"])));
        assert_eq!(decoded.unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_opaque_types_are_unsupported() {
        #[derive(Clone)]
        struct Handle;
        impl Bindable for Handle {}

        assert!(matches!(Handle::kind(), ValueKind::Opaque(_)));
        assert!(matches!(
            Handle::from_value(Value::String("x".into())),
            Err(ProduceError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_memoize_only_changes_factories() {
        assert_eq!("plain".to_string().memoize(), "plain");

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let factory = Factory::new(move || counter.fetch_add(1, Ordering::SeqCst));
        let memoized = Some(factory).memoize().unwrap();
        assert!(memoized.is_memoized());
        assert_eq!(memoized.call(), 0);
        assert_eq!(memoized.clone().call(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_function_from_literal() {
        let factory = Factory::<String>::from_value(Value::Function(Box::new(Value::String(
            "hi".into(),
        ))))
        .unwrap();
        assert_eq!(factory.call(), "hi");
        assert_eq!(factory.call(), "hi");
    }
}
