use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;

use crate::producers::ProduceError;
use crate::values::{Bindable, Value, ValueKind};

/// Wraps any deserializable type so it can be provided from a JSON or YAML document.
///
/// ```ignore
/// #[derive(Clone, Deserialize)]
/// struct Settings { port: u16 }
///
/// #[bind(provide, file = "settings.yaml")]
/// settings: Decoded<Settings>,
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded<T>(pub T);

impl<T> Decoded<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Decoded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Decoded<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> Bindable for Decoded<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn kind() -> ValueKind {
        ValueKind::Document
    }

    fn from_value(value: Value) -> Result<Self, ProduceError> {
        let document = match value {
            Value::Document(doc) => doc,
            other => other.into_json(),
        };
        serde_json::from_value(document)
            .map(Decoded)
            .map_err(|e| ProduceError::Parse {
                input: "document".to_string(),
                kind: Self::kind(),
                reason: e.to_string(),
            })
    }
}
