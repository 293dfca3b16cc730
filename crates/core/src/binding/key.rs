use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The declared type half of a [`BindKey`].
#[derive(Debug, Clone, Copy)]
pub struct KeyType {
    type_id: TypeId,
    type_name: &'static str,
}

impl KeyType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for KeyType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for KeyType {}

impl Hash for KeyType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

/// Identity of a bound slot: a declared type plus an optional name.
///
/// Two fields of the same type with different names are different slots, which is how
/// several values of a common type (two strings, say) are told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindKey {
    ty: KeyType,
    name: String,
}

impl BindKey {
    /// Key for an unnamed value of type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_parts(KeyType::of::<T>(), String::new())
    }

    /// Key for a value of type `T` bound under `name`
    pub fn named<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::from_parts(KeyType::of::<T>(), name)
    }

    pub fn from_parts(ty: KeyType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    /// Check if this key matches a type and name without allocating
    pub fn matches_named<T: ?Sized + 'static>(&self, name: &str) -> bool {
        self.ty.type_id == TypeId::of::<T>() && self.name == name
    }

    pub fn key_type(&self) -> KeyType {
        self.ty
    }

    pub fn type_name(&self) -> &'static str {
        self.ty.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_named(&self) -> bool {
        !self.name.is_empty()
    }
}

/// `{alloc::string::String|database.host}` or `{my_app::Client}`
impl fmt::Display for BindKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_named() {
            write!(f, "{{{}|{}}}", self.ty.type_name, self.name)
        } else {
            write!(f, "{{{}}}", self.ty.type_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_structural() {
        assert_eq!(BindKey::of::<String>(), BindKey::named::<String>(""));
        assert_eq!(
            BindKey::named::<String>("host"),
            BindKey::from_parts(KeyType::of::<String>(), "host")
        );
        assert_ne!(BindKey::of::<String>(), BindKey::of::<u32>());
        assert_ne!(BindKey::named::<String>("a"), BindKey::named::<String>("b"));
    }

    #[test]
    fn test_keys_hash_by_type_and_name() {
        let mut keys = HashSet::new();
        keys.insert(BindKey::named::<String>("a"));
        keys.insert(BindKey::named::<String>("a"));
        keys.insert(BindKey::named::<String>("b"));
        keys.insert(BindKey::named::<u8>("a"));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(BindKey::of::<u32>().to_string(), "{u32}");
        assert_eq!(BindKey::named::<bool>("debug").to_string(), "{bool|debug}");
    }

    #[test]
    fn test_matches_named() {
        let key = BindKey::named::<u16>("port");
        assert!(key.matches_named::<u16>("port"));
        assert!(!key.matches_named::<u32>("port"));
        assert!(!key.matches_named::<u16>("other"));
        assert!(!BindKey::of::<u16>().is_named());
    }
}
