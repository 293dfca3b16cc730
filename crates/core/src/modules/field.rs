use std::fmt;

use crate::binding::KeyType;
use crate::modules::{parse_tag_value, Slot, Tag};
use crate::producers::{INJECT_TAG, PROVIDE_TAG, SINGLETON_OPTION};
use crate::values::ValueKind;

/// The binding role a field's tag declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Provide { name: String, options: Vec<String> },
    Inject { name: String },
    /// Tagged with both `provide` and `inject`
    Conflict,
    Untagged,
}

impl Role {
    /// Check if a provide role carries the `singleton` option
    pub fn is_singleton(&self) -> bool {
        match self {
            Role::Provide { options, .. } => options.iter().any(|o| o == SINGLETON_OPTION),
            _ => false,
        }
    }
}

/// Descriptor of one module field: its name, tag, and accessor.
pub struct Field<'a> {
    name: &'static str,
    tag: Tag,
    slot: Box<dyn Slot + 'a>,
}

impl<'a> Field<'a> {
    pub fn new<S: Slot + 'a>(name: &'static str, tag: Tag, slot: S) -> Self {
        Self {
            name,
            tag,
            slot: Box::new(slot),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn role(&self) -> Role {
        match (self.tag.get(PROVIDE_TAG), self.tag.get(INJECT_TAG)) {
            (Some(_), Some(_)) => Role::Conflict,
            (Some(value), None) => {
                let (name, options) = parse_tag_value(value);
                Role::Provide {
                    name: name.to_string(),
                    options: options.iter().map(String::from).collect(),
                }
            }
            (None, Some(value)) => Role::Inject {
                name: parse_tag_value(value).0.to_string(),
            },
            (None, None) => Role::Untagged,
        }
    }

    pub fn key_type(&self) -> KeyType {
        self.slot.key_type()
    }

    pub fn kind(&self) -> ValueKind {
        self.slot.kind()
    }

    pub fn is_writable(&self) -> bool {
        self.slot.is_writable()
    }

    /// Borrow the tag and the slot at the same time.
    pub fn split_mut(&mut self) -> (&Tag, &mut (dyn Slot + 'a)) {
        (&self.tag, &mut *self.slot)
    }

    pub fn into_slot(self) -> Box<dyn Slot + 'a> {
        self.slot
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag.to_string())
            .field("type", &self.slot.key_type().type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        let mut value = String::new();
        let field = Field::new("a", Tag::provide("name,singleton"), &mut value);
        let role = field.role();
        assert_eq!(
            role,
            Role::Provide {
                name: "name".to_string(),
                options: vec!["singleton".to_string()]
            }
        );
        assert!(role.is_singleton());

        let mut value = 0u8;
        let field = Field::new("b", Tag::inject(""), &mut value);
        assert_eq!(field.role(), Role::Inject { name: String::new() });
        assert_eq!(field.kind(), ValueKind::Uint { bits: 8 });

        let mut value = false;
        let tag = Tag::provide("").with(INJECT_TAG, "");
        assert_eq!(Field::new("c", tag, &mut value).role(), Role::Conflict);

        let mut value = false;
        let tag = Tag::new().with("literal", "true");
        assert_eq!(Field::new("d", tag, &mut value).role(), Role::Untagged);
    }
}
