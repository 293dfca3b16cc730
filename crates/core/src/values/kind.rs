use std::fmt;

/// Shape of a bindable value, used to dispatch value producers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Int { bits: u32 },
    Uint { bits: u32 },
    Float { bits: u32 },
    Sequence(Box<ValueKind>),
    /// A zero-argument function returning the inner kind
    Function(Box<ValueKind>),
    /// Structured data decoded from JSON or YAML
    Document,
    /// A type no producer knows how to build
    Opaque(&'static str),
}

impl ValueKind {
    pub fn sequence_of(element: ValueKind) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn function_returning(output: ValueKind) -> Self {
        Self::Function(Box::new(output))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Int { bits } => write!(f, "int{}", bits),
            Self::Uint { bits } => write!(f, "uint{}", bits),
            Self::Float { bits } => write!(f, "float{}", bits),
            Self::Sequence(element) => write!(f, "[{}]", element),
            Self::Function(output) => write!(f, "fn() -> {}", output),
            Self::Document => write!(f, "document"),
            Self::Opaque(name) => write!(f, "{}", name),
        }
    }
}

/// A value built by a producer, before conversion into the field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Sequence(Vec<Value>),
    Function(Box<Value>),
    Document(serde_json::Value),
}

impl Value {
    /// Short name of the variant, for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Sequence(_) => "sequence",
            Self::Function(_) => "function",
            Self::Document(_) => "document",
        }
    }

    /// Convert into a JSON document.
    ///
    /// Functions collapse to the value they return.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s),
            Self::Bool(b) => serde_json::Value::Bool(b),
            Self::Int(i) => serde_json::Value::from(i),
            Self::Uint(u) => serde_json::Value::from(u),
            Self::Float(f) => serde_json::Value::from(f),
            Self::Sequence(items) => {
                serde_json::Value::Array(items.into_iter().map(Value::into_json).collect())
            }
            Self::Function(output) => output.into_json(),
            Self::Document(doc) => doc,
        }
    }
}
