//! Documentation model produced by the decoder

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Documented fields keyed by name (marker prefix already stripped)
pub type Fields = BTreeMap<String, Field>;

/// A documentable unit: a library or one of its sub-libraries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub help: String,
    pub import: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub api: Fields,
    /// Sub-packages keyed by their declared name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sub: BTreeMap<String, Package>,
}

impl Package {
    /// Resolve a dotted path such as `core.v1.pod.new` through the API and
    /// nested objects
    pub fn lookup(&self, path: &str) -> Option<&Field> {
        let mut parts = path.split('.');
        let mut field = self.api.get(parts.next()?)?;
        for part in parts {
            match field {
                Field::Object(obj) => field = obj.fields.get(part)?,
                _ => return None,
            }
        }
        Some(field)
    }
}

/// One documented API member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Function(Function),
    Object(Object),
    Value(Value),
}

/// Discriminant of [`Field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Function,
    Object,
    Value,
}

impl FieldKind {
    /// Metadata key that selects this kind in annotated input
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Object => "object",
            Self::Value => "value",
        }
    }
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Object(o) => &o.name,
            Self::Value(v) => &v.name,
        }
    }

    pub fn help(&self) -> &str {
        match self {
            Self::Function(f) => &f.help,
            Self::Object(o) => &o.help,
            Self::Value(v) => &v.help,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Function(_) => FieldKind::Function,
            Self::Object(_) => FieldKind::Object,
            Self::Value(_) => FieldKind::Value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub help: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    /// Display-only default; never evaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// A documented namespace, possibly holding further objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub name: String,
    pub help: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: Fields,
}

impl Object {
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.fields.values().filter_map(|f| match f {
            Field::Function(func) => Some(func),
            _ => None,
        })
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.fields.values().filter_map(|f| match f {
            Field::Object(obj) => Some(obj),
            _ => None,
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values().filter_map(|f| match f {
            Field::Value(val) => Some(val),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub name: String,
    pub help: String,
    #[serde(rename = "type")]
    pub ty: Type,
    /// Display-only default; never evaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// Type tag of a value or argument. Not validated; unknown tags are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Type(String);

impl Type {
    pub const STRING: &'static str = "string";
    pub const NUMBER: &'static str = "number";
    pub const BOOLEAN: &'static str = "boolean";
    pub const OBJECT: &'static str = "object";
    pub const ARRAY: &'static str = "array";
    pub const ANY: &'static str = "any";
    pub const FUNCTION: &'static str = "function";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the tag is one of the well-known docsonnet types
    pub fn is_builtin(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::STRING
                | Self::NUMBER
                | Self::BOOLEAN
                | Self::OBJECT
                | Self::ARRAY
                | Self::ANY
                | Self::FUNCTION
        )
    }
}

impl From<&str> for Type {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
