//! Shape inspection over untyped evaluator output
//!
//! The decoder never casts blindly: every lookup goes through one of the
//! helpers here, which either hand back the expected shape or fail with
//! [`DocError::MalformedShape`] naming what was expected, what was found
//! and where.

use crate::error::DocError;
use serde_json::{Map, Value};
use std::fmt;

/// Shape of a value in the untyped input tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Null,
    Boolean,
    Number,
    String,
    Sequence,
    Mapping,
    /// The key was not present at all
    Absent,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Sequence,
            Value::Object(_) => Self::Mapping,
        }
    }

    pub fn of_opt(value: Option<&Value>) -> Self {
        value.map_or(Self::Absent, Self::of)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value relative to the decode root, rendered as `$.a.#b[0]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(Vec<Segment>);

impl KeyPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the entry `key` inside the mapping at `self`
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Self(segments)
    }

    /// Path of element `index` inside the sequence at `self`
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

fn malformed(path: &KeyPath, expected: Shape, found: Shape) -> DocError {
    DocError::MalformedShape {
        path: path.to_string(),
        expected,
        found,
    }
}

pub(crate) fn as_mapping<'a>(value: &'a Value, path: &KeyPath) -> crate::Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| malformed(path, Shape::Mapping, Shape::of(value)))
}

pub(crate) fn as_sequence<'a>(value: &'a Value, path: &KeyPath) -> crate::Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| malformed(path, Shape::Sequence, Shape::of(value)))
}

/// `map[key]` as a string; absence is an error
pub(crate) fn required_str<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &KeyPath,
) -> crate::Result<&'a str> {
    optional_str(map, key, path)?
        .ok_or_else(|| malformed(&path.key(key), Shape::String, Shape::Absent))
}

/// `map[key]` as a string when present; present with another shape is an error
pub(crate) fn optional_str<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &KeyPath,
) -> crate::Result<Option<&'a str>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(malformed(&path.key(key), Shape::String, Shape::of(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_of() {
        assert_eq!(Shape::of(&json!(null)), Shape::Null);
        assert_eq!(Shape::of(&json!(true)), Shape::Boolean);
        assert_eq!(Shape::of(&json!(1.5)), Shape::Number);
        assert_eq!(Shape::of(&json!("x")), Shape::String);
        assert_eq!(Shape::of(&json!([1])), Shape::Sequence);
        assert_eq!(Shape::of(&json!({})), Shape::Mapping);
        assert_eq!(Shape::of_opt(None), Shape::Absent);
    }

    #[test]
    fn test_key_path_display() {
        let path = KeyPath::root().key("#fn").key("function").key("args").index(2);
        assert_eq!(path.to_string(), "$.#fn.function.args[2]");
        assert_eq!(KeyPath::root().to_string(), "$");
    }

    #[test]
    fn test_required_str_absent() {
        let map = json!({ "name": "k" });
        let map = map.as_object().unwrap();
        let err = required_str(map, "help", &KeyPath::root().key("#")).unwrap_err();
        match err {
            DocError::MalformedShape {
                path,
                expected,
                found,
            } => {
                assert_eq!(path, "$.#.help");
                assert_eq!(expected, Shape::String);
                assert_eq!(found, Shape::Absent);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optional_str_wrong_shape() {
        let map = json!({ "help": 42 });
        let map = map.as_object().unwrap();
        assert!(optional_str(map, "missing", &KeyPath::root()).unwrap().is_none());
        assert!(matches!(
            optional_str(map, "help", &KeyPath::root()),
            Err(DocError::MalformedShape {
                found: Shape::Number,
                ..
            })
        ));
    }

    #[test]
    fn test_as_mapping_rejects_sequence() {
        let value = json!([1, 2]);
        let err = as_mapping(&value, &KeyPath::root().key("foo")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed shape at $.foo: expected mapping, found sequence"
        );
        assert_eq!(as_sequence(&value, &KeyPath::root()).unwrap().len(), 2);
    }
}
