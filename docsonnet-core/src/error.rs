//! Error types for docsonnet decoding

use crate::shape::Shape;

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("Package declaration missing at {path}")]
    MissingPackage { path: String },

    #[error("Field {name} at {path} lacking {{function | object | value}}")]
    MissingFieldKind { name: String, path: String },

    #[error("Value {name} at {path} lacking type information")]
    MissingValueType { name: String, path: String },

    #[error("Malformed shape at {path}: expected {expected}, found {found}")]
    MalformedShape {
        path: String,
        expected: Shape,
        found: Shape,
    },

    #[error("Nesting deeper than {limit} levels at {path}")]
    DepthExceeded { limit: usize, path: String },

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocError {
    /// Location in the input where decoding failed, if the error has one
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingPackage { path }
            | Self::MissingFieldKind { path, .. }
            | Self::MissingValueType { path, .. }
            | Self::MalformedShape { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
            Self::ConfigParse(_) | Self::Io(_) | Self::Serialization(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_shape_message() {
        let err = DocError::MalformedShape {
            path: "$.#foo.value.type".to_string(),
            expected: Shape::String,
            found: Shape::Number,
        };
        assert_eq!(
            err.to_string(),
            "Malformed shape at $.#foo.value.type: expected string, found number"
        );
        assert_eq!(err.path(), Some("$.#foo.value.type"));
    }

    #[test]
    fn test_missing_field_kind_names_field() {
        let err = DocError::MissingFieldKind {
            name: "foo".to_string(),
            path: "$.#foo".to_string(),
        };
        assert!(err.to_string().contains("foo"));
        assert!(err.to_string().contains("{function | object | value}"));
    }

    #[test]
    fn test_config_error_has_no_path() {
        assert_eq!(DocError::ConfigParse("bad".to_string()).path(), None);
    }
}
