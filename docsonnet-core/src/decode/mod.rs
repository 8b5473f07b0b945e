//! Decoding of annotated evaluator output into a [`Package`]
//!
//! Input convention, with `#` as the default marker:
//!
//! - `"#"` at package scope declares `{name, help, import}`.
//! - `"#foo"` holds metadata for the field `foo`: one of
//!   `{function: {..}}`, `{object: {..}}` or `{value: {..}}`.
//! - `"foo"` next to `"#foo"` holds the actual data. For objects that is
//!   where the children live.
//! - A plain key whose mapping contains `"#"` is a sub-package.
//! - Plain keys without any of the above are searched for annotated
//!   descendants and become implicit objects if any are found.
//!
//! When both `"#foo"` and `"foo"` would produce an entry for `foo`, the
//! annotated one wins whichever is visited first: annotated writes always
//! overwrite, inferred writes only fill an empty slot.

mod field;
mod nested;
mod package;

use crate::config::{Config, DecodeConfig};
use crate::document::{Fields, Package};
use crate::error::DocError;
use crate::shape::{as_mapping, KeyPath};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Non-fatal condition noticed while decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Field the diagnostic is about
    pub name: String,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An `object` field had no sibling data key; decoded with no fields
    MissingObjectContent,
}

/// Decoded package plus everything noticed along the way
#[derive(Debug, Clone)]
pub struct Report {
    pub package: Package,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decoder for docsonnet-annotated trees
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.decode.clone())
    }

    /// Decode `root` into a package tree
    pub fn decode(&self, root: &Value) -> crate::Result<Package> {
        self.decode_report(root).map(|report| report.package)
    }

    /// Decode `root`, also returning the diagnostics collected on the way
    pub fn decode_report(&self, root: &Value) -> crate::Result<Report> {
        let mut walk = Walk {
            marker: &self.config.marker,
            max_depth: self.config.max_depth,
            diagnostics: Vec::new(),
        };
        let package = walk.package(root, &KeyPath::root(), 0)?;

        Ok(Report {
            package,
            diagnostics: walk.diagnostics,
        })
    }
}

/// Decode `root` with the default configuration
pub fn decode(root: &Value) -> crate::Result<Package> {
    Decoder::default().decode(root)
}

/// Parse evaluator output given as JSON text and decode it
pub fn decode_str(json: &str) -> crate::Result<Package> {
    let root: Value = serde_json::from_str(json)?;
    decode(&root)
}

/// State of a single decode call
pub(crate) struct Walk<'a> {
    marker: &'a str,
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Walk<'_> {
    /// Guard entering a mapping `depth` levels below the root
    fn enter(&self, depth: usize, path: &KeyPath) -> crate::Result<()> {
        if depth > self.max_depth {
            return Err(DocError::DepthExceeded {
                limit: self.max_depth,
                path: path.to_string(),
            });
        }
        Ok(())
    }

    /// Field name of an annotated key, `None` for plain keys
    fn annotated<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.marker)
    }

    fn is_declaration(&self, key: &str) -> bool {
        key == self.marker
    }

    fn package(&mut self, value: &Value, path: &KeyPath, depth: usize) -> crate::Result<Package> {
        self.enter(depth, path)?;
        let map = as_mapping(value, path)?;
        let mut pkg = package::extract(map, self.marker, path)?;

        for (key, value) in map {
            if self.is_declaration(key) {
                continue;
            }

            if let Some(name) = self.annotated(key) {
                let field = self.resolve_field(key, name, value, map, path, depth)?;
                pkg.api.insert(name.to_string(), field);
                continue;
            }

            let key_path = path.key(key);

            if value
                .as_object()
                .is_some_and(|child| child.contains_key(self.marker))
            {
                let sub = self.package(value, &key_path, depth + 1)?;
                debug!(key = %key, name = %sub.name, path = %key_path, "found sub-package");
                pkg.sub.insert(sub.name.clone(), sub);
                continue;
            }

            if let Some(nested) = self.try_resolve_nested(key, value, &key_path, depth + 1)? {
                pkg.api.entry(key.clone()).or_insert(nested);
            }
        }

        Ok(pkg)
    }

    /// Walk the data mapping holding an object's children. Same rules as
    /// package scope, minus the declaration and sub-packages.
    fn object_fields(
        &mut self,
        children: &Map<String, Value>,
        path: &KeyPath,
        depth: usize,
    ) -> crate::Result<Fields> {
        self.enter(depth, path)?;
        let mut fields = Fields::new();

        for (key, value) in children {
            if self.is_declaration(key) {
                continue;
            }

            if let Some(name) = self.annotated(key) {
                let field = self.resolve_field(key, name, value, children, path, depth)?;
                fields.insert(name.to_string(), field);
                continue;
            }

            if let Some(nested) = self.try_resolve_nested(key, value, &path.key(key), depth + 1)? {
                fields.entry(key.clone()).or_insert(nested);
            }
        }

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Field, FieldKind};
    use serde_json::json;

    fn decl(name: &str) -> Value {
        json!({ "name": name, "help": "", "import": format!("{name}.libsonnet") })
    }

    #[test]
    fn test_annotated_overwrites_inferred_nested() {
        // plain key first, so the inferred object is written before the annotation
        let root = json!({
            "#": decl("k"),
            "foo": { "#bar": { "value": { "type": "string" } } },
            "#foo": { "value": { "type": "number", "help": "explicit" } },
        });
        let pkg = decode(&root).unwrap();
        let foo = &pkg.api["foo"];
        assert_eq!(foo.kind(), FieldKind::Value);
        assert_eq!(foo.help(), "explicit");
    }

    #[test]
    fn test_inferred_nested_does_not_replace_annotated() {
        let root = json!({
            "#": decl("k"),
            "#foo": { "value": { "type": "number", "help": "explicit" } },
            "foo": { "#bar": { "value": { "type": "string" } } },
        });
        let pkg = decode(&root).unwrap();
        assert_eq!(pkg.api["foo"].kind(), FieldKind::Value);
        assert_eq!(pkg.api.len(), 1);
    }

    #[test]
    fn test_sub_package_keyed_by_declared_name() {
        let root = json!({
            "#": decl("root"),
            "outer": { "#": decl("inner"), "#x": { "value": { "type": "any" } } },
        });
        let pkg = decode(&root).unwrap();
        assert!(pkg.sub.get("outer").is_none());
        let inner = &pkg.sub["inner"];
        assert_eq!(inner.import, "inner.libsonnet");
        assert!(inner.api.contains_key("x"));
        assert!(!pkg.api.contains_key("outer"));
    }

    #[test]
    fn test_plain_data_ignored() {
        let root = json!({
            "#": decl("k"),
            "version": "1.0",
            "list": [{ "#x": 1 }],
            "data": { "a": { "b": 1 } },
        });
        let pkg = decode(&root).unwrap();
        assert!(pkg.api.is_empty());
        assert!(pkg.sub.is_empty());
    }

    #[test]
    fn test_object_scope_applies_precedence() {
        let root = json!({
            "#": decl("k"),
            "#obj": { "object": { "help": "container" } },
            "obj": {
                "inner": { "#leaf": { "value": { "type": "string" } } },
                "#inner": { "function": { "help": "explicit" } },
            },
        });
        let pkg = decode(&root).unwrap();
        let Some(Field::Object(obj)) = pkg.api.get("obj") else {
            panic!("obj should be an object");
        };
        assert_eq!(obj.fields["inner"].kind(), FieldKind::Function);
    }

    #[test]
    fn test_depth_limit() {
        let root = json!({
            "#": decl("k"),
            "a": { "b": { "c": { "#d": { "value": { "type": "string" } } } } },
        });
        let shallow = Decoder::new(DecodeConfig {
            max_depth: 2,
            ..DecodeConfig::default()
        });
        let err = shallow.decode(&root).unwrap_err();
        assert!(matches!(err, DocError::DepthExceeded { limit: 2, .. }));
        assert_eq!(err.path(), Some("$.a.b.c"));

        let deep_enough = Decoder::new(DecodeConfig {
            max_depth: 3,
            ..DecodeConfig::default()
        });
        assert!(deep_enough.decode(&root).unwrap().lookup("a.b.c.d").is_some());
    }

    #[test]
    fn test_custom_marker() {
        let root = json!({
            "@": decl("k"),
            "@foo": { "value": { "type": "string" } },
            "#bar": "plain data under another marker",
        });
        let decoder = Decoder::new(DecodeConfig {
            marker: "@".to_string(),
            ..DecodeConfig::default()
        });
        let pkg = decoder.decode(&root).unwrap();
        assert_eq!(pkg.api.keys().collect::<Vec<_>>(), ["foo"]);
    }

    #[test]
    fn test_decode_str_rejects_invalid_json() {
        assert!(matches!(
            decode_str("{ not json"),
            Err(DocError::Serialization(_))
        ));
        assert_eq!(decode_str(r##"{"#": {"name": "k", "help": "", "import": ""}}"##).unwrap().name, "k");
    }
}
