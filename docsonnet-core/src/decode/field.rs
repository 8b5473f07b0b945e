//! Field resolution: turns a field's metadata mapping into a typed [`Field`]

use super::{Diagnostic, DiagnosticKind, Walk};
use crate::document::{self, Argument, Field, FieldKind, Function, Object, Type};
use crate::error::DocError;
use crate::shape::{as_mapping, as_sequence, optional_str, required_str, KeyPath, Shape};
use serde_json::{Map, Value};
use tracing::{trace, warn};

impl Walk<'_> {
    /// Resolve the annotated `key` (field `name`) found in `parent` at
    /// `parent_path`. `parent` is needed to find an object's sibling data key.
    pub(super) fn resolve_field(
        &mut self,
        key: &str,
        name: &str,
        meta: &Value,
        parent: &Map<String, Value>,
        parent_path: &KeyPath,
        depth: usize,
    ) -> crate::Result<Field> {
        let path = parent_path.key(key);
        let meta = as_mapping(meta, &path)?;

        let field = if let Some(spec) = meta.get(FieldKind::Function.as_str()) {
            function(name, spec, meta, &path)?
        } else if let Some(spec) = meta.get(FieldKind::Object.as_str()) {
            self.object(name, spec, meta, &path, parent, parent_path, depth)?
        } else if let Some(spec) = meta.get(FieldKind::Value.as_str()) {
            value(name, spec, meta, &path)?
        } else {
            return Err(DocError::MissingFieldKind {
                name: name.to_string(),
                path: path.to_string(),
            });
        };

        trace!(name, kind = field.kind().as_str(), path = %path, "resolved field");
        Ok(field)
    }

    #[allow(clippy::too_many_arguments)]
    fn object(
        &mut self,
        name: &str,
        spec: &Value,
        meta: &Map<String, Value>,
        path: &KeyPath,
        parent: &Map<String, Value>,
        parent_path: &KeyPath,
        depth: usize,
    ) -> crate::Result<Field> {
        let spec_path = path.key(FieldKind::Object.as_str());
        let spec = as_mapping(spec, &spec_path)?;
        let help = help(spec, &spec_path, meta, path)?.ok_or_else(|| DocError::MalformedShape {
            path: spec_path.key("help").to_string(),
            expected: Shape::String,
            found: Shape::Absent,
        })?;

        let mut obj = Object {
            name: name.to_string(),
            help: help.to_string(),
            fields: document::Fields::new(),
        };

        // children live under the same name without the marker
        let Some(children) = parent.get(name) else {
            let siblings: Vec<&str> = parent.keys().map(String::as_str).collect();
            warn!(
                name,
                path = %path,
                siblings = %siblings.join(", "),
                "object has no sibling data key, documenting it without fields"
            );
            self.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::MissingObjectContent,
                name: name.to_string(),
                path: path.to_string(),
                message: format!("no `{}` key next to `{}`", name, path),
            });
            return Ok(Field::Object(obj));
        };

        let children_path = parent_path.key(name);
        let children = as_mapping(children, &children_path)?;
        obj.fields = self.object_fields(children, &children_path, depth + 1)?;

        Ok(Field::Object(obj))
    }
}

/// `help` from the kind payload, falling back to the shared one beside it
fn help<'a>(
    spec: &'a Map<String, Value>,
    spec_path: &KeyPath,
    meta: &'a Map<String, Value>,
    path: &KeyPath,
) -> crate::Result<Option<&'a str>> {
    match optional_str(spec, "help", spec_path)? {
        Some(help) => Ok(Some(help)),
        None => optional_str(meta, "help", path),
    }
}

fn function(name: &str, spec: &Value, meta: &Map<String, Value>, path: &KeyPath) -> crate::Result<Field> {
    let spec_path = path.key(FieldKind::Function.as_str());
    let spec = as_mapping(spec, &spec_path)?;

    let args = match spec.get("args") {
        Some(args) => arguments(args, &spec_path.key("args"))?,
        None => Vec::new(),
    };

    Ok(Field::Function(Function {
        name: name.to_string(),
        help: help(spec, &spec_path, meta, path)?.unwrap_or_default().to_string(),
        args,
    }))
}

fn arguments(args: &Value, path: &KeyPath) -> crate::Result<Vec<Argument>> {
    as_sequence(args, path)?
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg_path = path.index(i);
            let arg = as_mapping(arg, &arg_path)?;
            Ok(Argument {
                name: required_str(arg, "name", &arg_path)?.to_string(),
                ty: Type::new(required_str(arg, "type", &arg_path)?),
                default: arg.get("default").cloned(),
            })
        })
        .collect()
}

fn value(name: &str, spec: &Value, meta: &Map<String, Value>, path: &KeyPath) -> crate::Result<Field> {
    let spec_path = path.key(FieldKind::Value.as_str());
    let spec = as_mapping(spec, &spec_path)?;

    let Some(Value::String(ty)) = spec.get("type") else {
        return Err(DocError::MissingValueType {
            name: name.to_string(),
            path: spec_path.key("type").to_string(),
        });
    };

    Ok(Field::Value(document::Value {
        name: name.to_string(),
        help: help(spec, &spec_path, meta, path)?.unwrap_or_default().to_string(),
        ty: Type::new(ty.as_str()),
        default: spec.get("default").cloned(),
    }))
}
