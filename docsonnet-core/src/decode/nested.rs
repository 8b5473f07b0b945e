//! Implicit objects: unannotated subtrees that contain annotated descendants

use super::Walk;
use crate::document::{Field, Fields, Object};
use crate::shape::KeyPath;
use serde_json::Value;
use tracing::debug;

impl Walk<'_> {
    /// Build an implicit object named `name` from `value` if anything below
    /// it is annotated. `Ok(None)` means plain data, which is not an error.
    pub(super) fn try_resolve_nested(
        &mut self,
        name: &str,
        value: &Value,
        path: &KeyPath,
        depth: usize,
    ) -> crate::Result<Option<Field>> {
        let Some(map) = value.as_object() else {
            return Ok(None);
        };
        self.enter(depth, path)?;

        let mut fields = Fields::new();
        let mut found = false;

        for (key, child) in map {
            if self.is_declaration(key) {
                continue;
            }

            if let Some(field_name) = self.annotated(key) {
                let field = self.resolve_field(key, field_name, child, map, path, depth)?;
                fields.insert(field_name.to_string(), field);
                found = true;
                continue;
            }

            if let Some(nested) = self.try_resolve_nested(key, child, &path.key(key), depth + 1)? {
                fields.entry(key.clone()).or_insert(nested);
                found = true;
            }
        }

        if !found {
            debug!(name, path = %path, "no annotated fields below, treating as data");
            return Ok(None);
        }

        Ok(Some(Field::Object(Object {
            name: name.to_string(),
            help: String::new(),
            fields,
        })))
    }
}
