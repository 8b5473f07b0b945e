//! Package declaration extraction

use crate::document::Package;
use crate::error::DocError;
use crate::shape::{as_mapping, required_str, KeyPath};
use serde_json::{Map, Value};

/// Seed a [`Package`] from the reserved declaration key of a package-scoped
/// mapping. `api` and `sub` are left empty for the walker to fill.
pub(crate) fn extract(map: &Map<String, Value>, marker: &str, path: &KeyPath) -> crate::Result<Package> {
    let decl = map.get(marker).ok_or_else(|| DocError::MissingPackage {
        path: path.to_string(),
    })?;

    let decl_path = path.key(marker);
    let decl = as_mapping(decl, &decl_path)?;

    Ok(Package {
        name: required_str(decl, "name", &decl_path)?.to_string(),
        help: required_str(decl, "help", &decl_path)?.to_string(),
        import: required_str(decl, "import", &decl_path)?.to_string(),
        ..Package::default()
    })
}
