//! Load a catalog from a TOML file

use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::data::Catalog;

/// Read and validate the catalog at `path`
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)?;
    let catalog = Catalog::from_toml_str(&content)?;
    tracing::info!(
        path = %path.display(),
        armor = catalog.armor.len(),
        decorations = catalog.decorations.len(),
        charms = catalog.charms.len(),
        activations = catalog.activations.len(),
        "Loaded catalog"
    );
    Ok(catalog)
}
