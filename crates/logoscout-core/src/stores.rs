use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Identity of one target storefront. Read-only input to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Unique short identifier, used in reports and CLI filters.
    pub id: String,
    /// Display name; matched against image alt text during scoring.
    pub name: String,
    /// Origin URL of the storefront homepage.
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<Store>,
}

/// Load and validate the store registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile = serde_yaml::from_str(&content)?;

    validate_stores(&stores_file)?;

    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    if stores_file.stores.is_empty() {
        return Err(ConfigError::Validation(
            "store registry must contain at least one store".to_string(),
        ));
    }

    let mut seen_ids = HashSet::new();

    for store in &stores_file.stores {
        if store.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store id must be non-empty".to_string(),
            ));
        }

        if !seen_ids.insert(store.id.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }

        if !store.base_url.starts_with("http://") && !store.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid base_url '{}'; must start with http:// or https://",
                store.id, store.base_url
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "stores_test.rs"]
mod tests;
