use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use pkgrestore_store::{get_store_path, list_versions, store_package};

pub struct StoreHandler;

impl StoreHandler {
    pub fn handle_add(archive: &Path, name: &str, version: &str, store: Option<PathBuf>) -> Result<()> {
        let store = store.unwrap_or_else(get_store_path);
        let bytes = std::fs::read(archive)
            .with_context(|| format!("Failed to read archive {}", archive.display()))?;

        pkgrestore_logger::status(&format!("Storing {name} {version}..."));
        let path = store_package(&store, name, version, &bytes)
            .with_context(|| format!("Failed to store {name} {version}"))?;

        pkgrestore_logger::success(&format!("Stored {name} {version} at {}", path.display()));
        Ok(())
    }

    pub fn handle_list(name: &str, store: Option<PathBuf>) -> Result<()> {
        let store = store.unwrap_or_else(get_store_path);
        let mut versions = list_versions(&store, name)?;

        if versions.is_empty() {
            pkgrestore_logger::warn(&format!("No versions of {name} in {}", store.display()));
            return Ok(());
        }

        versions.sort();
        for version in versions {
            println!("{name} {version}");
        }
        Ok(())
    }

    pub fn handle_path() -> Result<()> {
        println!("{}", get_store_path().display());
        Ok(())
    }
}
