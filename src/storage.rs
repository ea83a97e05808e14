use crate::error::{Result, StarListsError};
use crate::models::Mapping;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Loads and validates the mapping file.
pub fn read_mapping(path: &Path) -> Result<Mapping> {
    if !path.exists() {
        return Err(StarListsError::MappingNotFound(path.display().to_string()));
    }

    let contents = fs::read_to_string(path)?;
    let mapping = serde_json::from_str(&contents)
        .map_err(|e| StarListsError::InvalidMapping(format!("{}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "Loaded mapping file");
    Ok(mapping)
}

/// Writes `payload` as 2-space indented JSON with a trailing newline,
/// creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut contents = serde_json::to_string_pretty(payload)?;
    contents.push('\n');
    fs::write(path, contents)?;
    debug!(path = %path.display(), "Wrote JSON file");
    Ok(())
}
