//! Flat JSON files in the results directory.
//!
//! Every write replaces the whole file; there is no history and no locking,
//! so concurrent writers resolve last-writer-wins.

use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Write `value` as 2-space-indented JSON, creating parent directories.
pub fn write_json_pretty<T: Serialize>(value: &T, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    tracing::info!("Saved {}", path.display());
    Ok(path.to_path_buf())
}

pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    if !path.is_file() {
        return Err(Error::NotFound(format!("{} does not exist", path.display())));
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Resolve a caller-supplied file name inside `base`.
///
/// Only a single normal path component is accepted.
pub fn resolve_in(base: &Path, filename: &str) -> Result<PathBuf> {
    let candidate = Path::new(filename);
    let mut components = candidate.components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None)
            if !filename.contains('/') && !filename.contains('\\') =>
        {
            Ok(base.join(name))
        }
        _ => Err(Error::Validation(format!(
            "invalid file name '{}': expected a bare file name",
            filename
        ))),
    }
}
