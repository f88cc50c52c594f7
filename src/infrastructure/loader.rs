//! Loading of hierarchy documents and region name lists.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;

/// Read and parse a hierarchy JSON document.
///
/// Only syntax is checked here; structure is validated by the builder.
#[instrument(level = "debug", skip(fs))]
pub fn load_hierarchy(fs: &dyn FileSystem, path: &Path) -> InfraResult<Value> {
    let text = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| InfraError::parse(format!("hierarchy {}", path.display()), e))?;
    debug!(bytes = text.len(), "hierarchy loaded");
    Ok(value)
}

/// Read region names, one per line.
///
/// Blank lines and lines starting with `#` are skipped. A JSON array of
/// strings is accepted as well.
#[instrument(level = "debug", skip(fs))]
pub fn load_region_names(fs: &dyn FileSystem, path: &Path) -> InfraResult<Vec<String>> {
    let text = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(&text)
            .map_err(|e| InfraError::parse(format!("regions {}", path.display()), e));
    }
    Ok(parse_region_lines(&text))
}

fn parse_region_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}
