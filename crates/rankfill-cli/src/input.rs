//! JSON input loading.
//!
//! The input file is a JSON array of objects:
//!
//! ```json
//! [
//!   { "title": "Stalker", "year": 1979, "rank": 1042 },
//!   { "title": "Mirror", "year": 1975, "group_seq": 2 }
//! ]
//! ```
//!
//! `title` defaults to an empty string; `group_seq` and `rank` are optional.

use std::path::Path;

use anyhow::Context;
use rankfill_core::ItemSpec;
use tracing::debug;

/// Read and parse the item list at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// item objects.
pub fn load_specs(path: &Path) -> anyhow::Result<Vec<ItemSpec>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let specs =
        parse_specs(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), items = specs.len(), "input loaded");
    Ok(specs)
}

/// Parse an item list from JSON text.
///
/// # Errors
///
/// Returns an error if `content` is not a JSON array of item objects.
pub fn parse_specs(content: &str) -> anyhow::Result<Vec<ItemSpec>> {
    serde_json::from_str(content)
        .context("expected a JSON array of {title, year, group_seq?, rank?}")
}
