//! Local JSON files standing in for the backend.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use promo_overlap::{parse_list, StaticSource};
use serde::de::DeserializeOwned;

fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_list(&body).with_context(|| format!("Failed to parse file: {}", path.display()))
}

/// Read existing campaigns and products from disk up front.
///
/// Files are named by the caller, so a missing or malformed one is an error
/// rather than a source outage. Each existing-campaign file holds active and
/// pending records alike; all of them land in `active`.
pub fn load(existing: &[PathBuf], products: Option<&Path>) -> Result<StaticSource> {
    let mut active = Vec::new();
    for path in existing {
        active.extend(read_list(path)?);
    }
    let products = match products {
        Some(path) => read_list(path)?,
        None => Vec::new(),
    };

    Ok(StaticSource {
        active,
        pending: Vec::new(),
        products,
    })
}
