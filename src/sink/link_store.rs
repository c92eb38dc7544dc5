//! Product link store: rows of the discovery stage, read back for extraction

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use super::errors::{SinkError, SinkResult};

/// One row of the link store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRow {
    #[serde(rename = "Link")]
    pub link: String,
}

impl LinkRow {
    #[must_use]
    pub fn new(link: impl Into<String>) -> Self {
        Self { link: link.into() }
    }
}

/// Distinct links of the store, in first-occurrence order
///
/// A missing or empty store yields no links. Blank rows are ignored.
pub fn load_distinct(path: &Path) -> SinkResult<Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Link store {} does not exist", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(SinkError::io(path, e)),
    };

    let mut reader = csv::Reader::from_reader(file);
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut total = 0usize;

    for row in reader.deserialize::<LinkRow>() {
        let row = row.map_err(|e| SinkError::csv(path, e))?;
        let link = row.link.trim();
        if link.is_empty() {
            continue;
        }
        total += 1;
        if seen.insert(link.to_string()) {
            links.push(link.to_string());
        }
    }

    if links.is_empty() {
        warn!("Link store {} holds no links", path.display());
    } else {
        info!(
            "Loaded {} distinct link(s) from {} row(s) in {}",
            links.len(),
            total,
            path.display()
        );
    }
    Ok(links)
}

/// Empty a store so the next sink writes a fresh header
pub fn truncate(path: &Path) -> SinkResult<()> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| SinkError::io(path, e))?;
    info!("Truncated {}", path.display());
    Ok(())
}
