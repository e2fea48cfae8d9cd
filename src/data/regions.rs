//! Valid region names
//!
//! Loaded once from a JSON file of the form `{ "regions": [...] }`.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct RegionsFile {
    #[serde(default)]
    regions: Vec<String>,
}

/// Set of region names accepted by the alert renderer
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    regions: HashSet<String>,
}

impl RegionCatalog {
    /// Read the catalog from `path`
    ///
    /// # Errors
    /// Returns `AppError::Config` if the file is missing or malformed
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "failed to read regions file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&raw).map_err(|e| {
            AppError::Config(format!(
                "failed to parse regions file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: RegionsFile = serde_json::from_str(raw)?;
        Ok(Self::from_names(file.regions))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact-match membership test
    pub fn contains(&self, region: &str) -> bool {
        self.regions.contains(region)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
