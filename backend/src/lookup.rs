use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ConfigError;

/// Company name -> ticker table, loaded once and shared read-only
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SymbolLookup {
    entries: BTreeMap<String, String>,
}

impl SymbolLookup {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load a JSON object of `{ "name": "ticker" }` pairs
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Map a company name to its ticker; unknown input is treated as a ticker already
    pub fn resolve(&self, input: &str) -> String {
        let input = input.trim();
        self.entries
            .get(input)
            .cloned()
            .unwrap_or_else(|| input.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
