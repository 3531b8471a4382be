//! Immutable old-name → new-name table shared by every file in a run.
//!
//! Built once at startup, either from the embedded ForestClaw 1.x → 2.x
//! table or from a user supplied JSON object, and passed by reference to
//! the rewrite engine. Never mutated after construction.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

const FORESTCLAW_1TO2: &str = include_str!("tables/forestclaw_1to2.json");

/// Label reported for the embedded table.
pub const BUILTIN_SOURCE: &str = "builtin:forestclaw-1to2";

#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    entries: HashMap<String, String>,
}

impl IdentifierMap {
    /// The embedded ForestClaw 1.x → 2.x rename table.
    pub fn builtin() -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(FORESTCLAW_1TO2)
            .map_err(|e| Error::internal_json(e.to_string(), Some(BUILTIN_SOURCE.to_string())))?;
        Self::from_entries(entries, BUILTIN_SOURCE)
    }

    /// Load a map from a JSON file containing a single object of string pairs.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config_missing_path("map", path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read map {}", path.display())))
        })?;

        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Parse a map from JSON text. `source` names the origin in error details.
    pub fn from_json_str(json: &str, source: &str) -> Result<Self> {
        let entries: HashMap<String, String> =
            serde_json::from_str(json).map_err(|e| Error::config_invalid_json(source, e))?;
        Self::from_entries(entries, source)
    }

    fn from_entries(entries: HashMap<String, String>, source: &str) -> Result<Self> {
        if entries.contains_key("") {
            return Err(Error::config_invalid_value(
                "map",
                Some(source.to_string()),
                "Identifier map contains an empty key",
            ));
        }

        log_status!("map", "Loaded {} entries from {}", entries.len(), source);
        Ok(Self { entries })
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn contains(&self, old: &str) -> bool {
        self.entries.contains_key(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys whose replacement is itself a key. A map with chains is not
    /// idempotent: a second pass would rewrite `a -> b` into `c`.
    pub fn chained_keys(&self) -> Vec<&str> {
        let mut chained: Vec<&str> = self
            .entries
            .iter()
            .filter(|(old, new)| old != new && self.entries.contains_key(new.as_str()))
            .map(|(old, _)| old.as_str())
            .collect();
        chained.sort_unstable();
        chained
    }
}

/// Incremental construction: a repeated key keeps the last value.
impl<K, V> FromIterator<(K, V)> for IdentifierMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
