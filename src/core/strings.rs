use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{DirectiveError, Result};

/// Resolves a symbolic message key to the label currently shown in the UI.
pub trait StringLookup: Send + Sync {
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Static key to label table.
///
/// Deserialized entries are laid over [`StringTable::default`], so a partial
/// table only overrides the keys it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::empty().with_string("savechanges", "Save changes")
    }
}

impl From<HashMap<String, String>> for StringTable {
    fn from(entries: HashMap<String, String>) -> Self {
        let mut table = Self::default();
        table.entries.extend(entries);
        table
    }
}

impl From<StringTable> for HashMap<String, String> {
    fn from(table: StringTable) -> Self {
        table.entries
    }
}

impl StringLookup for StringTable {
    fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| DirectiveError::MissingString(key.to_string()))
    }
}
