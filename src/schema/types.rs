//! Schema types

use serde::{Deserialize, Serialize, Serializer};

/// Coarse type tag of an inferred column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    String,
}

impl ColumnType {
    /// Tag as written to the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Date => "date",
            ColumnType::String => "string",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered mapping from column name to inferred type
///
/// Column names may repeat; lookups return the first match and the JSON form
/// keeps the last entry for a repeated name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeManifest {
    entries: Vec<(String, ColumnType)>,
}

impl TypeManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column entry
    pub fn insert(&mut self, name: impl Into<String>, column_type: ColumnType) {
        self.entries.push((name.into(), column_type));
    }

    /// Type of the first column with this name
    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }

    /// Entries in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), *t))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat `{column: type}` JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(n, t)| (n.clone(), serde_json::Value::String(t.as_str().to_string())))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for TypeManifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl FromIterator<(String, ColumnType)> for TypeManifest {
    fn from_iter<I: IntoIterator<Item = (String, ColumnType)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
