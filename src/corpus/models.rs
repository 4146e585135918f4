use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_NAME: &str = "Untitled Recipe";
pub const DEFAULT_INSTRUCTIONS: &str = "No instructions provided.";
/// Diet tag for recipes that do not declare one
pub const DEFAULT_DIET: &str = "mixed";
/// Time used for recipes without a usable time; larger than any real limit
pub const UNBOUNDED_TIME: u32 = u32::MAX;

/// A normalized recipe. All defaults are resolved when it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Position in the corpus
    pub id: usize,
    /// Identifier carried by a structured source, if any
    pub source_id: Option<i64>,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub image: String,
    pub diet: String,
    pub difficulty: Option<String>,
    /// Minutes
    pub time: Option<u32>,
}

impl Recipe {
    /// Space-joined ingredient text, the document the similarity index sees
    pub fn ingredient_text(&self) -> String {
        self.ingredients.join(" ")
    }

    /// Time in minutes, or [`UNBOUNDED_TIME`] when unknown
    pub fn time_or_unbounded(&self) -> u32 {
        self.time.unwrap_or(UNBOUNDED_TIME)
    }
}

/// Shape of the dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// One record from either source, field name to value.
///
/// Field names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into().trim().to_lowercase(), value);
    }

    /// First present, non-null value among `aliases`
    pub fn get(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find(|value| !value.is_null())
    }

    /// Whether any of `aliases` is present as a key, even with a null value
    pub fn has_field(&self, aliases: &[&str]) -> bool {
        aliases.iter().any(|alias| self.fields.contains_key(*alias))
    }

    /// Trimmed, non-empty text for the first matching alias
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        let text = match self.get(aliases)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = RawRecord::new();
        for (field, value) in map {
            record.insert(field, value);
        }
        record
    }
}
