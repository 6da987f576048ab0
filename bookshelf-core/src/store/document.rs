//! On-disk library document and its schema migrations

use crate::error::StoreError;
use crate::types::{Book, Genre, Quote};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Newest document layout this crate writes
///
/// * 1 - books carry `summary`
/// * 2 - `summary` renamed to `synopsis`
pub const CURRENT_VERSION: u32 = 2;

/// Everything the store persists, as one document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LibraryDocument {
    pub version: u32,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

impl LibraryDocument {
    /// Parse a document of any known version
    pub fn from_json(data: &str) -> Result<Self, StoreError> {
        let raw: Value = serde_json::from_str(data)?;
        let migrated = migrate(raw)?;
        Ok(serde_json::from_value(migrated)?)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Upgrade a raw document to [`CURRENT_VERSION`]
pub fn migrate(mut raw: Value) -> Result<Value, StoreError> {
    let Some(doc) = raw.as_object_mut() else {
        return Ok(raw);
    };

    // documents written before versioning have no field at all
    let found = doc
        .get("version")
        .and_then(Value::as_u64)
        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX));
    if found > CURRENT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found,
            supported: CURRENT_VERSION,
        });
    }

    if found < 2 {
        if let Some(books) = doc.get_mut("books").and_then(Value::as_array_mut) {
            for book in books.iter_mut().filter_map(Value::as_object_mut) {
                let synopsis = book
                    .remove("summary")
                    .unwrap_or_else(|| Value::String(String::new()));
                book.entry("synopsis").or_insert(synopsis);
            }
        }
        tracing::info!("Migrated library document from version {} to 2", found);
    }

    doc.insert("version".to_string(), Value::from(CURRENT_VERSION));
    Ok(raw)
}
