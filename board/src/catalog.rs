//! Read-only monster catalog.
//!
//! Entries are `{name, statBlock, imageUrl}`. The stat block is opaque to the
//! engine; it is carried on creature tokens as `details` and only surfaced by
//! the detail view after the reveal step.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::image::ImageRef;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog must be an array or an object with a `creatures` array")]
    Shape,
    #[error("catalog entry {index} is not an object")]
    NotAnObject { index: usize },
    #[error("catalog entry {index} has no name")]
    MissingName { index: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub name: String,
    pub stat_block: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CatalogEntry {
    /// Lift one JSON record into an entry.
    ///
    /// `imageUrl` may sit at the top level or under `flavor`; without a
    /// `statBlock` key the whole record is the stat block.
    fn from_value(index: usize, value: Value) -> Result<Self, CatalogError> {
        let Value::Object(map) = value else {
            return Err(CatalogError::NotAnObject { index });
        };
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CatalogError::MissingName { index })?
            .to_string();
        let image_url = map
            .get("imageUrl")
            .or_else(|| map.get("flavor").and_then(|f| f.get("imageUrl")))
            .and_then(Value::as_str)
            .map(str::to_string);
        let stat_block = match map.get("statBlock") {
            Some(block) => block.clone(),
            None => Value::Object(map),
        };
        Ok(Self { name, stat_block, image_url })
    }

    /// Portrait handle, when the catalog supplies a non-blank URL.
    #[must_use]
    pub fn image(&self) -> Option<ImageRef> {
        self.image_url.as_deref().and_then(ImageRef::new)
    }

    /// Experience value shown as "sim points" in the reveal view.
    #[must_use]
    pub fn sim_points(&self) -> Option<i64> {
        self.stat_block.get("xp").and_then(Value::as_i64)
    }
}

/// Ordered list of catalog entries.
#[derive(Debug, Clone, Default)]
pub struct MonsterCatalog {
    entries: Vec<Arc<CatalogEntry>>,
}

impl MonsterCatalog {
    /// Parse a catalog document: either a bare array of entries or an object
    /// with a `creatures` array.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(text)?;
        let items = match root {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("creatures") {
                Some(Value::Array(items)) => items,
                _ => return Err(CatalogError::Shape),
            },
            _ => return Err(CatalogError::Shape),
        };
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, value)| CatalogEntry::from_value(index, value).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(entries = entries.len(), "monster catalog loaded");
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arc<CatalogEntry>> {
        self.entries.get(index)
    }

    /// First entry whose name matches, ignoring ASCII case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<CatalogEntry>> {
        let name = name.trim();
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
