//! Catalog photo records.

use serde::{Deserialize, Serialize};

/// A single photo offered by the catalog.
///
/// Serialized with the same field names the manifest exposes over HTTP
/// (`url`, `title`, `description`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Source URL of the large rendition.
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl PhotoRecord {
    /// Create a record with an empty title and description.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            description: String::new(),
        }
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this record can be assigned to a slot (has a source URL).
    pub fn is_eligible(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_requires_url() {
        assert!(PhotoRecord::new("https://live.staticflickr.com/1/a_b.jpg").is_eligible());
        assert!(!PhotoRecord::new("").is_eligible());
        assert!(!PhotoRecord::new("   ").is_eligible());
    }

    #[test]
    fn serializes_manifest_fields() {
        let record = PhotoRecord::new("https://example.com/a.jpg")
            .title("Sunset")
            .description("Over the bay");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://example.com/a.jpg",
                "title": "Sunset",
                "description": "Over the bay",
            })
        );
    }

    #[test]
    fn missing_text_fields_default_to_empty() {
        let record: PhotoRecord = serde_json::from_str(r#"{"url":"https://x/y.jpg"}"#).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.description, "");
    }
}
