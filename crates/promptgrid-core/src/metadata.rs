//! Typed models for the off-chain metadata document.
//!
//! The registry stores only an opaque pointer to this document and never
//! fetches or interprets it. These models exist for the callers that do: the
//! display layer resolves the pointer (possibly through a content-addressed
//! gateway) and deserializes the JSON into `PromptMetadata` to render name,
//! description, images, and attributes.

use serde::{Deserialize, Serialize};

/// The metadata document a display layer resolves for one prompt token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptMetadata {
    /// Display name.
    pub name: String,

    /// Long-form description.
    pub description: String,

    /// Preview images. URLs may use a content-addressed scheme the caller
    /// resolves through a gateway.
    #[serde(default)]
    pub images: Vec<MetadataImage>,

    /// Free-form key/value attributes (model, version, style, ...).
    #[serde(default)]
    pub attributes: Vec<MetadataAttribute>,
}

impl PromptMetadata {
    /// Parses a metadata document from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the document back to JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One image reference inside a metadata document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataImage {
    /// Image URL, possibly content-addressed (`ipfs://...`).
    pub url: String,

    /// Pixel width.
    #[serde(default)]
    pub width: u32,

    /// Pixel height.
    #[serde(default)]
    pub height: u32,

    /// Optional content verification string (hash of the image bytes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<String>,
}

/// One key/value attribute inside a metadata document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataAttribute {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_roundtrip() {
        let doc = PromptMetadata {
            name: "Creative Writing".to_string(),
            description: "A poetic description of a futuristic city".to_string(),
            images: vec![MetadataImage {
                url: "ipfs://QmExample".to_string(),
                width: 1024,
                height: 768,
                verification: Some("0xabcdef".to_string()),
            }],
            attributes: vec![
                MetadataAttribute {
                    key: "Type".to_string(),
                    value: "text".to_string(),
                },
                MetadataAttribute {
                    key: "Model".to_string(),
                    value: "claude".to_string(),
                },
            ],
        };
        let json = doc.to_json().unwrap();
        let parsed = PromptMetadata::from_json(&json).unwrap();
        assert_eq!(doc, parsed);
    }

    #[test]
    fn metadata_tolerates_missing_lists() {
        let parsed =
            PromptMetadata::from_json(r#"{"name": "Minimal", "description": "No images"}"#)
                .unwrap();
        assert_eq!(parsed.name, "Minimal");
        assert!(parsed.images.is_empty());
        assert!(parsed.attributes.is_empty());
    }

    #[test]
    fn image_verification_omitted_when_absent() {
        let image = MetadataImage {
            url: "https://example.com/a.png".to_string(),
            width: 10,
            height: 10,
            verification: None,
        };
        let json = serde_json::to_string(&image).unwrap();
        assert!(!json.contains("verification"));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(PromptMetadata::from_json("not json").is_err());
    }
}
