//! Entity and collection shapes returned by the Delivery API.
//!
//! Entry and asset `fields` are kept as raw [`serde_json::Value`]: their shape
//! is content-model dependent and the resolver rewrites them structurally.
//! Envelope and system metadata are typed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// System metadata attached to every entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    pub id: String,
    /// Entity kind: "Entry", "Asset", "DeletedEntry", ...
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    /// Present in single-locale responses, absent in all-locales mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// A reference marker standing in for another entity.
///
/// On the wire: `{ "sys": { "type": "Link", "linkType": <kind>, "id": <id> } }`.
/// Identity is the `(link_type, id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub link_type: String,
    pub id: String,
}

impl Link {
    pub fn new(link_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            link_type: link_type.into(),
            id: id.into(),
        }
    }

    /// Parse a marker from a raw field value, if it is one.
    pub fn from_value(value: &Value) -> Option<Self> {
        let sys = value.get("sys")?;
        if sys.get("type")?.as_str()? != "Link" {
            return None;
        }
        Some(Self {
            link_type: sys.get("linkType")?.as_str()?.to_string(),
            id: sys.get("id")?.as_str()?.to_string(),
        })
    }

    /// Render the marker back to its wire shape.
    pub fn to_value(&self) -> Value {
        json!({
            "sys": {
                "type": "Link",
                "linkType": self.link_type,
                "id": self.id,
            }
        })
    }
}

/// Envelope for entry and asset query responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCollection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sys: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes: Option<Value>,
}

/// Space metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub sys: Sys,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<Locale>,
}

/// A locale configured for an environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_code: Option<String>,
}

/// A content type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    pub sys: Sys,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    #[serde(default)]
    pub fields: Vec<ContentTypeField>,
}

/// A single field definition within a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeField {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub required: bool,
}

/// Envelope for content type listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeCollection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default)]
    pub items: Vec<ContentType>,
}

/// Envelope for locale listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleCollection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default)]
    pub items: Vec<Locale>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_from_value() {
        let raw = json!({
            "sys": { "type": "Link", "linkType": "Entry", "id": "e1" }
        });
        let link = Link::from_value(&raw).unwrap();
        assert_eq!(link, Link::new("Entry", "e1"));
    }

    #[test]
    fn test_link_rejects_non_markers() {
        // A full entry is not a marker
        let entry = json!({
            "sys": { "type": "Entry", "id": "e1" },
            "fields": { "name": "Pig" }
        });
        assert!(Link::from_value(&entry).is_none());

        // Scalars and bare objects are not markers
        assert!(Link::from_value(&json!("hello")).is_none());
        assert!(Link::from_value(&json!({ "id": "e1" })).is_none());
    }

    #[test]
    fn test_link_round_trip() {
        let link = Link::new("Asset", "a1");
        let value = link.to_value();
        assert_eq!(Link::from_value(&value).unwrap(), link);
    }

    #[test]
    fn test_sys_deserialization() {
        let raw = json!({
            "id": "e1",
            "type": "Entry",
            "createdAt": "2024-03-01T12:00:00Z",
            "locale": "en-US"
        });
        let sys: Sys = serde_json::from_value(raw).unwrap();
        assert_eq!(sys.id, "e1");
        assert_eq!(sys.kind.as_deref(), Some("Entry"));
        assert_eq!(sys.locale.as_deref(), Some("en-US"));
        assert!(sys.created_at.is_some());
        assert!(sys.content_type.is_none());
    }

    #[test]
    fn test_collection_defaults_missing_items() {
        let collection: ResourceCollection = serde_json::from_value(json!({
            "total": 0
        }))
        .unwrap();
        assert!(collection.items.is_empty());
        assert_eq!(collection.total, Some(0));
    }

    #[test]
    fn test_content_type_deserialization() {
        let raw = json!({
            "sys": { "id": "cat", "type": "ContentType" },
            "name": "Cat",
            "displayField": "name",
            "fields": [
                { "id": "name", "name": "Name", "type": "Text", "required": true },
                { "id": "bestFriend", "name": "Best Friend", "type": "Link" }
            ]
        });
        let ct: ContentType = serde_json::from_value(raw).unwrap();
        assert_eq!(ct.name, "Cat");
        assert_eq!(ct.display_field.as_deref(), Some("name"));
        assert_eq!(ct.fields.len(), 2);
        assert!(ct.fields[0].required);
        assert!(!ct.fields[1].required);
    }
}
