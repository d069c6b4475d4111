//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Media type attached to string fields that carry serialized JSON
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Object,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Object => write!(f, "object"),
        }
    }
}

/// Column type of a flat row
///
/// `JsonBlob` is a string holding the verbatim JSON of a nested source
/// object. It is declared as a string with a JSON content media type so
/// downstream loaders can tell it apart from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Number,
    String,
    JsonBlob,
}

impl FieldType {
    /// Schema property for a column of this type
    pub fn property(self) -> SchemaProperty {
        match self {
            FieldType::Integer => SchemaProperty::new(JsonType::Integer),
            FieldType::Number => SchemaProperty::new(JsonType::Number),
            FieldType::String => SchemaProperty::new(JsonType::String),
            FieldType::JsonBlob => {
                SchemaProperty::new(JsonType::String).with_content_media_type(JSON_MEDIA_TYPE)
            }
        }
    }
}

/// JSON Schema property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Property type
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Media type of string content
    #[serde(rename = "contentMediaType", skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,
}

impl SchemaProperty {
    /// Create a new property with the given type
    pub fn new(json_type: JsonType) -> Self {
        Self {
            json_type,
            content_media_type: None,
        }
    }

    /// Set content media type
    #[must_use]
    pub fn with_content_media_type(mut self, media_type: &str) -> Self {
        self.content_media_type = Some(media_type.to_string());
        self
    }

    /// Whether the property holds serialized JSON
    pub fn is_json_blob(&self) -> bool {
        self.content_media_type.as_deref() == Some(JSON_MEDIA_TYPE)
    }
}

/// Full JSON Schema document for one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema version
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Schema type (always "object" for top-level)
    #[serde(rename = "type")]
    pub json_type: JsonType,

    /// Schema title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Object properties
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Allow additional properties
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: bool,
}

impl Default for JsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self {
            schema: Some("http://json-schema.org/draft-07/schema#".to_string()),
            json_type: JsonType::Object,
            title: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }

    /// Set the schema title
    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Add a property
    pub fn add_property(&mut self, name: &str, property: SchemaProperty) {
        self.properties.insert(name.to_string(), property);
    }

    /// Add a required property
    pub fn add_required(&mut self, name: &str) {
        if !self.is_required(name) {
            self.required.push(name.to_string());
        }
    }

    /// Check if a property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|n| n == name)
    }

    /// Get a property
    pub fn get_property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.get(name)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
