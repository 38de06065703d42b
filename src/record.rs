//! Raw record model for headless content exports.
//!
//! Raw input is parsed exactly once, at the boundary, into validated structs;
//! downstream code never re-probes shapes. Two record kinds exist:
//! [`ContentTypeRecord`] (schema descriptor) and [`ContentItemRecord`]
//! (one instance of structured content, keyed by codename+type+language).

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Element type marker for rich text fields.
pub const RICH_TEXT_TYPE: &str = "rich_text";

/// Element type marker for embedded-reference (linked item) lists.
pub const MODULAR_CONTENT_TYPE: &str = "modular_content";

/// The `system` block shared by types and items.
///
/// `codename` is the stable machine key; it is mandatory for every record.
/// Items additionally declare their content type and language here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Source-assigned identifier, if the export carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Stable machine key within the record's kind
    pub codename: String,
    /// Declared content type codename (items only)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Language variant code (items only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Remaining system metadata, carried through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SystemInfo {
    /// Declared content type, or `""` when the record has none.
    pub fn declared_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or("")
    }
}

/// Schema descriptor for one kind of content item.
///
/// Everything outside the `system` block is carried as an opaque payload;
/// the graph does not validate schema correctness beyond shape checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeRecord {
    /// System metadata; `codename` is the natural key
    pub system: SystemInfo,
    /// Remaining top-level fields of the raw record
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ContentTypeRecord {
    /// Parse and validate a raw content type record.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MalformedRecord`] if the record is not an object,
    /// lacks a `system` block, or has an empty `system.codename`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let record: Self = serde_json::from_value(value.clone())
            .map_err(|e| GraphError::malformed_record("invalid content type record", Some(e)))?;
        if record.system.codename.is_empty() {
            return Err(GraphError::malformed_record(
                "content type record has an empty system.codename",
                None::<std::io::Error>,
            ));
        }
        Ok(record)
    }
}

/// Schema descriptor for one element of a content item.
///
/// Only `type` matters to the graph: it decides whether the mirrored
/// top-level field is an embedded-reference list or a plain value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Element type marker (`modular_content`, `rich_text`, `text`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    /// Remaining descriptor fields, carried through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementDescriptor {
    /// Whether this element declares an embedded-reference list.
    pub fn is_modular_content(&self) -> bool {
        self.element_type.as_deref() == Some(MODULAR_CONTENT_TYPE)
    }
}

/// A rich text field value: free-form formatted content plus the list of
/// codenames it references. Rich text references carry no type constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextField {
    /// Always [`RICH_TEXT_TYPE`]
    #[serde(rename = "type")]
    pub field_type: String,
    /// Ordered codenames of items referenced from the text
    #[serde(rename = "linkedItemCodenames", default)]
    pub linked_item_codenames: Vec<String>,
    /// Remaining field content (markup, images, ...), carried through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One classified top-level field of a content item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Ordered list of fully nested content items (embedded references)
    Items(Vec<ContentItemRecord>),
    /// Rich text with referenced codenames
    RichText(RichTextField),
    /// Anything else: scalars, plain lists, unknown shapes
    Scalar(Value),
}

/// One instance of structured content.
///
/// The raw export mirrors every element as a top-level shortcut field; parsing
/// classifies each of those fields against its [`ElementDescriptor`], so the
/// flattener and linkers operate on guaranteed-valid data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItemRecord {
    /// System metadata; codename, type and language identify the item
    pub system: SystemInfo,
    /// Element descriptors keyed by field name
    pub elements: BTreeMap<String, ElementDescriptor>,
    /// Classified top-level fields keyed by field name
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ContentItemRecord {
    /// Parse and validate a raw content item record.
    ///
    /// Classification rules for each top-level field other than `system` and
    /// `elements`:
    /// - element declared `modular_content` and value is a list of objects:
    ///   every entry is parsed recursively as a nested item;
    /// - value is an object with `"type": "rich_text"`: parsed as rich text;
    /// - anything else is copied through verbatim as a scalar.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MalformedRecord`] if the record is not an object,
    /// lacks `system.codename` or `system.type`, or a `modular_content` list
    /// holds an entry that is not itself a valid item record.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            GraphError::malformed_record(
                "content item record is not an object",
                None::<std::io::Error>,
            )
        })?;

        let system_value = obj.get("system").ok_or_else(|| {
            GraphError::malformed_record(
                "content item record has no system block",
                None::<std::io::Error>,
            )
        })?;
        let system: SystemInfo = serde_json::from_value(system_value.clone())
            .map_err(|e| GraphError::malformed_record("invalid system block", Some(e)))?;
        if system.codename.is_empty() {
            return Err(GraphError::malformed_record(
                "content item record has an empty system.codename",
                None::<std::io::Error>,
            ));
        }
        if system.declared_type().is_empty() {
            return Err(GraphError::malformed_record(
                format!("content item '{}' declares no system.type", system.codename),
                None::<std::io::Error>,
            ));
        }

        let mut elements = BTreeMap::new();
        if let Some(raw) = obj.get("elements").and_then(Value::as_object) {
            for (name, descriptor) in raw {
                let descriptor: ElementDescriptor = serde_json::from_value(descriptor.clone())
                    .map_err(|e| {
                        GraphError::malformed_record(
                            format!("invalid element descriptor '{name}'"),
                            Some(e),
                        )
                    })?;
                elements.insert(name.clone(), descriptor);
            }
        }

        let mut fields = BTreeMap::new();
        for (name, raw) in obj {
            if name == "system" || name == "elements" {
                continue;
            }
            fields.insert(name.clone(), Self::classify_field(name, raw, &elements)?);
        }

        Ok(Self {
            system,
            elements,
            fields,
        })
    }

    fn classify_field(
        name: &str,
        raw: &Value,
        elements: &BTreeMap<String, ElementDescriptor>,
    ) -> Result<FieldValue> {
        let is_modular = elements
            .get(name)
            .map(ElementDescriptor::is_modular_content)
            .unwrap_or(false);

        if is_modular {
            if let Some(entries) = raw.as_array() {
                if !entries.is_empty() && entries.iter().all(Value::is_object) {
                    let nested = entries
                        .iter()
                        .map(Self::from_value)
                        .collect::<Result<Vec<_>>>()?;
                    return Ok(FieldValue::Items(nested));
                }
            }
        }

        if let Some(obj) = raw.as_object() {
            if obj.get("type").and_then(Value::as_str) == Some(RICH_TEXT_TYPE) {
                let rich_text: RichTextField = serde_json::from_value(raw.clone())
                    .map_err(|e| {
                        GraphError::malformed_record(
                            format!("invalid rich text field '{name}'"),
                            Some(e),
                        )
                    })?;
                return Ok(FieldValue::RichText(rich_text));
            }
        }

        Ok(FieldValue::Scalar(raw.clone()))
    }
}
