//! Graph node types and the node factory.
//!
//! A [`GraphNode`] is the graph-ready, content-addressed representation of a
//! content type or item: identity, digest, payload, and relationship fields.

use crate::error::{GraphError, Result};
use crate::graph::identity::{digest, pascal_case};
use crate::record::SystemInfo;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Unique identifier for a node (deterministic business key).
pub type NodeId = String;

/// Project prefix for the schema/category label on every node.
///
/// `internal.type` is `<prefix><kind><discriminant>` in PascalCase; external
/// consumers key on that string for deduplication and schema grouping.
pub const TYPE_PREFIX: &str = "ContentGraph";

/// Artifact kind of a node in the content graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Schema descriptor node
    Type,
    /// Content item node
    Item,
}

impl NodeKind {
    /// Lowercase label used in node ids.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Type => "type",
            NodeKind::Item => "item",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Type => write!(f, "Type"),
            NodeKind::Item => write!(f, "Item"),
        }
    }
}

/// Bookkeeping triple consumed by the external query layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInternal {
    /// Schema/category label, `<prefix><kind><discriminant>` in PascalCase
    #[serde(rename = "type")]
    pub type_name: String,
    /// Canonical serialization of the payload at construction time
    pub content: String,
    /// Hex-encoded SHA-256 of `content`; pure function of it
    #[serde(rename = "contentDigest")]
    pub content_digest: String,
}

/// The graph-ready representation of a content type or item.
///
/// Relationship fields start empty and are populated by the linkers after
/// every node exists; they are owned exclusively by the current assembly
/// pass and replaced wholesale on a rebuild.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Deterministic identifier, unique within the node set
    pub id: NodeId,
    /// System metadata of the source record
    pub system: SystemInfo,
    /// Merged payload the digest was computed over
    pub payload: Value,
    /// Parent node; always `None` in this graph
    pub parent: Option<NodeId>,
    /// Child nodes; always empty in this graph
    pub children: Vec<NodeId>,
    /// Reverse links: every item that references this node through an
    /// embedded-reference field. Ordered, duplicate-free, append-only.
    #[serde(rename = "usedByContentItems")]
    pub used_by_content_items: Vec<NodeId>,
    /// Items of this type (type nodes only). `None` means the linker never
    /// wrote the field, which is distinct from an empty list.
    #[serde(rename = "contentItems", skip_serializing_if = "Option::is_none")]
    pub content_items: Option<Vec<NodeId>>,
    /// The type node this item belongs to (item nodes only); populated once
    /// all type nodes exist
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type_node: Option<NodeId>,
    /// Other-language variants of this item, one per language
    #[serde(rename = "otherLanguages")]
    pub other_languages: Vec<NodeId>,
    /// Embedded-reference links keyed by `<field>Linked`
    #[serde(rename = "linkedFields")]
    pub linked_fields: BTreeMap<String, Vec<NodeId>>,
    /// Rich-text links keyed by source field name; consumers read an entry
    /// as the `<field>.linkedItems` path
    #[serde(rename = "richTextLinks")]
    pub rich_text_links: BTreeMap<String, Vec<NodeId>>,
    /// Identity/digest triple for the external query layer
    pub internal: NodeInternal,
}

impl GraphNode {
    /// Append a reverse used-by link if not already present.
    pub fn add_used_by(&mut self, id: &NodeId) {
        if !self.used_by_content_items.contains(id) {
            self.used_by_content_items.push(id.clone());
        }
    }

    /// Append a language-variant link if not already present.
    pub fn add_language_variant(&mut self, id: &NodeId) {
        if !self.other_languages.contains(id) {
            self.other_languages.push(id.clone());
        }
    }

    /// Append item links to `content_items`, creating the list on first use
    /// and skipping ids already present.
    pub fn append_content_items(&mut self, ids: Vec<NodeId>) {
        let list = self.content_items.get_or_insert_with(Vec::new);
        for id in ids {
            if !list.contains(&id) {
                list.push(id);
            }
        }
    }

    /// Language of the underlying record, if declared.
    pub fn language(&self) -> Option<&str> {
        self.system.language.as_deref()
    }
}

/// Create a graph node from a payload and relationship placeholders.
///
/// Merge order: `payload`, then `extra` (extra wins on key collision), then
/// the fixed bookkeeping fields, which always win over both. The digest is
/// computed over the merged payload; inputs are never mutated.
///
/// # Errors
///
/// Returns [`GraphError::InvalidArgument`] if `id` is empty or `system`
/// lacks a codename.
pub fn create_node(
    id: impl Into<NodeId>,
    system: &SystemInfo,
    payload: &Value,
    kind: NodeKind,
    discriminant: &str,
    extra: Map<String, Value>,
) -> Result<GraphNode> {
    let id = id.into();
    if id.is_empty() {
        return Err(GraphError::invalid_argument("id", "node id must not be empty"));
    }
    if system.codename.is_empty() {
        return Err(GraphError::invalid_argument(
            "system",
            "payload is missing system.codename",
        ));
    }

    let mut merged = match payload {
        Value::Object(map) => map.clone(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other.clone());
            map
        }
    };
    for (key, value) in extra {
        merged.insert(key, value);
    }
    let merged = Value::Object(merged);

    let (content, content_digest) = digest(&merged);
    let type_name = format!(
        "{TYPE_PREFIX}{}{}",
        pascal_case(&kind.to_string()),
        pascal_case(discriminant)
    );

    Ok(GraphNode {
        id,
        system: system.clone(),
        payload: merged,
        parent: None,
        children: Vec::new(),
        used_by_content_items: Vec::new(),
        content_items: None,
        content_type_node: None,
        other_languages: Vec::new(),
        linked_fields: BTreeMap::new(),
        rich_text_links: BTreeMap::new(),
        internal: NodeInternal {
            type_name,
            content,
            content_digest,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system(codename: &str) -> SystemInfo {
        SystemInfo {
            id: None,
            codename: codename.to_string(),
            content_type: Some("article".to_string()),
            language: Some("en-US".to_string()),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_create_node_digest_matches_payload() {
        let payload = json!({ "system": { "codename": "post_1" }, "title": "Hello" });
        let node = create_node(
            "item-post-1-en-us",
            &system("post_1"),
            &payload,
            NodeKind::Item,
            "article",
            Map::new(),
        )
        .unwrap();

        let (content, hash) = digest(&node.payload);
        assert_eq!(node.internal.content, content);
        assert_eq!(node.internal.content_digest, hash);
    }

    #[test]
    fn test_internal_type_composition() {
        let node = create_node(
            "item-post-1",
            &system("post_1"),
            &json!({}),
            NodeKind::Item,
            "landing_page",
            Map::new(),
        )
        .unwrap();
        assert_eq!(node.internal.type_name, "ContentGraphItemLandingPage");
    }

    #[test]
    fn test_extra_fields_win_over_payload() {
        let payload = json!({ "title": "original" });
        let mut extra = Map::new();
        extra.insert("title".to_string(), json!("override"));

        let node = create_node(
            "item-post-1",
            &system("post_1"),
            &payload,
            NodeKind::Item,
            "article",
            extra,
        )
        .unwrap();
        assert_eq!(node.payload["title"], json!("override"));
    }

    #[test]
    fn test_bookkeeping_fields_are_fixed() {
        let node = create_node(
            "item-post-1",
            &system("post_1"),
            &json!({}),
            NodeKind::Item,
            "article",
            Map::new(),
        )
        .unwrap();
        assert_eq!(node.parent, None);
        assert!(node.children.is_empty());
        assert!(node.used_by_content_items.is_empty());
        assert!(node.content_items.is_none());
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = create_node(
            "",
            &system("post_1"),
            &json!({}),
            NodeKind::Item,
            "article",
            Map::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::InvalidArgument { ref parameter, .. } if parameter == "id"));
    }

    #[test]
    fn test_used_by_append_is_duplicate_free() {
        let mut node = create_node(
            "item-post-1",
            &system("post_1"),
            &json!({}),
            NodeKind::Item,
            "article",
            Map::new(),
        )
        .unwrap();
        let source = "item-post-2".to_string();
        node.add_used_by(&source);
        node.add_used_by(&source);
        assert_eq!(node.used_by_content_items, vec!["item-post-2"]);
    }
}
