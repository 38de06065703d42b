//! Embedded-reference linker.

use super::{ensure_index, ensure_nodes, same_language};
use crate::error::Result;
use crate::graph::{GraphNode, NodeId};
use log::trace;
use serde_json::Value;

/// Suffix appended to a field name to form its link field.
pub const LINK_FIELD_SUFFIX: &str = "Linked";

/// Link an item's embedded-reference fields to their target nodes.
///
/// For every element of the item whose payload value is a list, a
/// `<field>Linked` entry is written. Entries of the list carrying a
/// recognizable reference shape (`system.codename` + `system.type`) resolve
/// against the same-language nodes in `nodes`; the result preserves the
/// source list's ordering, with duplicates ordered by first occurrence.
/// References that resolve to no node are silently dropped. A list with no
/// reference-shaped entries still produces an *empty* link field, which
/// distinguishes "no links" from "field did not exist".
///
/// Each resolved target additionally gains the item's id in its reverse
/// `used_by_content_items` set, once.
///
/// Idempotent: link fields are recomputed wholesale and used-by appends
/// skip ids already present.
///
/// # Errors
///
/// Returns [`crate::GraphError::InvalidArgument`] if `item_index` is out of
/// bounds or any node lacks the expected system shape; nothing is mutated in
/// that case.
pub fn link_linked_items(nodes: &mut [GraphNode], item_index: usize) -> Result<()> {
    ensure_index("item_index", nodes, item_index)?;
    ensure_nodes("nodes", nodes)?;

    // Read phase: resolve every link before touching any node.
    let mut writes: Vec<(String, Vec<NodeId>)> = Vec::new();
    let mut reverse_targets: Vec<usize> = Vec::new();
    {
        let item = &nodes[item_index];
        let item_language = item.language();

        let elements = match item.payload.get("elements").and_then(Value::as_object) {
            Some(elements) => elements,
            None => return Ok(()),
        };

        for (field, value) in elements {
            let entries = match value.as_array() {
                Some(entries) => entries,
                None => continue,
            };
            let link_field = format!("{field}{LINK_FIELD_SUFFIX}");
            let references = reference_shapes(entries);
            if references.is_empty() {
                // A list without reference shapes still gets an empty link
                // field.
                writes.push((link_field, Vec::new()));
                continue;
            }

            let pattern: Vec<&str> = references.iter().map(|(codename, _)| *codename).collect();
            let mut matched: Vec<(usize, NodeId, usize)> = nodes
                .iter()
                .enumerate()
                .filter(|(_, candidate)| {
                    same_language(candidate.language(), item_language)
                        && references.iter().any(|(codename, declared)| {
                            candidate.system.codename == *codename
                                && candidate.system.declared_type() == *declared
                        })
                })
                .map(|(index, candidate)| {
                    // First occurrence in the source list decides ordering,
                    // including for duplicate reference shapes.
                    let position = pattern
                        .iter()
                        .position(|codename| *codename == candidate.system.codename)
                        .unwrap_or(usize::MAX);
                    (index, candidate.id.clone(), position)
                })
                .collect();
            matched.sort_by_key(|(_, _, position)| *position);

            reverse_targets.extend(matched.iter().map(|(index, _, _)| *index));
            writes.push((link_field, matched.into_iter().map(|(_, id, _)| id).collect()));
        }
    }

    // Write phase: link fields are overwritten, used-by appends deduplicate.
    let item_id = nodes[item_index].id.clone();
    for (field, ids) in writes {
        trace!("linking {} ids into '{}' on {item_id}", ids.len(), field);
        nodes[item_index].linked_fields.insert(field, ids);
    }
    for target in reverse_targets {
        nodes[target].add_used_by(&item_id);
    }

    Ok(())
}

/// Extract `(codename, type)` pairs from reference-shaped list entries.
fn reference_shapes(entries: &[Value]) -> Vec<(&str, &str)> {
    entries
        .iter()
        .filter_map(|entry| {
            let system = entry.get("system")?;
            let codename = system.get("codename")?.as_str()?;
            let declared = system.get("type")?.as_str()?;
            Some((codename, declared))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{create_node, make_node_id, NodeKind};
    use crate::record::SystemInfo;
    use serde_json::{json, Map};

    fn item_node(codename: &str, payload: Value) -> GraphNode {
        let system = SystemInfo {
            id: None,
            codename: codename.to_string(),
            content_type: Some("article".to_string()),
            language: Some("en-US".to_string()),
            extra: Map::new(),
        };
        create_node(
            make_node_id(NodeKind::Item, codename, Some("en-US")),
            &system,
            &payload,
            NodeKind::Item,
            "article",
            Map::new(),
        )
        .unwrap()
    }

    fn reference(codename: &str) -> Value {
        json!({ "system": { "codename": codename, "type": "article" } })
    }

    #[test]
    fn test_source_order_preserved() {
        let mut nodes = vec![
            item_node(
                "source",
                json!({ "elements": { "related": [reference("b"), reference("a")] } }),
            ),
            item_node("a", json!({ "elements": {} })),
            item_node("b", json!({ "elements": {} })),
        ];
        let (id_a, id_b) = (nodes[1].id.clone(), nodes[2].id.clone());

        link_linked_items(&mut nodes, 0).unwrap();

        // Source list order [b, a], not node-set order.
        assert_eq!(
            nodes[0].linked_fields.get("relatedLinked"),
            Some(&vec![id_b, id_a])
        );
    }

    #[test]
    fn test_reverse_used_by_updated_once() {
        let mut nodes = vec![
            item_node(
                "source",
                json!({ "elements": { "related": [reference("a")] } }),
            ),
            item_node("a", json!({ "elements": {} })),
        ];
        let source_id = nodes[0].id.clone();

        link_linked_items(&mut nodes, 0).unwrap();
        link_linked_items(&mut nodes, 0).unwrap();

        assert_eq!(nodes[1].used_by_content_items, vec![source_id]);
        assert_eq!(nodes[0].linked_fields.get("relatedLinked").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_reference_dropped() {
        let mut nodes = vec![
            item_node(
                "source",
                json!({ "elements": { "related": [reference("ghost"), reference("a")] } }),
            ),
            item_node("a", json!({ "elements": {} })),
        ];
        let id_a = nodes[1].id.clone();

        link_linked_items(&mut nodes, 0).unwrap();

        assert_eq!(
            nodes[0].linked_fields.get("relatedLinked"),
            Some(&vec![id_a])
        );
    }

    #[test]
    fn test_non_reference_list_gets_empty_link_field() {
        let mut nodes = vec![item_node(
            "source",
            json!({ "elements": { "tags": ["news", "tech"] } }),
        )];

        link_linked_items(&mut nodes, 0).unwrap();

        assert_eq!(nodes[0].linked_fields.get("tagsLinked"), Some(&vec![]));
    }

    #[test]
    fn test_other_language_nodes_not_matched() {
        let mut nodes = vec![
            item_node(
                "source",
                json!({ "elements": { "related": [reference("a")] } }),
            ),
            {
                let system = SystemInfo {
                    id: None,
                    codename: "a".to_string(),
                    content_type: Some("article".to_string()),
                    language: Some("cs-CZ".to_string()),
                    extra: Map::new(),
                };
                create_node(
                    make_node_id(NodeKind::Item, "a", Some("cs-CZ")),
                    &system,
                    &json!({ "elements": {} }),
                    NodeKind::Item,
                    "article",
                    Map::new(),
                )
                .unwrap()
            },
        ];

        link_linked_items(&mut nodes, 0).unwrap();

        assert_eq!(nodes[0].linked_fields.get("relatedLinked"), Some(&vec![]));
        assert!(nodes[1].used_by_content_items.is_empty());
    }
}
