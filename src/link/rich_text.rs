//! Rich-text reference linker.

use super::{ensure_index, ensure_nodes, same_language};
use crate::error::Result;
use crate::graph::{GraphNode, NodeId};
use crate::record::RICH_TEXT_TYPE;
use log::trace;
use serde_json::Value;

/// Link an item's rich-text fields to the nodes they reference.
///
/// For every element typed `rich_text`, the declared `linkedItemCodenames`
/// list resolves against same-language nodes by codename alone — rich text
/// does not constrain the target type. The result keeps source-list order;
/// codenames with no matching node are silently dropped. Consumers read an
/// entry of `rich_text_links` as the `<field>.linkedItems` path.
///
/// Unlike the embedded-reference linker, this linker does not update the
/// reverse `used_by_content_items` set.
///
/// Idempotent: link lists are recomputed wholesale on every call.
///
/// # Errors
///
/// Returns [`crate::GraphError::InvalidArgument`] if `item_index` is out of
/// bounds or any node lacks the expected system shape; nothing is mutated in
/// that case.
pub fn link_rich_text(nodes: &mut [GraphNode], item_index: usize) -> Result<()> {
    ensure_index("item_index", nodes, item_index)?;
    ensure_nodes("nodes", nodes)?;

    let mut writes: Vec<(String, Vec<NodeId>)> = Vec::new();
    {
        let item = &nodes[item_index];
        let item_language = item.language();

        let elements = match item.payload.get("elements").and_then(Value::as_object) {
            Some(elements) => elements,
            None => return Ok(()),
        };

        for (field, value) in elements {
            if value.get("type").and_then(Value::as_str) != Some(RICH_TEXT_TYPE) {
                continue;
            }
            let codenames: Vec<&str> = value
                .get("linkedItemCodenames")
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            let ids: Vec<NodeId> = codenames
                .iter()
                .filter_map(|codename| {
                    nodes
                        .iter()
                        .find(|candidate| {
                            candidate.system.codename == *codename
                                && same_language(candidate.language(), item_language)
                        })
                        .map(|candidate| candidate.id.clone())
                })
                .collect();
            writes.push((field.clone(), ids));
        }
    }

    let item_id = nodes[item_index].id.clone();
    for (field, ids) in writes {
        trace!("rich text '{}' on {item_id}: {} links", field, ids.len());
        nodes[item_index].rich_text_links.insert(field, ids);
    }

    Ok(())
}
