//! Type ↔ item linker.

use super::ensure_nodes;
use crate::error::Result;
use crate::graph::{GraphNode, NodeId};
use log::debug;

/// Link every type node to the items declaring that type, and back.
///
/// For each type node, the ids of all items whose `system.type` equals the
/// type's codename are appended to its `content_items` list, in item-array
/// order; each matching item's `content_type_node` is set to the type node's
/// id. Types with no matching items are skipped entirely: their
/// `content_items` stays `None` rather than becoming an empty list.
///
/// Idempotent: ids already present are not appended again, and the item-side
/// link is recomputed to the same value.
///
/// # Errors
///
/// Returns [`crate::GraphError::InvalidArgument`] naming `types` or `items`
/// if any node lacks the expected system shape; nothing is mutated in that
/// case.
pub fn link_type_items(types: &mut [GraphNode], items: &mut [GraphNode]) -> Result<()> {
    ensure_nodes("types", types)?;
    ensure_nodes("items", items)?;

    for type_node in types.iter_mut() {
        let matching: Vec<NodeId> = items
            .iter_mut()
            .filter(|item| item.system.declared_type() == type_node.system.codename)
            .map(|item| {
                item.content_type_node = Some(type_node.id.clone());
                item.id.clone()
            })
            .collect();
        if matching.is_empty() {
            continue;
        }
        debug!(
            "linking {} items to type '{}'",
            matching.len(),
            type_node.system.codename
        );
        type_node.append_content_items(matching);
    }

    Ok(())
}
