//! Language-variant linker.

use super::{ensure_index, ensure_nodes, same_language};
use crate::error::Result;
use crate::graph::GraphNode;
use log::trace;

/// Link one item to its variant in a specific other language.
///
/// Finds the first node in `nodes` sharing the item's codename and declared
/// type but carrying `other_language` instead of the item's own language,
/// and appends its id to the item's `other_languages` set if absent.
///
/// One-directional per call: symmetric linking (once per direction, per
/// language pair) is the orchestrator's responsibility.
///
/// # Errors
///
/// Returns [`crate::GraphError::InvalidArgument`] if `item_index` is out of
/// bounds or any node lacks the expected system shape; nothing is mutated in
/// that case.
pub fn link_language_variants(
    nodes: &mut [GraphNode],
    item_index: usize,
    other_language: &str,
) -> Result<()> {
    ensure_index("item_index", nodes, item_index)?;
    ensure_nodes("nodes", nodes)?;

    let variant_id = {
        let item = &nodes[item_index];
        nodes
            .iter()
            .enumerate()
            .find(|(index, candidate)| {
                *index != item_index
                    && candidate.system.codename == item.system.codename
                    && candidate.system.declared_type() == item.system.declared_type()
                    && same_language(candidate.language(), Some(other_language))
                    && !same_language(candidate.language(), item.language())
            })
            .map(|(_, candidate)| candidate.id.clone())
    };

    if let Some(id) = variant_id {
        trace!("language variant for '{}': {}", nodes[item_index].id, id);
        nodes[item_index].add_language_variant(&id);
    }

    Ok(())
}
