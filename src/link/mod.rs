//! Relationship linkers wiring the four link kinds between nodes.
//!
//! One module per relationship kind:
//! - [`type_items`]: type → items of that type
//! - [`language_variants`]: item → other-language variants
//! - [`linked_items`]: item → embedded linked items (plus reverse used-by)
//! - [`rich_text`]: item → items referenced from rich text
//!
//! Every linker validates its arguments before any mutation begins, scopes
//! matching to the item's language, preserves source ordering, and is safe to
//! invoke repeatedly: re-linking an overlapping node set never duplicates
//! entries.

pub mod language_variants;
pub mod linked_items;
pub mod rich_text;
pub mod type_items;

pub use language_variants::link_language_variants;
pub use linked_items::link_linked_items;
pub use rich_text::link_rich_text;
pub use type_items::link_type_items;

use crate::error::{GraphError, Result};
use crate::graph::GraphNode;

/// Verify that every node in `nodes` exposes the expected system shape.
pub(crate) fn ensure_nodes(parameter: &str, nodes: &[GraphNode]) -> Result<()> {
    for node in nodes {
        if node.system.codename.is_empty() {
            return Err(GraphError::invalid_argument(
                parameter,
                format!("node '{}' is missing system.codename", node.id),
            ));
        }
    }
    Ok(())
}

/// Verify that `index` addresses a node inside `nodes`.
pub(crate) fn ensure_index(parameter: &str, nodes: &[GraphNode], index: usize) -> Result<()> {
    if index >= nodes.len() {
        return Err(GraphError::invalid_argument(
            parameter,
            format!("index {index} out of bounds for {} nodes", nodes.len()),
        ));
    }
    Ok(())
}

/// Whether two optional languages refer to the same variant.
pub(crate) fn same_language(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}
