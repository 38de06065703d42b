//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`GraphNode`]: content-addressed nodes for types and items
//! - [`flatten`]: the cycle-safe content flattener
//! - [`make_node_id`]/[`digest`]: identity and change-detection primitives
//! - [`ContentGraph`]: the assembly pass driving construction and linking

mod contentgraph;
mod flatten;
mod identity;
mod node;

pub use contentgraph::ContentGraph;
pub use flatten::{flatten, FlattenedField, FlattenedItem};
pub use identity::{digest, digest_of, make_node_id, pascal_case};
pub use node::{create_node, GraphNode, NodeId, NodeInternal, NodeKind, TYPE_PREFIX};
