//! # contentgraph
//!
//! Cycle-safe, content-addressed graph construction for headless content
//! records.
//!
//! contentgraph ingests flat, denormalized records exported from a headless
//! content API — content *types* (schema descriptors) and content *items*
//! (typed field values) — and produces a fully cross-linked graph of
//! immutable nodes for a downstream query layer.
//!
//! ## Core Principles
//!
//! - **Deterministic**: identical input snapshots always produce identical
//!   node ids and content digests, so digests work for change detection
//! - **Cycle Safe**: arbitrarily deep and cyclic item references flatten
//!   without recursion blowup; cycles are logged, never thrown
//! - **Validate First**: raw records are parsed once at the boundary; every
//!   linker validates before it mutates
//! - **Order Preserving**: link lists mirror source-array order, not node-set
//!   order
//!
//! ## Architecture
//!
//! ```text
//! Raw type/item records
//!     ↓ boundary parse (record)
//! Content Flattener (cycle detection)
//!     ↓
//! Node Factory (identity + digest)
//!     ↓
//! Relationship Linkers (types, languages, linked items, rich text)
//!     ↓
//! Assembled graph → external query layer
//! ```
//!
//! ## Example
//!
//! ```rust
//! use contentgraph::ContentGraph;
//! use serde_json::json;
//!
//! let types = vec![json!({ "system": { "codename": "article" } })];
//! let items = vec![json!({
//!     "system": { "codename": "post_1", "type": "article", "language": "en-US" },
//!     "elements": { "title": { "type": "text" } },
//!     "title": "Hello"
//! })];
//!
//! let graph = ContentGraph::build(&types, &items).unwrap();
//! assert_eq!(graph.item_node_count(), 1);
//! let node = graph.node("item-post-1-en-us").unwrap();
//! assert_eq!(node.internal.type_name, "ContentGraphItemArticle");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod graph;
pub mod link;
pub mod record;

// Re-export main types
pub use error::{GraphError, Result};
pub use graph::{
    create_node, digest, digest_of, flatten, make_node_id, pascal_case, ContentGraph,
    FlattenedField, FlattenedItem, GraphNode, NodeId, NodeInternal, NodeKind, TYPE_PREFIX,
};
pub use link::{link_language_variants, link_linked_items, link_rich_text, link_type_items};
pub use record::{
    ContentItemRecord, ContentTypeRecord, ElementDescriptor, FieldValue, RichTextField,
    SystemInfo, MODULAR_CONTENT_TYPE, RICH_TEXT_TYPE,
};
