//! Main ContentGraph interface for graph assembly.

use crate::error::{GraphError, Result};
use crate::graph::flatten::flatten;
use crate::graph::identity::make_node_id;
use crate::graph::node::{create_node, GraphNode, NodeKind};
use crate::link::{
    link_language_variants, link_linked_items, link_rich_text, link_type_items,
};
use crate::record::{ContentItemRecord, ContentTypeRecord};
use log::{debug, info};
use serde_json::{Map, Value};

/// The assembled content graph.
///
/// `ContentGraph` drives one full assembly pass over a snapshot of type and
/// item records: nodes are constructed first (items through the flattener),
/// then the relationship linkers run sequentially over the completed node
/// set. The pass is synchronous and single-threaded; every relationship
/// field is owned by it until the next rebuild replaces the whole graph.
#[derive(Debug)]
pub struct ContentGraph {
    type_nodes: Vec<GraphNode>,
    item_nodes: Vec<GraphNode>,
}

impl ContentGraph {
    /// Build a graph from raw record values.
    ///
    /// Records are parsed and validated at this boundary, then handed to
    /// [`ContentGraph::build_from_records`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MalformedRecord`] on the first record that
    /// fails validation.
    pub fn build(types: &[Value], items: &[Value]) -> Result<Self> {
        let types = types
            .iter()
            .map(ContentTypeRecord::from_value)
            .collect::<Result<Vec<_>>>()?;
        let items = items
            .iter()
            .map(ContentItemRecord::from_value)
            .collect::<Result<Vec<_>>>()?;
        Self::build_from_records(&types, &items)
    }

    /// Build a graph from validated records.
    ///
    /// Assembly order: (1) type nodes; (2) item nodes via the content
    /// flattener; (3) type↔item links; (4) language-variant links, one call
    /// per item per other language; (5) embedded-reference and rich-text
    /// links, once per item. Items all exist as nodes before any link can
    /// reference them.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Serialization`] if a payload cannot be
    /// serialized, or any error a linker raises on malformed node sets.
    pub fn build_from_records(
        types: &[ContentTypeRecord],
        items: &[ContentItemRecord],
    ) -> Result<Self> {
        info!(
            "building content graph: {} types, {} items",
            types.len(),
            items.len()
        );

        let mut type_nodes = Vec::with_capacity(types.len());
        for record in types {
            let payload = serde_json::to_value(record).map_err(|e| {
                GraphError::serialization("failed to serialize content type record", Some(e))
            })?;
            let id = make_node_id(NodeKind::Type, &record.system.codename, None);
            type_nodes.push(create_node(
                id,
                &record.system,
                &payload,
                NodeKind::Type,
                &record.system.codename,
                Map::new(),
            )?);
        }

        let mut item_nodes = Vec::with_capacity(items.len());
        for record in items {
            let flattened = flatten(record, &[]);
            let payload = serde_json::to_value(&flattened).map_err(|e| {
                GraphError::serialization("failed to serialize flattened item", Some(e))
            })?;
            let id = make_node_id(
                NodeKind::Item,
                &record.system.codename,
                record.system.language.as_deref(),
            );
            item_nodes.push(create_node(
                id,
                &record.system,
                &payload,
                NodeKind::Item,
                record.system.declared_type(),
                Map::new(),
            )?);
        }

        let mut graph = Self {
            type_nodes,
            item_nodes,
        };
        graph.link()?;
        Ok(graph)
    }

    /// Run all four linkers over the constructed node set.
    fn link(&mut self) -> Result<()> {
        link_type_items(&mut self.type_nodes, &mut self.item_nodes)?;

        // Distinct languages in first-seen order.
        let mut languages: Vec<String> = Vec::new();
        for node in &self.item_nodes {
            if let Some(language) = node.language() {
                if !languages.iter().any(|seen| seen == language) {
                    languages.push(language.to_string());
                }
            }
        }
        debug!("linking across {} languages", languages.len());

        for index in 0..self.item_nodes.len() {
            for language in &languages {
                let is_own = self.item_nodes[index]
                    .language()
                    .map(|own| own.eq_ignore_ascii_case(language))
                    .unwrap_or(false);
                if !is_own {
                    link_language_variants(&mut self.item_nodes, index, language)?;
                }
            }
        }

        for index in 0..self.item_nodes.len() {
            link_linked_items(&mut self.item_nodes, index)?;
            link_rich_text(&mut self.item_nodes, index)?;
        }

        Ok(())
    }

    /// All type nodes, in input order.
    pub fn type_nodes(&self) -> &[GraphNode] {
        &self.type_nodes
    }

    /// All item nodes, in input order.
    pub fn item_nodes(&self) -> &[GraphNode] {
        &self.item_nodes
    }

    /// Look up a node by its deterministic id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.type_nodes
            .iter()
            .chain(self.item_nodes.iter())
            .find(|node| node.id == id)
    }

    /// Number of type nodes in the graph.
    pub fn type_node_count(&self) -> usize {
        self.type_nodes.len()
    }

    /// Number of item nodes in the graph.
    pub fn item_node_count(&self) -> usize {
        self.item_nodes.len()
    }

    /// Consume the graph, handing the full node set (types first, then
    /// items) to the external query layer.
    pub fn into_nodes(self) -> Vec<GraphNode> {
        let mut nodes = self.type_nodes;
        nodes.extend(self.item_nodes);
        nodes
    }
}
