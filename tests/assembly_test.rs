//! Integration tests for full graph assembly.

use contentgraph::{ContentGraph, GraphError};
use serde_json::{json, Value};

fn snapshot() -> (Vec<Value>, Vec<Value>) {
    let types = vec![
        json!({ "system": { "codename": "article" } }),
        json!({ "system": { "codename": "banner" } }),
    ];
    let items = vec![
        json!({
            "system": { "codename": "post_1", "type": "article", "language": "en" },
            "elements": {
                "title": { "type": "text" },
                "related": { "type": "modular_content" },
                "body": { "type": "rich_text" }
            },
            "title": "First",
            "related": [{
                "system": { "codename": "post_2", "type": "article", "language": "en" },
                "elements": { "title": { "type": "text" } },
                "title": "Second"
            }],
            "body": {
                "type": "rich_text",
                "linkedItemCodenames": ["promo"],
                "value": "<p>see the promo</p>"
            }
        }),
        json!({
            "system": { "codename": "post_2", "type": "article", "language": "en" },
            "elements": { "title": { "type": "text" } },
            "title": "Second"
        }),
        json!({
            "system": { "codename": "post_1", "type": "article", "language": "cs" },
            "elements": { "title": { "type": "text" } },
            "title": "První"
        }),
        json!({
            "system": { "codename": "promo", "type": "banner", "language": "en" },
            "elements": {}
        }),
    ];
    (types, items)
}

#[test]
fn test_full_assembly_wires_all_relationship_kinds() {
    let (types, items) = snapshot();
    let graph = ContentGraph::build(&types, &items).unwrap();

    assert_eq!(graph.type_node_count(), 2);
    assert_eq!(graph.item_node_count(), 4);

    // Type -> items, in input order.
    let article = graph.node("type-article").unwrap();
    assert_eq!(
        article.content_items,
        Some(vec![
            "item-post-1-en".to_string(),
            "item-post-2-en".to_string(),
            "item-post-1-cs".to_string(),
        ])
    );

    let post_1 = graph.node("item-post-1-en").unwrap();
    // Item -> type back-link, populated once all type nodes exist.
    assert_eq!(post_1.content_type_node, Some("type-article".to_string()));

    // Language variants, symmetric across the pair.
    assert_eq!(post_1.other_languages, vec!["item-post-1-cs".to_string()]);
    let post_1_cs = graph.node("item-post-1-cs").unwrap();
    assert_eq!(post_1_cs.other_languages, vec!["item-post-1-en".to_string()]);

    // Embedded references and their reverse links.
    assert_eq!(
        post_1.linked_fields.get("relatedLinked"),
        Some(&vec!["item-post-2-en".to_string()])
    );
    let post_2 = graph.node("item-post-2-en").unwrap();
    assert_eq!(post_2.used_by_content_items, vec!["item-post-1-en".to_string()]);

    // Rich text references, no type constraint, no reverse link.
    assert_eq!(
        post_1.rich_text_links.get("body"),
        Some(&vec!["item-promo-en".to_string()])
    );
    let promo = graph.node("item-promo-en").unwrap();
    assert!(promo.used_by_content_items.is_empty());
}

#[test]
fn test_rebuild_from_identical_input_is_deterministic() {
    let (types, items) = snapshot();
    let first = ContentGraph::build(&types, &items).unwrap();
    let second = ContentGraph::build(&types, &items).unwrap();

    let digests = |graph: &ContentGraph| -> Vec<(String, String)> {
        graph
            .type_nodes()
            .iter()
            .chain(graph.item_nodes().iter())
            .map(|node| (node.id.clone(), node.internal.content_digest.clone()))
            .collect()
    };

    assert_eq!(digests(&first), digests(&second));
}

#[test]
fn test_cyclic_items_assemble_without_error() {
    let types = vec![json!({ "system": { "codename": "article" } })];
    let items = vec![json!({
        "system": { "codename": "loop", "type": "article", "language": "en" },
        "elements": { "next": { "type": "modular_content" } },
        "next": [{
            "system": { "codename": "loop", "type": "article", "language": "en" },
            "elements": {}
        }]
    })];

    let graph = ContentGraph::build(&types, &items).unwrap();

    let node = graph.node("item-loop-en").unwrap();
    // The cycle marker still carries a reference shape, so the item links to
    // itself and records itself as a user.
    assert_eq!(
        node.linked_fields.get("nextLinked"),
        Some(&vec!["item-loop-en".to_string()])
    );
    assert_eq!(node.used_by_content_items, vec!["item-loop-en".to_string()]);
}

#[test]
fn test_malformed_record_rejected_at_boundary() {
    let types = vec![json!({ "system": { "codename": "article" } })];
    let items = vec![json!({ "system": { "codename": "post_1" } })];

    let err = ContentGraph::build(&types, &items).unwrap_err();
    assert!(matches!(err, GraphError::MalformedRecord { .. }));
}

#[test]
fn test_into_nodes_hands_off_types_then_items() {
    let (types, items) = snapshot();
    let graph = ContentGraph::build(&types, &items).unwrap();

    let nodes = graph.into_nodes();
    assert_eq!(nodes.len(), 6);
    assert_eq!(nodes[0].id, "type-article");
    assert_eq!(nodes[2].id, "item-post-1-en");
}
