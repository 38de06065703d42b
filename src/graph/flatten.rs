//! Content flattener: recursive element-map rewrite with cycle detection.
//!
//! Descends into embedded referenced items, substituting a safe marker when
//! a cycle is detected. Cycles are expected, not exceptional: they produce a
//! diagnostic log line and a degraded-but-valid result, never an error.

use crate::record::{ContentItemRecord, FieldValue, RichTextField, SystemInfo};
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A content item with its embedded references rewritten in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlattenedItem {
    /// System metadata of the source item
    pub system: SystemInfo,
    /// Rewritten element map; `None` when a cycle cut the branch here
    pub elements: Option<BTreeMap<String, FlattenedField>>,
    /// Whether this item is a cycle marker instead of a full flattening
    #[serde(rename = "cycleDetected", skip_serializing_if = "is_false")]
    pub cycle_detected: bool,
}

fn is_false(flag: &bool) -> bool {
    !flag
}

/// One flattened field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlattenedField {
    /// Recursively flattened embedded items, in source order
    Items(Vec<FlattenedItem>),
    /// Rich text, copied through unchanged (links resolve later)
    RichText(RichTextField),
    /// Scalars, plain lists, unknown shapes, copied through unchanged
    Scalar(Value),
}

/// Recursively flatten a content item's field map.
///
/// `visited` is the ordered path of codenames on the current recursion
/// branch. Each descent extends a *clone* of the path, so sibling branches
/// never see each other's visited sets; only ancestor chains count. Depth is
/// bounded only by the cycle check; arbitrarily deep non-cyclic nesting
/// flattens completely.
///
/// On a cycle (the item's codename is already on the path) the recursion
/// stops: one diagnostic line with the full path joined by ` -> ` is logged,
/// and a marker with `elements: None` and `cycle_detected: true` is
/// returned. The input is never mutated.
pub fn flatten(item: &ContentItemRecord, visited: &[String]) -> FlattenedItem {
    let codename = &item.system.codename;

    if visited.iter().any(|seen| seen == codename) {
        let mut segments: Vec<&str> = visited.iter().map(String::as_str).collect();
        segments.push(codename);
        warn!("content cycle detected: {}", segments.join(" -> "));
        return FlattenedItem {
            system: item.system.clone(),
            elements: None,
            cycle_detected: true,
        };
    }

    let mut path = visited.to_vec();
    path.push(codename.clone());

    let mut elements = BTreeMap::new();
    for (name, field) in &item.fields {
        let flattened = match field {
            FieldValue::RichText(rich_text) => FlattenedField::RichText(rich_text.clone()),
            FieldValue::Items(nested) => FlattenedField::Items(
                nested.iter().map(|child| flatten(child, &path)).collect(),
            ),
            FieldValue::Scalar(value) => FlattenedField::Scalar(value.clone()),
        };
        elements.insert(name.clone(), flattened);
    }

    FlattenedItem {
        system: item.system.clone(),
        elements: Some(elements),
        cycle_detected: false,
    }
}
