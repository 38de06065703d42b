//! Node identity and content digest.
//!
//! Identity is a deterministic business key built from kind, codename, and
//! language; the digest is a SHA-256 over a canonical JSON serialization.
//! Both are pure functions: equal inputs always yield equal outputs, which is
//! what makes the digest usable for change detection.

use crate::graph::node::{NodeId, NodeKind};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Derive a stable, human-traceable node identifier.
///
/// The id is `<kind>-<codename>` or `<kind>-<codename>-<language>`, with
/// every segment normalized to lowercase, hyphen-separated form. Two calls
/// with equal inputs always yield equal ids; this is the sole mechanism for
/// looking up a node by business key.
///
/// # Examples
///
/// ```
/// use contentgraph::{make_node_id, NodeKind};
///
/// assert_eq!(make_node_id(NodeKind::Item, "my_article", Some("en-US")),
///            "item-my-article-en-us");
/// assert_eq!(make_node_id(NodeKind::Type, "Landing Page", None),
///            "type-landing-page");
/// ```
pub fn make_node_id(kind: NodeKind, codename: &str, language: Option<&str>) -> NodeId {
    let mut id = format!("{}-{}", kind.label(), normalize_segment(codename));
    if let Some(language) = language {
        id.push('-');
        id.push_str(&normalize_segment(language));
    }
    id
}

/// Normalize a codename or language to hyphen-separated lowercase.
fn normalize_segment(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Normalize a codename or discriminant to PascalCase.
///
/// Splits on hyphens, underscores, and whitespace; used when composing the
/// schema/category label consumed by the external query layer.
pub fn pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Compute the canonical serialization and content hash of a payload.
///
/// Serialization is canonical because object keys are sorted (the default
/// `serde_json` map is BTree-backed), so structurally equal payloads hash
/// identically regardless of key insertion order. Cycle safety is structural:
/// payloads are value trees, with any source-graph cycles already broken by
/// value during flattening.
///
/// Returns `(serialized, hash)` where `hash` is the hex-encoded SHA-256 of
/// the serialized UTF-8 bytes.
pub fn digest(payload: &Value) -> (String, String) {
    // Serializing a Value cannot fail; substitute null rather than erroring
    // to honor the never-fail digest contract.
    let serialized =
        serde_json::to_string(payload).unwrap_or_else(|_| Value::Null.to_string());
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    (serialized, hash)
}

/// Digest any serializable payload.
///
/// A payload that cannot be converted to a JSON value is replaced with
/// `null` rather than failing the digest.
pub fn digest_of<T: Serialize>(payload: &T) -> (String, String) {
    let value = serde_json::to_value(payload).unwrap_or(Value::Null);
    digest(&value)
}
