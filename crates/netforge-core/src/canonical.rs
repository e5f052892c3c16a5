//! Packet canonicalization and action encoding.
//!
//! Packet documents are field-name to value mappings, but the builder
//! consumes positional value lists. The canonical field order is: keys
//! that parse as finite numbers first, ascending by numeric value (with a
//! lexical tie-break for distinct spellings of the same number), then the
//! remaining keys in lexical order. The same rule orders a project's
//! `packet_format` keys, so every event's value list lines up positionally
//! across the whole project.

use netforge_model::{Event, EventAction, FieldMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// One event flattened for the builder: packet values in canonical field
/// order plus the encoded instruction list.
///
/// `actions` is a list so an event can grow to multiple instructions; today
/// every event yields exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    /// Packet field values, canonically ordered.
    pub packet: Vec<Value>,
    /// Encoded instruction strings.
    pub actions: Vec<String>,
}

fn numeric_key(key: &str) -> Option<f64> {
    key.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Returns the field names of `fields` in canonical order.
#[must_use]
pub fn canonical_order(fields: &FieldMap) -> Vec<String> {
    let mut keys: Vec<String> = fields.keys().cloned().collect();
    keys.sort_by(|a, b| compare_keys(a, b));
    keys
}

/// Encodes a structured action as the builder's instruction string.
#[must_use]
pub fn encode_action(action: &EventAction) -> String {
    match action {
        EventAction::Forward { port } => format!("fwd({port})"),
        EventAction::Modify { field, value } => format!("modify({field},{value})"),
        EventAction::Drop => "drop".to_string(),
    }
}

/// Flattens an event into its canonical builder shape.
///
/// Pure function of the event: values are projected in canonical key order
/// and the action becomes a single-element instruction list.
#[must_use]
pub fn canonicalize(event: &Event) -> CanonicalEvent {
    let packet = canonical_order(&event.packet)
        .into_iter()
        .filter_map(|key| event.packet.get(&key).cloned())
        .collect();
    CanonicalEvent {
        packet,
        actions: vec![encode_action(&event.action)],
    }
}
