//! Packet field maps
//!
//! Both a project's packet format and an event's packet are flat maps from
//! field name to an opaque value. Field names are usually numeric-like
//! (header byte offsets), but nothing here assumes that - canonical ordering
//! is applied where the build payload is produced, not at storage time.

use std::collections::BTreeMap;

/// Field name → opaque value mapping shared by packet formats and packets
pub type FieldMap = BTreeMap<String, serde_json::Value>;
