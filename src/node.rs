//! Canonical node payload and raw-record field extraction.

use std::fmt;

use serde_json::Value;

use crate::config::TreeConfig;
use crate::ident::NodeId;

/// Data payload of one tree node.
///
/// Structural wiring (parent, children) lives in the arena; this is the part
/// a renderer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Stable identity, assigned on normalization and never reassigned.
    pub id: NodeId,
    /// Display text, read from the configured text field.
    pub label: String,
    /// Logical value, read from the configured value field; equals `label`
    /// when the record has no value field.
    pub value: String,
    /// Optional display hint, opaque to the core.
    pub icon: Option<String>,
    /// Whether descendants are currently expanded.
    pub opened: bool,
    /// Whether the node is in the selected set.
    pub selected: bool,
    /// Excluded from selection cascades when true.
    pub disabled: bool,
    /// True only on the synthetic "children pending fetch" placeholder.
    pub loading: bool,
}

impl NodeData {
    /// Build a payload from a loosely-typed raw record, defaulting every
    /// missing field. Any object-shaped input succeeds.
    pub fn from_raw(raw: &Value, id: NodeId, config: &TreeConfig) -> Self {
        let label = raw
            .get(&config.text_field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let value = raw
            .get(&config.value_field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| label.clone());
        let icon = raw
            .get("icon")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let flag = |name: &str| raw.get(name).and_then(Value::as_bool).unwrap_or(false);

        Self {
            id,
            label,
            value,
            icon,
            opened: flag("opened"),
            selected: flag("selected"),
            disabled: flag("disabled"),
            loading: flag("loading"),
        }
    }

    /// Synthetic placeholder standing in for not-yet-fetched children.
    pub fn placeholder(id: NodeId, loading_text: &str) -> Self {
        Self {
            id,
            label: loading_text.to_string(),
            value: loading_text.to_string(),
            icon: None,
            opened: false,
            selected: false,
            disabled: true,
            loading: true,
        }
    }

    /// Explicit id carried by a raw record, if any.
    pub fn explicit_id(raw: &Value) -> Option<NodeId> {
        raw.get("id").and_then(Value::as_u64).map(NodeId)
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
