//! Tree behavior configuration.

use serde::{Deserialize, Serialize};

/// Behavior switches and field mappings for one tree instance.
///
/// Raw records are loosely typed; `text_field` and `value_field` name the
/// record keys the normalizer reads the label and value from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeConfig {
    /// Allow more than one selected node.
    pub multiple: bool,
    /// With `multiple`: cascade a toggled selection to all enabled descendants.
    pub allow_batch: bool,
    /// Enable the drag-reparent gestures.
    pub draggable: bool,
    /// Defer child population to an external provider via the load protocol.
    pub lazy_load: bool,
    /// Record key holding the display label.
    pub text_field: String,
    /// Record key holding the logical value (falls back to the label).
    pub value_field: String,
    /// Label shown on the synthetic loading placeholder.
    pub loading_text: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            allow_batch: false,
            draggable: false,
            lazy_load: false,
            text_field: "text".to_string(),
            value_field: "value".to_string(),
            loading_text: "Loading...".to_string(),
        }
    }
}
