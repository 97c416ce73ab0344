//! Tree normalization: raw records in, canonical nodes out.
//!
//! Raw input is a loosely-typed JSON forest. Every record is defaulted into
//! a [`NodeData`] and inserted into the arena; children are normalized
//! recursively. Records carrying an explicit `id` keep it, and the id
//! generator is advanced past it so re-normalizing exported data never
//! reassigns an identity.

use generational_arena::Index;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::arena::TreeArena;
use crate::config::TreeConfig;
use crate::ident::IdGenerator;
use crate::node::NodeData;

/// Normalizer borrowing the mutable tree state for one ingest pass.
pub struct Normalizer<'a> {
    pub(crate) arena: &'a mut TreeArena,
    pub(crate) ids: &'a mut IdGenerator,
    pub(crate) config: &'a TreeConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        arena: &'a mut TreeArena,
        ids: &'a mut IdGenerator,
        config: &'a TreeConfig,
    ) -> Self {
        Self { arena, ids, config }
    }

    /// Normalize a whole raw forest into the arena as root nodes.
    /// Tolerates an empty sequence (no-op).
    #[instrument(level = "debug", skip(self, items), fields(count = items.len()))]
    pub fn ingest_forest(&mut self, items: &[Value]) {
        for item in items {
            self.ingest(item, None);
        }
    }

    /// Normalize one record and its children under `parent`.
    pub fn ingest(&mut self, raw: &Value, parent: Option<Index>) -> Index {
        let data = self.data_from_raw(raw);
        let idx = self.arena.insert_node(data, parent);
        if let Some(children) = raw.get("children").and_then(Value::as_array) {
            for child in children {
                self.ingest(child, Some(idx));
            }
        }
        idx
    }

    /// Normalize one record without looking at its children, leaving the
    /// node detached. Used by the load coordinator, which substitutes a
    /// loading placeholder for whatever children the record claimed.
    pub fn ingest_shallow(&mut self, raw: &Value) -> Index {
        let data = self.data_from_raw(raw);
        self.arena.insert_detached(data)
    }

    /// Append a fresh loading placeholder under `parent`.
    pub fn placeholder_under(&mut self, parent: Index) -> Index {
        let data = NodeData::placeholder(self.ids.next_id(), &self.config.loading_text);
        self.arena.insert_node(data, Some(parent))
    }

    /// Build a detached loading placeholder node.
    pub fn placeholder_detached(&mut self) -> Index {
        let data = NodeData::placeholder(self.ids.next_id(), &self.config.loading_text);
        self.arena.insert_detached(data)
    }

    fn data_from_raw(&mut self, raw: &Value) -> NodeData {
        let id = match NodeData::explicit_id(raw) {
            Some(id) => {
                self.ids.observe(id);
                id
            }
            None => self.ids.next_id(),
        };
        NodeData::from_raw(raw, id, self.config)
    }
}

/// Export the forest back into raw records, inverse of ingest. Normalizing
/// the exported records again yields an equal tree with identical ids.
#[instrument(level = "debug", skip(arena, config))]
pub fn export_forest(arena: &TreeArena, config: &TreeConfig) -> Vec<Value> {
    arena
        .roots()
        .iter()
        .map(|&root| export_node(arena, root, config))
        .collect()
}

fn export_node(arena: &TreeArena, idx: Index, config: &TreeConfig) -> Value {
    let Some(node) = arena.get_node(idx) else {
        return Value::Null;
    };
    let data = &node.data;

    let mut record = Map::new();
    record.insert("id".to_string(), Value::from(data.id.0));
    record.insert(config.text_field.clone(), Value::from(data.label.clone()));
    record.insert(config.value_field.clone(), Value::from(data.value.clone()));
    if let Some(icon) = &data.icon {
        record.insert("icon".to_string(), Value::from(icon.clone()));
    }
    record.insert("opened".to_string(), Value::from(data.opened));
    record.insert("selected".to_string(), Value::from(data.selected));
    record.insert("disabled".to_string(), Value::from(data.disabled));
    record.insert("loading".to_string(), Value::from(data.loading));
    record.insert(
        "children".to_string(),
        Value::Array(
            node.children
                .iter()
                .map(|&child| export_node(arena, child, config))
                .collect(),
        ),
    );

    Value::Object(record)
}
