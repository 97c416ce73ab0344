//! Tree session: the façade a widget talks to.
//!
//! Owns the arena, configuration, id generator, event queue, drag slot, and
//! pending-load table. Gesture entry points (`on_*`) are permissive: a
//! rejected or meaningless gesture is a silent no-op, matching how a UI
//! treats clicks and drops that go nowhere. The typed siblings
//! ([`begin_drag`](Tree::begin_drag), [`drop_on`](Tree::drop_on),
//! [`apply_load`](Tree::apply_load)) surface the rejection reason.
//!
//! All mutation happens synchronously inside `&mut self` calls; the async
//! child provider lives outside the crate and talks through the
//! [`LoadRequest`] / [`complete_load`](Tree::complete_load) pair.

use std::collections::HashMap;

use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::arena::TreeArena;
use crate::config::TreeConfig;
use crate::drag::{self, DragSession};
use crate::error::{TreeError, TreeResult};
use crate::events::TreeEvent;
use crate::ident::{IdGenerator, NodeId};
use crate::load::{self, LoadRequest, LoadTarget};
use crate::node::NodeData;
use crate::normalize::{export_forest, Normalizer};
use crate::select;

/// Interactive tree state for one widget instance.
#[derive(Debug, Default)]
pub struct Tree {
    arena: TreeArena,
    config: TreeConfig,
    ids: IdGenerator,
    events: Vec<TreeEvent>,
    drag: Option<DragSession>,
    pending_loads: HashMap<LoadTarget, u64>,
    load_generation: u64,
}

impl Tree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Tree with an injected id generator, e.g. one starting past the ids of
    /// sibling tree instances.
    pub fn with_generator(config: TreeConfig, ids: IdGenerator) -> Self {
        Self {
            config,
            ids,
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// Replace the whole forest with freshly normalized raw records.
    ///
    /// Under `lazy_load` the first root is replaced with a loading
    /// placeholder and a bootstrap request for the root collection is
    /// returned; the host feeds the provider result back through
    /// [`complete_load`](Self::complete_load).
    #[instrument(level = "debug", skip(self, items), fields(count = items.len()))]
    pub fn set_data(&mut self, items: &[Value]) -> Option<LoadRequest> {
        self.arena.clear();
        self.drag = None;
        self.pending_loads.clear();

        let mut normalizer = Normalizer::new(&mut self.arena, &mut self.ids, &self.config);
        normalizer.ingest_forest(items);

        if !self.config.lazy_load {
            return None;
        }
        let placeholder = {
            let mut normalizer = Normalizer::new(&mut self.arena, &mut self.ids, &self.config);
            normalizer.placeholder_detached()
        };
        self.arena.place_at(None, 0, placeholder);

        let generation = self.next_generation();
        self.pending_loads.insert(LoadTarget::Root, generation);
        Some(LoadRequest {
            target: LoadTarget::Root,
            generation,
        })
    }

    /// Export the forest back into raw records (inverse of
    /// [`set_data`](Self::set_data), ids included).
    pub fn to_raw(&self) -> Vec<Value> {
        export_forest(&self.arena, &self.config)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Click gesture. Applies the configured selection policy and emits
    /// [`TreeEvent::ItemClick`] once the state has settled. Unknown ids are
    /// ignored.
    pub fn on_click(&mut self, id: NodeId) {
        let Some(idx) = self.arena.lookup(id) else {
            return;
        };
        if self.config.multiple {
            select::toggle_selected(&mut self.arena, idx);
            if self.config.allow_batch {
                select::cascade_selection(&mut self.arena, idx);
            }
        } else {
            select::select_single(&mut self.arena, idx);
        }
        self.events.push(TreeEvent::ItemClick { id });
    }

    // ------------------------------------------------------------------
    // Lazy loading
    // ------------------------------------------------------------------

    /// Toggle gesture: flip `opened`. On the closed-to-open transition of a
    /// node whose children are still pending fetch, returns the load request
    /// for the host's provider. Toggling an already-loaded node never
    /// re-requests.
    pub fn on_toggle(&mut self, id: NodeId) -> Option<LoadRequest> {
        let idx = self.arena.lookup(id)?;
        let opened = {
            let node = self.arena.get_node_mut(idx)?;
            node.data.opened = !node.data.opened;
            node.data.opened
        };
        if !opened || !self.config.lazy_load {
            return None;
        }
        if !load::placeholder_pending(&self.arena, Some(idx)) {
            return None;
        }

        let generation = self.next_generation();
        let target = LoadTarget::Node(id);
        self.pending_loads.insert(target, generation);
        debug!(%target, generation, "child load requested");
        Some(LoadRequest { target, generation })
    }

    /// Apply a provider completion, or say why it was discarded: the request
    /// generation is stale (superseded by a newer request or by a data
    /// replacement), the node is gone, or no placeholder remains.
    pub fn apply_load(&mut self, request: LoadRequest, items: &[Value]) -> TreeResult<()> {
        match self.pending_loads.get(&request.target) {
            Some(&current) if current == request.generation => {}
            _ => {
                return Err(TreeError::StaleLoad {
                    target: request.target,
                    generation: request.generation,
                })
            }
        }
        let parent = match request.target {
            LoadTarget::Root => None,
            LoadTarget::Node(id) => {
                Some(self.arena.lookup(id).ok_or(TreeError::UnknownNode(id))?)
            }
        };
        if !load::placeholder_pending(&self.arena, parent) {
            return Err(TreeError::NoPlaceholder {
                target: request.target,
            });
        }

        let mut normalizer = Normalizer::new(&mut self.arena, &mut self.ids, &self.config);
        load::apply(&mut normalizer, parent, items);
        self.pending_loads.remove(&request.target);
        Ok(())
    }

    /// Permissive form of [`apply_load`](Self::apply_load): discarded
    /// completions are logged and ignored.
    pub fn complete_load(&mut self, request: LoadRequest, items: &[Value]) {
        if let Err(err) = self.apply_load(request, items) {
            debug!(%err, "load completion discarded");
        }
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Open a drag session for `id`. Rejected when dragging is disabled or
    /// another drag is already in flight.
    pub fn begin_drag(&mut self, id: NodeId) -> TreeResult<()> {
        if !self.config.draggable {
            return Err(TreeError::DraggingDisabled);
        }
        let session = drag::begin(&self.arena, self.drag.as_ref(), id)?;
        debug!(
            node = %session.node_id,
            origin_index = session.origin_index,
            from_root = session.origin_parent.is_none(),
            "drag started"
        );
        self.drag = Some(session);
        Ok(())
    }

    /// Drag-start gesture; silent on rejection.
    pub fn on_drag_start(&mut self, id: NodeId) {
        if let Err(err) = self.begin_drag(id) {
            debug!(%err, "drag start ignored");
        }
    }

    /// Drag-end gesture: abort or post-drop cleanup. Clears the session
    /// unconditionally.
    pub fn on_drag_end(&mut self) {
        if self.config.draggable {
            self.drag = None;
        }
    }

    /// Drop the in-flight node onto `target_id`. On success the node is
    /// moved atomically, the target auto-expands, the session is cleared,
    /// and [`TreeEvent::ItemDrop`] is emitted.
    pub fn drop_on(&mut self, target_id: NodeId) -> TreeResult<()> {
        if !self.config.draggable {
            return Err(TreeError::DraggingDisabled);
        }
        let session = self.drag.ok_or(TreeError::NoActiveDrag)?;
        drag::commit(&mut self.arena, &session, target_id)?;
        self.drag = None;
        self.events.push(TreeEvent::ItemDrop {
            id: session.node_id,
            new_parent: target_id,
        });
        Ok(())
    }

    /// Drop gesture; invalid targets leave the tree untouched and emit
    /// nothing.
    pub fn on_drop(&mut self, target_id: NodeId) {
        if let Err(err) = self.drop_on(target_id) {
            debug!(%err, "drop ignored");
        }
    }

    /// Id of the node currently being dragged, if any.
    pub fn active_drag(&self) -> Option<NodeId> {
        self.drag.as_ref().map(|session| session.node_id)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        let idx = self.arena.lookup(id)?;
        self.arena.get_node(idx).map(|node| &node.data)
    }

    pub fn parent_id(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.arena.lookup(id)?;
        let parent = self.arena.get_node(idx)?.parent?;
        self.arena.get_node(parent).map(|node| node.data.id)
    }

    pub fn root_ids(&self) -> Vec<NodeId> {
        self.arena
            .roots()
            .iter()
            .filter_map(|&idx| self.arena.get_node(idx))
            .map(|node| node.data.id)
            .collect_vec()
    }

    pub fn children_ids(&self, id: NodeId) -> Vec<NodeId> {
        let Some(idx) = self.arena.lookup(id) else {
            return Vec::new();
        };
        self.arena
            .collection(Some(idx))
            .iter()
            .filter_map(|&child| self.arena.get_node(child))
            .map(|node| node.data.id)
            .collect_vec()
    }

    /// Node payloads in pre-order across the forest.
    pub fn iter(&self) -> impl Iterator<Item = &NodeData> {
        self.arena.iter().map(|(_, node)| &node.data)
    }

    /// Ids of all selected nodes, in pre-order.
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|data| data.selected)
            .map(|data| data.id)
            .collect_vec()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Drain the accumulated notifications.
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    fn next_generation(&mut self) -> u64 {
        self.load_generation += 1;
        self.load_generation
    }
}
