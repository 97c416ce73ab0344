//! Lazy-load coordination.
//!
//! Child population can be deferred to an external asynchronous provider.
//! The protocol is placeholder-then-replace: an unloaded node carries a
//! single loading placeholder child; opening it yields a [`LoadRequest`]
//! the host hands to its provider, and the provider's result comes back
//! through [`Tree::complete_load`](crate::Tree::complete_load). Each request
//! is tagged with a generation; a completion whose generation is no longer
//! current is discarded, so a superseded fetch can never resurrect a stale
//! placeholder.

use std::fmt;

use generational_arena::Index;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::arena::TreeArena;
use crate::ident::NodeId;
use crate::normalize::Normalizer;

/// What a load request populates: a node's children, or the root collection
/// during the initial bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    Root,
    Node(NodeId),
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadTarget::Root => write!(f, "root"),
            LoadTarget::Node(id) => write!(f, "node {id}"),
        }
    }
}

/// Ticket for one in-flight child fetch. The host passes it back unchanged
/// together with the provider's raw records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub target: LoadTarget,
    pub generation: u64,
}

/// True if the collection's first element is a loading placeholder, i.e.
/// the children are still pending fetch.
pub(crate) fn placeholder_pending(arena: &TreeArena, parent: Option<Index>) -> bool {
    arena
        .collection(parent)
        .first()
        .and_then(|&idx| arena.get_node(idx))
        .map(|node| node.data.loading)
        .unwrap_or(false)
}

/// Apply a completed fetch to the target collection.
///
/// Non-empty input: record `i` is normalized, given a fresh placeholder as
/// its sole child (so expanding it re-triggers the protocol), and placed at
/// position `i`, displacing the placeholder. Empty input: the collection is
/// emptied and the target becomes a leaf.
#[instrument(level = "debug", skip(normalizer, items), fields(count = items.len()))]
pub(crate) fn apply(normalizer: &mut Normalizer, parent: Option<Index>, items: &[Value]) {
    if items.is_empty() {
        debug!("empty load result, clearing collection");
        normalizer.arena.clear_collection(parent);
        return;
    }
    for (pos, raw) in items.iter().enumerate() {
        let idx = normalizer.ingest_shallow(raw);
        normalizer.placeholder_under(idx);
        normalizer.arena.place_at(parent, pos, idx);
    }
}
