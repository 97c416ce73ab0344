//! Arena-backed node storage.
//!
//! Uses a generational arena for memory-safe node references and O(1)
//! lookups. A tree is a rooted forest: an ordered sequence of root nodes,
//! each owning an ordered sequence of children, recursively. Ownership is
//! strictly hierarchical; the structural operations here keep parent and
//! child links consistent and never introduce sharing or cycles.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::ident::NodeId;
use crate::node::NodeData;

/// Tree node: payload plus structural wiring.
#[derive(Debug)]
pub struct TreeNode {
    /// Node payload read by renderers
    pub data: NodeData,
    /// Index of the parent node, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in display order
    pub children: Vec<Index>,
}

/// Arena-based storage for one tree instance.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Ordered root nodes of the forest
    roots: Vec<Index>,
    /// Id index for O(1) lookup by stable node id
    by_id: HashMap<NodeId, Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Insert a node under `parent`, appending to its children; a node with
    /// no parent becomes the last root.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let id = data.id;
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.by_id.insert(id, node_idx);

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    /// Insert a node that is not yet attached anywhere. The caller must
    /// place it via [`place_at`](Self::place_at) or [`attach`](Self::attach).
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_detached(&mut self, data: NodeData) -> Index {
        let id = data.id;
        let node = TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        self.by_id.insert(id, node_idx);
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn lookup(&self, id: NodeId) -> Option<Index> {
        self.by_id.get(&id).copied()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Children of `parent`, or the root sequence when `parent` is None.
    pub fn collection(&self, parent: Option<Index>) -> &[Index] {
        match parent {
            Some(idx) => self
                .arena
                .get(idx)
                .map(|node| node.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    fn collection_mut(&mut self, parent: Option<Index>) -> Option<&mut Vec<Index>> {
        match parent {
            Some(idx) => self.arena.get_mut(idx).map(|node| &mut node.children),
            None => Some(&mut self.roots),
        }
    }

    /// Put `node_idx` at position `pos` of `parent`'s children (or the root
    /// sequence), replacing and freeing any subtree already occupying that
    /// position. Positions past the end append.
    #[instrument(level = "trace", skip(self))]
    pub fn place_at(&mut self, parent: Option<Index>, pos: usize, node_idx: Index) {
        let displaced = match self.collection_mut(parent) {
            Some(slot) => {
                if pos < slot.len() {
                    let old = slot[pos];
                    slot[pos] = node_idx;
                    Some(old)
                } else {
                    slot.push(node_idx);
                    None
                }
            }
            None => return,
        };
        if let Some(node) = self.arena.get_mut(node_idx) {
            node.parent = parent;
        }
        if let Some(old_idx) = displaced {
            self.free_subtree(old_idx);
        }
    }

    /// Unhook `idx` from its current position, leaving it detached but alive.
    /// Returns the previous parent and position.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, idx: Index) -> Option<(Option<Index>, usize)> {
        let parent = self.arena.get(idx)?.parent;
        let slot = self.collection_mut(parent)?;
        let pos = slot.iter().position(|&child| child == idx)?;
        slot.remove(pos);
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = None;
        }
        Some((parent, pos))
    }

    /// Append a detached node to `parent`'s children.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, idx: Index, parent: Index) {
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(idx);
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = Some(parent);
        }
    }

    /// Remove every node of a collection, freeing the subtrees.
    #[instrument(level = "trace", skip(self))]
    pub fn clear_collection(&mut self, parent: Option<Index>) {
        let drained = match self.collection_mut(parent) {
            Some(slot) => std::mem::take(slot),
            None => return,
        };
        for idx in drained {
            self.free_subtree(idx);
        }
    }

    /// Drop a subtree's arena entries and id mappings. The root of the
    /// subtree must already be out of every child/root sequence.
    fn free_subtree(&mut self, idx: Index) {
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                self.by_id.remove(&node.data.id);
                stack.extend(node.children);
            }
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.roots.clear();
        self.by_id.clear();
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// True if `ancestor` lies on the parent chain of `idx`.
    pub fn is_ancestor(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = self.arena.get(idx).and_then(|node| node.parent);
        while let Some(parent_idx) = current {
            if parent_idx == ancestor {
                return true;
            }
            current = self.arena.get(parent_idx).and_then(|node| node.parent);
        }
        false
    }

    /// Pre-order indices of the subtree below `idx`, excluding `idx` itself.
    pub fn descendants(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut stack: Vec<Index> = match self.arena.get(idx) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return result,
        };
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(node) = self.arena.get(current) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        result
    }

    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Depth of the deepest root tree; an empty forest has depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Labels of all leaf nodes (nodes with no children), in display order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_labels(&self) -> Vec<String> {
        let mut leaves = Vec::new();
        for &root in &self.roots {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, node_idx: Index, leaves: &mut Vec<String>) {
        if let Some(node) = self.get_node(node_idx) {
            if node.children.is_empty() {
                leaves.push(node.data.label.clone());
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }
}

/// Pre-order traversal over the whole forest, left to right.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal over the whole forest.
pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&root| (root, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
