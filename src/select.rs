//! Selection engine.
//!
//! Two mutually exclusive policies, picked by configuration: single-select
//! (clear the whole forest, then select the clicked node) and batch cascade
//! (propagate a toggled parent's state to every enabled descendant). Both
//! operate on the canonical arena, so collapsed subtrees participate like
//! any other node.

use generational_arena::Index;
use itertools::Itertools;
use tracing::instrument;

use crate::arena::TreeArena;

/// Single-select: clear `selected` on every non-disabled node of the forest,
/// then select `idx`. At most one node is selected afterwards.
#[instrument(level = "debug", skip(arena))]
pub fn select_single(arena: &mut TreeArena, idx: Index) {
    let all = arena.iter().map(|(i, _)| i).collect_vec();
    for node_idx in all {
        if let Some(node) = arena.get_node_mut(node_idx) {
            if !node.data.disabled {
                node.data.selected = false;
            }
        }
    }
    if let Some(node) = arena.get_node_mut(idx) {
        node.data.selected = true;
    }
}

/// Flip `selected` on `idx` and return the new value.
pub fn toggle_selected(arena: &mut TreeArena, idx: Index) -> bool {
    match arena.get_node_mut(idx) {
        Some(node) => {
            node.data.selected = !node.data.selected;
            node.data.selected
        }
        None => false,
    }
}

/// Batch cascade: set every non-disabled descendant's `selected` to the
/// current state of `idx`. A disabled descendant keeps its own value, but
/// the walk does not stop there — its children are still visited.
#[instrument(level = "debug", skip(arena))]
pub fn cascade_selection(arena: &mut TreeArena, idx: Index) {
    let Some(state) = arena.get_node(idx).map(|node| node.data.selected) else {
        return;
    };
    for node_idx in arena.descendants(idx) {
        if let Some(node) = arena.get_node_mut(node_idx) {
            if !node.data.disabled {
                node.data.selected = state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::ident::IdGenerator;
    use crate::normalize::Normalizer;
    use serde_json::json;

    fn build(raw: serde_json::Value) -> TreeArena {
        let mut arena = TreeArena::new();
        let mut ids = IdGenerator::new();
        let config = TreeConfig::default();
        Normalizer::new(&mut arena, &mut ids, &config)
            .ingest_forest(raw.as_array().unwrap());
        arena
    }

    fn selected_labels(arena: &TreeArena) -> Vec<String> {
        arena
            .iter()
            .filter(|(_, n)| n.data.selected)
            .map(|(_, n)| n.data.label.clone())
            .collect()
    }

    #[test]
    fn given_prior_selection_when_single_selecting_then_only_clicked_node_remains() {
        let mut arena = build(json!([
            {"text": "a", "selected": true},
            {"text": "b", "children": [{"text": "b1", "selected": true}]}
        ]));
        let b1 = arena.iter().find(|(_, n)| n.data.label == "b1").unwrap().0;

        select_single(&mut arena, b1);
        assert_eq!(selected_labels(&arena), ["b1"]);
    }

    #[test]
    fn given_disabled_selected_node_when_single_selecting_then_it_is_left_untouched() {
        let mut arena = build(json!([
            {"text": "locked", "selected": true, "disabled": true},
            {"text": "free"}
        ]));
        let free = arena.iter().find(|(_, n)| n.data.label == "free").unwrap().0;

        select_single(&mut arena, free);
        assert_eq!(selected_labels(&arena), ["locked", "free"]);
    }

    #[test]
    fn given_parent_toggled_on_when_cascading_then_enabled_descendants_follow() {
        let mut arena = build(json!([{
            "text": "p",
            "children": [
                {"text": "a"},
                {"text": "b"},
                {"text": "c", "disabled": true, "children": [{"text": "c1"}]}
            ]
        }]));
        let p = arena.roots()[0];

        toggle_selected(&mut arena, p);
        cascade_selection(&mut arena, p);

        // c stays unchanged, but the walk continues through it into c1
        assert_eq!(selected_labels(&arena), ["p", "a", "b", "c1"]);
    }

    #[test]
    fn given_parent_toggled_off_when_cascading_then_descendants_are_deselected() {
        let mut arena = build(json!([{
            "text": "p",
            "selected": true,
            "children": [{"text": "a", "selected": true}]
        }]));
        let p = arena.roots()[0];

        toggle_selected(&mut arena, p);
        cascade_selection(&mut arena, p);
        assert!(selected_labels(&arena).is_empty());
    }
}
