//! Drag-reparent tests: session guards, validity checks, atomic moves

use arbor::{NodeId, Tree, TreeConfig, TreeEvent, TreeError};
use rstest::{fixture, rstest};
use serde_json::json;

fn id_of(tree: &Tree, label: &str) -> NodeId {
    tree.iter()
        .find(|data| data.label == label)
        .map(|data| data.id)
        .unwrap()
}

// p
// ├── a
// ├── b
// └── x
// t
//   └── u
#[fixture]
fn tree() -> Tree {
    let mut tree = Tree::new(TreeConfig {
        draggable: true,
        ..TreeConfig::default()
    });
    tree.set_data(
        json!([
            {"text": "p", "children": [{"text": "a"}, {"text": "b"}, {"text": "x"}]},
            {"text": "t", "children": [{"text": "u"}]}
        ])
        .as_array()
        .unwrap(),
    );
    tree
}

// ============================================================
// Successful Move Tests
// ============================================================

#[rstest]
fn given_leaf_at_index_two_when_dropped_on_target_then_move_is_atomic(mut tree: Tree) {
    let p = id_of(&tree, "p");
    let t = id_of(&tree, "t");
    let x = id_of(&tree, "x");
    assert_eq!(tree.children_ids(p).len(), 3);

    tree.on_drag_start(x);
    tree.on_drop(t);
    tree.on_drag_end();

    let p_children = tree.children_ids(p);
    assert_eq!(p_children.len(), 2, "source lost exactly the moved node");
    assert!(!p_children.contains(&x));
    let t_children = tree.children_ids(t);
    assert_eq!(*t_children.last().unwrap(), x, "appended to the target");
    assert!(tree.node(t).unwrap().opened, "target auto-expands");
    assert_eq!(tree.parent_id(x), Some(t));
    assert_eq!(
        tree.take_events(),
        [TreeEvent::ItemDrop { id: x, new_parent: t }]
    );
}

#[rstest]
fn given_root_node_when_dropped_on_target_then_it_stops_being_a_root(mut tree: Tree) {
    let p = id_of(&tree, "p");
    let t = id_of(&tree, "t");

    tree.on_drag_start(t);
    // t onto p: valid, t is not p's child and p is not inside t
    tree.on_drop(p);

    assert_eq!(tree.root_ids(), [p]);
    assert_eq!(tree.parent_id(t), Some(p));
}

// ============================================================
// Validity Tests
// ============================================================

#[rstest]
#[case::onto_itself("x", "x")]
#[case::onto_current_container("x", "p")]
#[case::into_own_subtree("p", "a")]
fn given_illegal_target_when_dropping_then_tree_is_unchanged(
    mut tree: Tree,
    #[case] dragged: &str,
    #[case] target: &str,
) {
    let dragged = id_of(&tree, dragged);
    let target = id_of(&tree, target);
    let before = tree.to_raw();

    tree.on_drag_start(dragged);
    tree.on_drop(target);

    assert_eq!(tree.to_raw(), before, "no mutation on rejection");
    assert!(tree.take_events().is_empty(), "no notification on rejection");
    assert_eq!(
        tree.active_drag(),
        Some(dragged),
        "session survives a rejected drop"
    );
}

#[rstest]
fn given_duplicate_child_when_dropping_then_rejected_with_reason(mut tree: Tree) {
    let p = id_of(&tree, "p");
    let x = id_of(&tree, "x");

    tree.begin_drag(x).unwrap();
    let err = tree.drop_on(p).unwrap_err();
    assert!(matches!(err, TreeError::AlreadyAttached { node, parent }
        if node == x && parent == p));
}

// ============================================================
// Session Guard Tests
// ============================================================

#[rstest]
fn given_active_drag_when_starting_another_then_first_session_is_kept(mut tree: Tree) {
    let a = id_of(&tree, "a");
    let b = id_of(&tree, "b");

    tree.on_drag_start(a);
    tree.on_drag_start(b);
    assert_eq!(tree.active_drag(), Some(a));

    let err = tree.begin_drag(b).unwrap_err();
    assert!(matches!(err, TreeError::DragInFlight(id) if id == a));
}

#[rstest]
fn given_no_session_when_dropping_then_nothing_happens(mut tree: Tree) {
    let t = id_of(&tree, "t");
    let before = tree.to_raw();

    tree.on_drop(t);
    assert_eq!(tree.to_raw(), before);
    assert!(tree.take_events().is_empty());
}

#[rstest]
fn given_ended_drag_when_dropping_then_nothing_happens(mut tree: Tree) {
    let x = id_of(&tree, "x");
    let t = id_of(&tree, "t");

    tree.on_drag_start(x);
    tree.on_drag_end();
    assert_eq!(tree.active_drag(), None);

    let before = tree.to_raw();
    tree.on_drop(t);
    assert_eq!(tree.to_raw(), before);
}

#[test]
fn given_dragging_disabled_when_gesturing_then_everything_is_a_no_op() {
    let mut tree = Tree::new(TreeConfig::default());
    tree.set_data(
        json!([{"text": "p", "children": [{"text": "x"}]}, {"text": "t"}])
            .as_array()
            .unwrap(),
    );
    let x = id_of(&tree, "x");
    let t = id_of(&tree, "t");
    let before = tree.to_raw();

    tree.on_drag_start(x);
    assert_eq!(tree.active_drag(), None);
    tree.on_drop(t);
    assert_eq!(tree.to_raw(), before);
    assert!(matches!(
        tree.begin_drag(x),
        Err(TreeError::DraggingDisabled)
    ));
}

#[rstest]
fn given_successful_drop_when_finalized_then_session_is_cleared(mut tree: Tree) {
    let x = id_of(&tree, "x");
    let t = id_of(&tree, "t");

    tree.on_drag_start(x);
    tree.on_drop(t);
    assert_eq!(tree.active_drag(), None, "drop finalization clears the slot");

    // a fresh drag can start immediately
    let a = id_of(&tree, "a");
    tree.begin_drag(a).unwrap();
}
