//! Selection engine tests: single-select and batch cascade policies

use arbor::{NodeId, Tree, TreeConfig, TreeEvent};
use rstest::{fixture, rstest};
use serde_json::json;

fn id_of(tree: &Tree, label: &str) -> NodeId {
    tree.iter()
        .find(|data| data.label == label)
        .map(|data| data.id)
        .unwrap()
}

fn selected_labels(tree: &Tree) -> Vec<String> {
    tree.iter()
        .filter(|data| data.selected)
        .map(|data| data.label.clone())
        .collect()
}

// p
// ├── a
// ├── b
// └── c (disabled)
//     └── c1
#[fixture]
fn forest() -> serde_json::Value {
    json!([
        {"text": "p", "children": [
            {"text": "a"},
            {"text": "b"},
            {"text": "c", "disabled": true, "children": [{"text": "c1"}]}
        ]},
        {"text": "q"}
    ])
}

fn tree_with(config: TreeConfig, forest: &serde_json::Value) -> Tree {
    let mut tree = Tree::new(config);
    tree.set_data(forest.as_array().unwrap());
    tree
}

// ============================================================
// Single-Select Tests
// ============================================================

#[rstest]
fn given_any_click_sequence_when_single_selecting_then_at_most_one_node_is_selected(
    forest: serde_json::Value,
) {
    let mut tree = tree_with(TreeConfig::default(), &forest);

    for label in ["a", "q", "c1", "p", "b"] {
        tree.on_click(id_of(&tree, label));
        assert_eq!(
            selected_labels(&tree),
            [label],
            "exactly the clicked node is selected"
        );
    }
}

#[test]
fn given_disabled_selected_node_when_single_selecting_then_clear_pass_skips_it() {
    let mut tree = Tree::new(TreeConfig::default());
    tree.set_data(
        json!([
            {"text": "locked", "selected": true, "disabled": true},
            {"text": "free"}
        ])
        .as_array()
        .unwrap(),
    );

    tree.on_click(id_of(&tree, "free"));
    assert_eq!(selected_labels(&tree), ["locked", "free"]);
}

// ============================================================
// Batch-Select Tests
// ============================================================

#[rstest]
fn given_batch_mode_when_toggling_parent_on_then_enabled_descendants_follow(
    forest: serde_json::Value,
) {
    let config = TreeConfig {
        multiple: true,
        allow_batch: true,
        ..TreeConfig::default()
    };
    let mut tree = tree_with(config, &forest);

    tree.on_click(id_of(&tree, "p"));

    // a and b follow, disabled c keeps its value, but the cascade still
    // descends through c into c1
    assert_eq!(selected_labels(&tree), ["p", "a", "b", "c1"]);
}

#[rstest]
fn given_batch_mode_when_toggling_parent_twice_then_descendants_are_deselected(
    forest: serde_json::Value,
) {
    let config = TreeConfig {
        multiple: true,
        allow_batch: true,
        ..TreeConfig::default()
    };
    let mut tree = tree_with(config, &forest);

    let p = id_of(&tree, "p");
    tree.on_click(p);
    tree.on_click(p);
    assert!(selected_labels(&tree).is_empty());
}

#[rstest]
fn given_multiple_without_batch_when_clicking_then_nodes_toggle_independently(
    forest: serde_json::Value,
) {
    let config = TreeConfig {
        multiple: true,
        allow_batch: false,
        ..TreeConfig::default()
    };
    let mut tree = tree_with(config, &forest);

    tree.on_click(id_of(&tree, "p"));
    tree.on_click(id_of(&tree, "q"));
    assert_eq!(selected_labels(&tree), ["p", "q"], "no cascade to children");

    tree.on_click(id_of(&tree, "p"));
    assert_eq!(selected_labels(&tree), ["q"]);
}

// ============================================================
// Notification Tests
// ============================================================

#[rstest]
fn given_click_when_handled_then_item_click_event_carries_the_node(forest: serde_json::Value) {
    let mut tree = tree_with(TreeConfig::default(), &forest);
    let a = id_of(&tree, "a");

    tree.on_click(a);
    assert_eq!(tree.take_events(), [TreeEvent::ItemClick { id: a }]);
    assert!(tree.take_events().is_empty(), "queue drains");
}

#[rstest]
fn given_unknown_id_when_clicking_then_nothing_happens(forest: serde_json::Value) {
    let mut tree = tree_with(TreeConfig::default(), &forest);

    tree.on_click(NodeId(9999));
    assert!(selected_labels(&tree).is_empty());
    assert!(tree.take_events().is_empty());
}
