//! ASCII rendering of a tree for logs and debugging.

use std::fmt;

use generational_arena::Index;
use termtree::Tree as AsciiTree;

use crate::arena::TreeArena;
use crate::node::NodeData;
use crate::tree::Tree;

pub trait TreeRender {
    fn to_tree_string(&self) -> AsciiTree<String>;
}

impl TreeRender for TreeArena {
    fn to_tree_string(&self) -> AsciiTree<String> {
        match self.roots() {
            [] => AsciiTree::new("(empty tree)".to_string()),
            [root] => render_node(self, *root),
            roots => {
                let mut tree = AsciiTree::new(".".to_string());
                for &root in roots {
                    tree.push(render_node(self, root));
                }
                tree
            }
        }
    }
}

fn render_node(arena: &TreeArena, idx: Index) -> AsciiTree<String> {
    let Some(node) = arena.get_node(idx) else {
        return AsciiTree::new("(missing)".to_string());
    };
    let leaves: Vec<_> = node
        .children
        .iter()
        .map(|&child| render_node(arena, child))
        .collect();
    AsciiTree::new(node_line(&node.data)).with_leaves(leaves)
}

fn node_line(data: &NodeData) -> String {
    let mut line = data.label.clone();
    if data.selected {
        line.push_str(" (selected)");
    }
    if data.disabled {
        line.push_str(" (disabled)");
    }
    if data.loading {
        line.push_str(" (loading)");
    }
    line
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.arena().to_tree_string())
    }
}
