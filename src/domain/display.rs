//! Conversion of navigation trees into printable `termtree` trees

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeData, TreeArena, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Display text for one node: leaves show their id next to the label.
fn node_text(node: &TreeNode) -> String {
    match (&node.data, &node.id) {
        (NodeData::DatedLeaf { .. }, Some(id)) => format!("{} [{}]", node.label, id),
        _ => node.label.clone(),
    }
}

impl TreeNodeConvert for TreeArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root() {
            let root_text = self.get_node(root_idx).map(node_text).unwrap_or_default();
            let mut tree = Tree::new(root_text);

            fn build_tree(arena: &TreeArena, node_idx: Index, parent_tree: &mut Tree<String>) {
                for &child_idx in arena.children(node_idx) {
                    if let Some(child) = arena.get_node(child_idx) {
                        let mut child_tree = Tree::new(node_text(child));
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("Empty tree".to_string())
        }
    }
}
