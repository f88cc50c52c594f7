//! Terminal tree rendering of a built hierarchy via `termtree`.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::HierarchyArena;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for HierarchyArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("Empty tree".to_string());
        };

        fn label(arena: &HierarchyArena, idx: Index) -> String {
            arena
                .get_node(idx)
                .map(|n| format!("{} [{}]", n.name, n.color.to_hex()))
                .unwrap_or_default()
        }

        fn build_tree(arena: &HierarchyArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            for &child_idx in arena.children(node_idx) {
                let mut child_tree = Tree::new(label(arena, child_idx));
                build_tree(arena, child_idx, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }

        let mut tree = Tree::new(label(self, root_idx));
        build_tree(self, root_idx, &mut tree);
        tree
    }
}
