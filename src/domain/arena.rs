//! Arena-backed storage for the classification hierarchy.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{HierarchyNode, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// Arena-based tree holding one built hierarchy.
///
/// Nodes keep arena handles to their parent and children. Insertion order is
/// recorded so the flattened pre-order (root first, each parent followed by
/// its complete subtree) is available without a traversal.
#[derive(Debug, Clone)]
pub struct HierarchyArena {
    /// Arena storage for all nodes
    arena: Arena<HierarchyNode>,
    /// Index of the synthetic root, None for empty trees
    root: Option<Index>,
    /// Handles in pre-order; `order[node.ordinal] == handle`
    order: Vec<Index>,
}

impl Default for HierarchyArena {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            order: Vec::new(),
        }
    }

    /// Insert a node under `parent`.
    ///
    /// Callers must insert in pre-order for `ordinal` to match the flattening.
    /// A parent that was a leaf becomes internal on its first child.
    #[instrument(level = "trace", skip(self, node), fields(name = %node.name))]
    pub fn insert_node(&mut self, mut node: HierarchyNode, parent: Option<Index>) -> Index {
        node.parent = parent;
        node.ordinal = self.order.len();
        let node_idx = self.arena.insert(node);
        self.order.push(node_idx);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.get_or_insert_with(Vec::new).push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&HierarchyNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut HierarchyNode> {
        self.arena.get_mut(idx)
    }

    /// Node lookup that treats a stale handle as a domain error.
    pub fn node(&self, idx: Index) -> DomainResult<&HierarchyNode> {
        self.arena
            .get(idx)
            .ok_or_else(|| DomainError::NodeNotFound(format!("{idx:?}")))
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&HierarchyNode> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in pre-order.
    pub fn order(&self) -> &[Index] {
        &self.order
    }

    pub fn by_ordinal(&self, ordinal: usize) -> Option<&HierarchyNode> {
        self.order.get(ordinal).and_then(|&idx| self.arena.get(idx))
    }

    /// Children of `idx`; empty for leaves.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
    }

    /// Pre-order traversal: root first, each parent followed by its subtree.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator {
            arena: self,
            position: 0,
        }
    }

    /// Post-order traversal: children before their parent.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// All leaves in pre-order.
    pub fn leaves(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// All internal nodes (including the synthetic root) in pre-order.
    pub fn parents(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Maximum node depth in the whole tree; 0 for a lone root or an empty tree.
    #[instrument(level = "trace", skip(self))]
    pub fn max_depth(&self) -> usize {
        self.iter().map(|(_, node)| node.depth).max().unwrap_or(0)
    }

    /// Pre-order handles of `idx` and all its descendants.
    pub fn subtree(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if self.arena.contains(current) {
                result.push(current);
                for &child in self.children(current).iter().rev() {
                    stack.push(child);
                }
            }
        }
        result
    }

    /// Resolve a slash-separated name path below the root, e.g. `A/A1`.
    ///
    /// The empty path and the root's own name resolve to the root. Names only
    /// need to be unique among siblings, so paths disambiguate repeated names.
    #[instrument(level = "debug", skip(self))]
    pub fn find_path(&self, path: &str) -> DomainResult<NodeId> {
        let root = self
            .root
            .ok_or_else(|| DomainError::NodeNotFound(path.to_string()))?;
        let trimmed = path.trim().trim_matches('/');
        let root_name = self.root_node().map(|n| n.name.as_str()).unwrap_or_default();
        if trimmed.is_empty() || trimmed == root_name {
            return Ok(root);
        }

        let mut current = root;
        for segment in trimmed.split('/') {
            current = self
                .children(current)
                .iter()
                .copied()
                .find(|&child| {
                    self.arena
                        .get(child)
                        .map(|n| n.name == segment)
                        .unwrap_or(false)
                })
                .ok_or_else(|| DomainError::NodeNotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// First node in pre-order carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.name == name)
            .map(|(idx, _)| idx)
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a HierarchyArena,
    position: usize,
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&idx) = self.arena.order.get(self.position) {
            self.position += 1;
            if let Some(node) = self.arena.get_node(idx) {
                return Some((idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a HierarchyArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a HierarchyArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().flatten().rev() {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HierarchyArena {
        let mut arena = HierarchyArena::new();
        let root = arena.insert_node(HierarchyNode::new("Root", vec![], None), None);
        let a = arena.insert_node(
            HierarchyNode::new("A", vec!["Root".into()], Some(root)),
            Some(root),
        );
        arena.insert_node(
            HierarchyNode::new("A1", vec!["Root".into(), "A".into()], Some(a)),
            Some(a),
        );
        arena.insert_node(
            HierarchyNode::new("B", vec!["Root".into()], Some(root)),
            Some(root),
        );
        arena
    }

    #[test]
    fn postorder_visits_children_first() {
        let arena = sample();
        let names: Vec<_> = arena.iter_postorder().map(|(_, n)| n.name.clone()).collect();
        assert_eq!(names, vec!["A1", "A", "B", "Root"]);
    }

    #[test]
    fn preorder_follows_insertion() {
        let arena = sample();
        let names: Vec<_> = arena.iter().map(|(_, n)| n.name.clone()).collect();
        assert_eq!(names, vec!["Root", "A", "A1", "B"]);
        assert_eq!(arena.by_ordinal(2).map(|n| n.name.as_str()), Some("A1"));
    }

    #[test]
    fn insert_turns_leaf_parent_into_internal() {
        let arena = sample();
        let a = arena.find_path("A").unwrap();
        assert!(!arena.get_node(a).unwrap().is_leaf());
        let b = arena.find_path("B").unwrap();
        assert!(arena.get_node(b).unwrap().is_leaf());
    }
}
