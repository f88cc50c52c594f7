//! Radial (sunburst) partition.
//!
//! Angular extent encodes leaf weight, radial band encodes depth. Leaves weigh
//! `C - depth` so shallow leaves get wider wedges than deep ones; internal
//! nodes weigh nothing themselves and span exactly their descendants.

use std::f64::consts::TAU;

use tracing::{debug, instrument};

use crate::domain::arena::HierarchyArena;
use crate::domain::entities::NodeId;

/// Default depth cutoff `C`; must exceed the deepest leaf for every leaf to be visible.
pub const DEFAULT_DEPTH_CUTOFF: f64 = 5.8;

/// Assigns `weight`, `value`, `x0..x1`, `y0..y1` and `xm` to every node.
#[derive(Debug, Clone, Copy)]
pub struct RadialPartitioner {
    depth_cutoff: f64,
}

impl Default for RadialPartitioner {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_CUTOFF)
    }
}

impl RadialPartitioner {
    pub fn new(depth_cutoff: f64) -> Self {
        Self { depth_cutoff }
    }

    /// Leaf weight `max(0, C - depth)`; internal nodes weigh 0.
    pub fn leaf_weight(&self, depth: usize) -> f64 {
        (self.depth_cutoff - depth as f64).max(0.0)
    }

    #[instrument(level = "debug", skip(self, tree), fields(nodes = tree.len()))]
    pub fn partition(&self, tree: &mut HierarchyArena) {
        let Some(root) = tree.root() else {
            return;
        };

        self.assign_values(tree);

        if let Some(node) = tree.get_node_mut(root) {
            node.x0 = 0.0;
            node.x1 = TAU;
        }
        // Parents precede children in pre-order, so spans flow top-down.
        let order: Vec<NodeId> = tree.order().to_vec();
        for &idx in &order {
            self.split_children(tree, idx);
        }

        let levels = (tree.max_depth() + 1) as f64;
        for &idx in &order {
            if let Some(node) = tree.get_node_mut(idx) {
                node.y0 = node.depth as f64 / levels;
                node.y1 = (node.depth + 1) as f64 / levels;
                node.xm = (node.x0 + node.x1) / 2.0;
            }
        }
        debug!("partitioned {} nodes into {} radial bands", order.len(), levels);
    }

    /// Post-order accumulation of subtree values.
    fn assign_values(&self, tree: &mut HierarchyArena) {
        let postorder: Vec<NodeId> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in postorder {
            let children_value: f64 = tree
                .children(idx)
                .iter()
                .filter_map(|&c| tree.get_node(c))
                .map(|c| c.value)
                .sum();
            if let Some(node) = tree.get_node_mut(idx) {
                node.weight = if node.is_leaf() {
                    self.leaf_weight(node.depth)
                } else {
                    0.0
                };
                node.value = node.weight + children_value;
            }
        }
    }

    /// Distribute the parent's span among its children, contiguously and in order.
    fn split_children(&self, tree: &mut HierarchyArena, parent: NodeId) {
        let Some((x0, x1, value)) = tree.get_node(parent).map(|n| (n.x0, n.x1, n.value)) else {
            return;
        };
        let children: Vec<NodeId> = tree.children(parent).to_vec();
        if children.is_empty() {
            return;
        }

        // Zero-value subtrees collapse onto the parent's start angle.
        let k = if value > 0.0 { (x1 - x0) / value } else { 0.0 };
        let mut cursor = x0;
        let last = children.len() - 1;
        for (i, child) in children.into_iter().enumerate() {
            if let Some(node) = tree.get_node_mut(child) {
                node.x0 = cursor;
                node.x1 = if i == last && k > 0.0 {
                    x1
                } else {
                    cursor + node.value * k
                };
                cursor = node.x1;
            }
        }
    }
}

/// Largest `y1` among the leaves of the subtree rooted at `idx`.
pub fn deepest_y1(tree: &HierarchyArena, idx: NodeId) -> f64 {
    tree.subtree(idx)
        .into_iter()
        .filter_map(|i| tree.get_node(i))
        .filter(|n| n.is_leaf())
        .map(|n| n.y1)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(tree.get_node(idx).map(|n| n.y1).unwrap_or(0.0))
}
