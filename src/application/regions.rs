//! Binding of companion-map regions to hierarchy nodes.
//!
//! A region is named after the node it depicts. Every node that names at
//! least one region lends it its color, class string and tooltip.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::{HierarchyArena, HierarchyNode, NodeId};

/// Label of the ancestry row in tooltips.
pub const FAMILIES_LABEL: &str = "Families";

/// One map region bound to its node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionBinding {
    pub region: String,
    #[serde(skip)]
    pub node: NodeId,
    /// `name` followed by every ancestor name, space separated
    pub class: String,
    pub color_hex: String,
    pub title: String,
}

/// Result of binding a region list against a hierarchy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionIndex {
    pub bindings: Vec<RegionBinding>,
    /// Leaf nodes with no region on the map
    pub unmatched_nodes: Vec<String>,
    /// Regions naming no node
    pub unknown_regions: Vec<String>,
}

impl RegionIndex {
    pub fn binding(&self, region: &str) -> Option<&RegionBinding> {
        self.bindings.iter().find(|b| b.region == region)
    }

    pub fn is_complete(&self) -> bool {
        self.unmatched_nodes.is_empty() && self.unknown_regions.is_empty()
    }
}

/// Match `regions` to nodes by name.
///
/// Names are not globally unique; for a duplicated name the node that comes
/// last in pre-order owns the region. Missing matches are not errors.
#[instrument(level = "debug", skip_all, fields(regions = regions.len()))]
pub fn bind_regions(tree: &HierarchyArena, regions: &[String]) -> RegionIndex {
    let mut by_name: HashMap<&str, (NodeId, &HierarchyNode)> = HashMap::new();
    for (idx, node) in tree.iter() {
        by_name.insert(node.name.as_str(), (idx, node));
    }

    let mut index = RegionIndex::default();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for region in regions {
        match by_name.get(region.as_str()) {
            Some(&(idx, node)) => {
                seen.insert(node.name.as_str());
                index.bindings.push(RegionBinding {
                    region: region.clone(),
                    node: idx,
                    class: node.class_string(),
                    color_hex: node.color.to_hex(),
                    title: node.name.clone(),
                });
            }
            None => {
                debug!(region = %region, "region names no node");
                index.unknown_regions.push(region.clone());
            }
        }
    }

    index.unmatched_nodes = tree
        .iter()
        .filter(|(_, n)| n.is_leaf() && !seen.contains(n.name.as_str()))
        .map(|(_, n)| n.name.clone())
        .collect();

    if !index.is_complete() {
        warn!(
            unknown_regions = index.unknown_regions.len(),
            unmatched_nodes = index.unmatched_nodes.len(),
            "map regions and hierarchy do not fully match"
        );
    }
    index
}

/// Two-row tooltip shown while hovering a region or wedge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub rows: Vec<(String, String)>,
}

impl Tooltip {
    /// `subject_label` names the first row, e.g. "Language" or "Watershed".
    pub fn for_node(node: &HierarchyNode, subject_label: &str) -> Self {
        Self {
            rows: vec![
                (subject_label.to_string(), node.name.clone()),
                (FAMILIES_LABEL.to_string(), node.ancestors.join(", ")),
            ],
        }
    }

    /// `Label: value` lines.
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(|(k, v)| format!("{k}: {v}")).collect()
    }
}
