//! Property tests for partition and ancestry over generated hierarchies.
//!
//! 1. every coordinate is finite
//! 2. children tile their parent's span in order, the last one snapped
//! 3. zero-value subtrees collapse onto the parent's start angle
//! 4. leaf spans sum to the full circle, or to nothing when every weight is zero
//! 5. leaf weight is max(0, C - depth), bands are depth / levels
//! 6. ancestors are the parent's ancestors plus the parent's name

use std::f64::consts::TAU;

use proptest::prelude::*;
use serde_json::{Map, Value};

use sunwheel::domain::{HierarchyArena, HierarchyBuilder, RadialPartitioner};

const EPS: f64 = 1e-9;

// ── Helpers ──────────────────────────────────────────────────────────

/// Nested objects up to six levels deep; sibling names are unique.
fn arb_hierarchy() -> impl Strategy<Value = Value> {
    Just(Value::Object(Map::new())).prop_recursive(6, 64, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|children| {
            let map: Map<String, Value> = children
                .into_iter()
                .enumerate()
                .map(|(i, child)| (format!("n{i}"), child))
                .collect();
            Value::Object(map)
        })
    })
}

/// Cutoffs from zero (every leaf weightless) past the deepest level.
fn arb_cutoff() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        0.0f64..3.0,
        3.0f64..9.0,
    ]
}

fn partitioned(hierarchy: &Value, cutoff: f64) -> HierarchyArena {
    let mut tree = HierarchyBuilder::new("Root").build(hierarchy).unwrap();
    RadialPartitioner::new(cutoff).partition(&mut tree);
    tree
}

// ═════════════════════════════════════════════════════════════════════════
// Angular partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn given_any_hierarchy_when_partitioning_then_coordinates_are_finite(
        hierarchy in arb_hierarchy(),
        cutoff in arb_cutoff(),
    ) {
        let tree = partitioned(&hierarchy, cutoff);

        for (_, n) in tree.iter() {
            prop_assert!(
                n.x0.is_finite() && n.x1.is_finite() && n.y0.is_finite() && n.y1.is_finite(),
                "{} has x=[{}, {}] y=[{}, {}]", n.name, n.x0, n.x1, n.y0, n.y1
            );
            prop_assert!(n.x0 <= n.x1 + EPS);
        }
    }

    #[test]
    fn given_any_hierarchy_when_partitioning_then_children_tile_parent_span(
        hierarchy in arb_hierarchy(),
        cutoff in arb_cutoff(),
    ) {
        let tree = partitioned(&hierarchy, cutoff);

        for (idx, parent) in tree.iter() {
            let children = tree.children(idx);
            if children.is_empty() {
                continue;
            }
            let mut cursor = parent.x0;
            for &c in children {
                let child = tree.node(c).unwrap();
                prop_assert_eq!(child.x0, cursor, "gap before {}", child.name);
                cursor = child.x1;
            }
            let last = tree.node(children[children.len() - 1]).unwrap();
            if parent.value > 0.0 {
                prop_assert_eq!(last.x1, parent.x1, "last child of {} not snapped", parent.name);
            } else {
                prop_assert_eq!(last.x1, parent.x0, "zero-value {} did not collapse", parent.name);
            }
        }
    }

    #[test]
    fn given_any_hierarchy_when_partitioning_then_leaf_spans_cover_circle_or_nothing(
        hierarchy in arb_hierarchy(),
        cutoff in arb_cutoff(),
    ) {
        let tree = partitioned(&hierarchy, cutoff);
        let root = tree.root_node().unwrap();

        let covered: f64 = tree
            .leaves()
            .into_iter()
            .map(|i| tree.node(i).unwrap().angular_width())
            .sum();

        let expected = if root.value > 0.0 || root.is_leaf() { TAU } else { 0.0 };
        prop_assert!((covered - expected).abs() < 1e-6, "covered {} expected {}", covered, expected);
        prop_assert_eq!(root.x0, 0.0);
        prop_assert_eq!(root.x1, TAU);
    }

    #[test]
    fn given_cutoff_below_max_depth_when_partitioning_then_deep_leaves_weigh_nothing(
        hierarchy in arb_hierarchy(),
        fraction in 0.0f64..1.0,
    ) {
        // Arrange
        let depth = HierarchyBuilder::new("Root").build(&hierarchy).unwrap().max_depth();
        let cutoff = depth as f64 * fraction;

        // Act
        let tree = partitioned(&hierarchy, cutoff);

        // Assert
        for (_, n) in tree.iter() {
            if n.is_leaf() {
                prop_assert!((n.weight - (cutoff - n.depth as f64).max(0.0)).abs() < EPS);
                // a lone root still spans the circle; a snapped last child may carry rounding
                if n.depth as f64 >= cutoff && !n.is_root() {
                    prop_assert!(n.angular_width() < EPS, "{} should be invisible", n.name);
                }
            } else {
                prop_assert_eq!(n.weight, 0.0);
            }
        }
    }

    #[test]
    fn given_any_hierarchy_when_partitioning_then_bands_follow_depth(
        hierarchy in arb_hierarchy(),
        cutoff in arb_cutoff(),
    ) {
        let tree = partitioned(&hierarchy, cutoff);
        let levels = (tree.max_depth() + 1) as f64;

        for (_, n) in tree.iter() {
            prop_assert!((n.y0 - n.depth as f64 / levels).abs() < EPS);
            prop_assert!((n.y1 - (n.depth + 1) as f64 / levels).abs() < EPS);
            prop_assert!(n.y1 <= 1.0 + EPS);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Ancestry paths
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn given_any_hierarchy_when_building_then_ancestors_extend_parent_chain(
        hierarchy in arb_hierarchy(),
    ) {
        let tree = HierarchyBuilder::new("Root").build(&hierarchy).unwrap();

        for (_, n) in tree.iter() {
            prop_assert_eq!(n.depth, n.ancestors.len());
            match n.parent {
                None => prop_assert!(n.ancestors.is_empty()),
                Some(p) => {
                    let parent = tree.node(p).unwrap();
                    let mut expected = parent.ancestors.clone();
                    expected.push(parent.name.clone());
                    prop_assert_eq!(&n.ancestors, &expected);
                }
            }
        }
    }
}
