//! Integration tests for RadialPartitioner: coverage, contiguity and radial bands.

use std::f64::consts::TAU;

use rstest::rstest;
use serde_json::{json, Value};

use sunwheel::domain::{deepest_y1, HierarchyArena, HierarchyBuilder, RadialPartitioner};

const EPS: f64 = 1e-9;

fn partitioned(hierarchy: &Value, cutoff: f64) -> HierarchyArena {
    let mut tree = HierarchyBuilder::new("Root").build(hierarchy).unwrap();
    RadialPartitioner::new(cutoff).partition(&mut tree);
    tree
}

fn fixture() -> Value {
    let text = std::fs::read_to_string("tests/resources/languages.json").unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn given_simple_tree_when_partitioning_then_widths_follow_leaf_weights() {
    // Arrange
    let hierarchy = json!({"A": {"A1": {}, "A2": {}}, "B": {}});

    // Act
    let tree = partitioned(&hierarchy, 5.8);

    // Assert: A1, A2 weigh 5.8 - 2, B weighs 5.8 - 1
    let a = tree.node(tree.find_path("A").unwrap()).unwrap();
    let a1 = tree.node(tree.find_path("A/A1").unwrap()).unwrap();
    let a2 = tree.node(tree.find_path("A/A2").unwrap()).unwrap();
    let b = tree.node(tree.find_path("B").unwrap()).unwrap();

    assert!((a1.weight - 3.8).abs() < EPS);
    assert!((b.weight - 4.8).abs() < EPS);
    assert_eq!(a.weight, 0.0);
    assert!((a.value - 7.6).abs() < EPS);

    let total = 3.8 + 3.8 + 4.8;
    assert!((a.angular_width() - TAU * 7.6 / total).abs() < EPS);
    assert!((a.angular_width() - (a1.angular_width() + a2.angular_width())).abs() < EPS);
    assert!((b.x1 - TAU).abs() < EPS);
}

#[test]
fn given_root_when_partitioning_then_spans_full_circle_and_innermost_band() {
    let tree = partitioned(&json!({"A": {"A1": {}}, "B": {}}), 5.8);

    let root = tree.root_node().unwrap();
    assert_eq!(root.x0, 0.0);
    assert_eq!(root.x1, TAU);
    assert_eq!(root.y0, 0.0);
    assert!((root.xm - TAU / 2.0).abs() < EPS);
}

#[test]
fn given_fixture_when_partitioning_then_children_tile_parent_span() {
    // Arrange / Act
    let tree = partitioned(&fixture(), 5.8);

    // Assert: contiguous, gap-free, in child order, inside [0, 2π]
    for (idx, node) in tree.iter() {
        assert!(0.0 <= node.x0 && node.x0 <= node.x1 && node.x1 <= TAU + EPS);
        let children = tree.children(idx);
        if children.is_empty() {
            continue;
        }
        let mut cursor = node.x0;
        for &c in children {
            let child = tree.get_node(c).unwrap();
            assert!((child.x0 - cursor).abs() < EPS, "gap before {}", child.name);
            cursor = child.x1;
        }
        assert!((cursor - node.x1).abs() < EPS, "children of {} do not cover it", node.name);
    }
}

#[test]
fn given_fixture_when_partitioning_then_leaf_spans_sum_to_full_circle() {
    let tree = partitioned(&fixture(), 5.8);

    let sum: f64 = tree
        .leaves()
        .into_iter()
        .map(|i| tree.get_node(i).unwrap().angular_width())
        .sum();

    assert!((sum - TAU).abs() < 1e-6);
}

#[test]
fn given_depth_two_tree_when_partitioning_then_bands_split_unit_radius_in_thirds() {
    // Arrange
    let tree = partitioned(&json!({"A": {"A1": {}}, "B": {}}), 5.8);

    // Act
    let a1 = tree.node(tree.find_path("A/A1").unwrap()).unwrap();
    let b = tree.node(tree.find_path("B").unwrap()).unwrap();

    // Assert
    assert!((a1.y0 - 2.0 / 3.0).abs() < EPS);
    assert!((a1.y1 - 1.0).abs() < EPS);
    assert!((b.y0 - 1.0 / 3.0).abs() < EPS);
    assert!((b.y1 - 2.0 / 3.0).abs() < EPS);
}

#[rstest]
#[case(0.5)]
#[case(1.0)]
fn given_cutoff_below_every_depth_when_partitioning_then_zero_widths_not_nan(#[case] cutoff: f64) {
    // Act
    let tree = partitioned(&json!({"A": {"A1": {}}, "B": {}}), cutoff);

    // Assert
    for (_, node) in tree.iter() {
        assert!(!node.x0.is_nan() && !node.x1.is_nan(), "{} has NaN span", node.name);
    }
    let a1 = tree.node(tree.find_path("A/A1").unwrap()).unwrap();
    assert_eq!(a1.angular_width(), 0.0);
}

#[test]
fn given_subtree_when_querying_deepest_y1_then_outer_edge_of_its_deepest_leaf() {
    let tree = partitioned(&json!({"A": {"A1": {"A1a": {}}}, "B": {}}), 5.8);

    let b = tree.find_path("B").unwrap();
    let a = tree.find_path("A").unwrap();

    assert!((deepest_y1(&tree, a) - 1.0).abs() < EPS);
    assert!((deepest_y1(&tree, b) - 0.5).abs() < EPS);
}
