//! Integration tests for HierarchyBuilder: flattening, ancestry and malformed input.

use std::fs;

use rstest::rstest;
use serde_json::{json, Value};

use sunwheel::domain::builder::MAX_DEPTH;
use sunwheel::domain::{DomainError, HierarchyBuilder};

fn names(tree: &sunwheel::HierarchyArena) -> Vec<&str> {
    tree.iter().map(|(_, n)| n.name.as_str()).collect()
}

// ============================================================
// Flattening
// ============================================================

#[test]
fn given_nested_mapping_when_building_then_flattened_in_preorder() {
    // Arrange
    let hierarchy = json!({"A": {"A1": {}, "A2": {}}, "B": {}});

    // Act
    let tree = HierarchyBuilder::new("Root").build(&hierarchy).unwrap();

    // Assert
    assert_eq!(names(&tree), vec!["Root", "A", "A1", "A2", "B"]);
    for (i, (_, node)) in tree.iter().enumerate() {
        assert_eq!(node.ordinal, i);
    }
}

#[test]
fn given_key_order_when_building_then_children_keep_document_order() {
    // Arrange: keys deliberately not sorted
    let text = r#"{"Zulu": {}, "Alpha": {"Mike": {}, "Bravo": {}}}"#;

    // Act
    let tree = HierarchyBuilder::new("Root").build_from_str(text).unwrap();

    // Assert
    assert_eq!(names(&tree), vec!["Root", "Zulu", "Alpha", "Mike", "Bravo"]);
}

#[test]
fn given_fixture_file_when_building_from_reader_then_every_parent_precedes_its_subtree() {
    // Arrange
    let file = fs::File::open("tests/resources/languages.json").unwrap();

    // Act
    let tree = HierarchyBuilder::new("Mothertongue")
        .build_from_reader(file)
        .unwrap();

    // Assert: each subtree is a contiguous run starting at its parent
    for (idx, node) in tree.iter() {
        let subtree = tree.subtree(idx);
        let ordinals: Vec<usize> = subtree
            .iter()
            .map(|&i| tree.get_node(i).unwrap().ordinal)
            .collect();
        let expected: Vec<usize> = (node.ordinal..node.ordinal + subtree.len()).collect();
        assert_eq!(ordinals, expected, "subtree of {} is not contiguous", node.name);
    }
}

// ============================================================
// Ancestry
// ============================================================

#[test]
fn given_built_tree_when_inspecting_nodes_then_ancestors_match_path_from_root() {
    // Arrange
    let hierarchy = json!({"A": {"A1": {"A1a": {}}}, "B": {}});

    // Act
    let tree = HierarchyBuilder::new("Root").build(&hierarchy).unwrap();

    // Assert
    let root = tree.root_node().unwrap();
    assert!(root.ancestors.is_empty());
    assert_eq!(root.depth, 0);

    let deep = tree.node(tree.find_path("A/A1/A1a").unwrap()).unwrap();
    assert_eq!(deep.ancestors, vec!["Root", "A", "A1"]);
    assert_eq!(deep.depth, 3);

    for (_, node) in tree.iter() {
        assert_eq!(node.depth, node.ancestors.len());
        if let Some(parent) = node.parent.and_then(|p| tree.get_node(p)) {
            let mut expected = parent.ancestors.clone();
            expected.push(parent.name.clone());
            assert_eq!(node.ancestors, expected);
        }
    }
}

#[test]
fn given_empty_mapping_when_building_then_node_is_leaf_without_children() {
    // Arrange
    let hierarchy = json!({"Basque": {}});

    // Act
    let tree = HierarchyBuilder::new("Root").build(&hierarchy).unwrap();

    // Assert
    let basque = tree.node(tree.find_path("Basque").unwrap()).unwrap();
    assert!(basque.is_leaf());
    assert!(basque.children.is_none());
}

#[test]
fn given_empty_hierarchy_when_building_then_lone_root_is_a_leaf() {
    let tree = HierarchyBuilder::new("Root").build(&json!({})).unwrap();

    assert_eq!(tree.len(), 1);
    assert!(tree.root_node().unwrap().is_leaf());
}

#[test]
fn given_repeated_names_on_different_levels_when_building_then_both_nodes_exist() {
    // Arrange
    let hierarchy = json!({"Malay": {"Malay": {}}, "Other": {}});

    // Act
    let tree = HierarchyBuilder::new("Root").build(&hierarchy).unwrap();

    // Assert
    assert_eq!(tree.len(), 4);
    let inner = tree.node(tree.find_path("Malay/Malay").unwrap()).unwrap();
    assert_eq!(inner.ancestors, vec!["Root", "Malay"]);
}

#[rstest]
#[case("Niger-Congo", "Niger", Some("Congo"))]
#[case("Basque", "Basque", None)]
#[case("Indo-Iranian-Persian", "Indo", Some("Iranian"))]
fn given_separated_name_when_building_then_word_parts_split(
    #[case] name: &str,
    #[case] word1: &str,
    #[case] word2: Option<&str>,
) {
    // Arrange
    let mut map = serde_json::Map::new();
    map.insert(name.to_string(), json!({}));

    // Act
    let tree = HierarchyBuilder::new("Root")
        .build(&Value::Object(map))
        .unwrap();

    // Assert
    let node = tree.node(tree.find_path(name).unwrap()).unwrap();
    assert_eq!(node.word_parts.word1, word1);
    assert_eq!(node.word_parts.word2.as_deref(), word2);
}

#[test]
fn given_custom_separator_when_building_then_names_split_on_it() {
    let tree = HierarchyBuilder::new("Root")
        .with_word_separator('_')
        .build(&json!({"Upper_Rhine": {}}))
        .unwrap();

    let node = tree.node(tree.find_path("Upper_Rhine").unwrap()).unwrap();
    assert_eq!(node.word_parts.word1, "Upper");
    assert_eq!(node.word_parts.word2.as_deref(), Some("Rhine"));
}

// ============================================================
// Malformed input
// ============================================================

#[rstest]
#[case(json!({"A": {"A1": "leaf"}}), "Root/A/A1")]
#[case(json!({"A": 3}), "Root/A")]
#[case(json!({"A": [1, 2]}), "Root/A")]
#[case(json!({"A": {"B": null}}), "Root/A/B")]
#[case(json!({"A": true}), "Root/A")]
fn given_non_mapping_value_when_building_then_malformed_with_path(
    #[case] hierarchy: Value,
    #[case] expected_path: &str,
) {
    // Act
    let result = HierarchyBuilder::new("Root").build(&hierarchy);

    // Assert
    match result {
        Err(DomainError::MalformedHierarchy { path, .. }) => assert_eq!(path, expected_path),
        other => panic!("expected MalformedHierarchy, got {other:?}"),
    }
}

#[test]
fn given_top_level_array_when_building_then_malformed() {
    let result = HierarchyBuilder::new("Root").build(&json!(["A", "B"]));

    assert!(matches!(result, Err(DomainError::MalformedHierarchy { .. })));
}

#[test]
fn given_empty_key_when_building_then_malformed() {
    let result = HierarchyBuilder::new("Root").build(&json!({"A": {"": {}}}));

    match result {
        Err(DomainError::MalformedHierarchy { reason, .. }) => assert!(reason.contains("empty")),
        other => panic!("expected MalformedHierarchy, got {other:?}"),
    }
}

#[test]
fn given_runaway_nesting_when_building_then_malformed_instead_of_overflow() {
    // Arrange: deeper than the builder accepts
    let mut value = json!({});
    for _ in 0..(MAX_DEPTH + 10) {
        value = json!({ "n": value });
    }

    // Act
    let result = HierarchyBuilder::new("Root").build(&value);

    // Assert
    match result {
        Err(DomainError::MalformedHierarchy { reason, .. }) => {
            assert!(reason.contains("nesting"))
        }
        other => panic!("expected MalformedHierarchy, got {other:?}"),
    }
}

#[test]
fn given_invalid_json_text_when_building_then_malformed() {
    let result = HierarchyBuilder::new("Root").build_from_str("{ not json");

    assert!(matches!(result, Err(DomainError::MalformedHierarchy { .. })));
}
