//! Integration tests for region loading and binding against the language fixture.

use std::path::Path;

use serde_json::json;

use sunwheel::infrastructure::{
    load_hierarchy, load_region_names, InfraError, MemoryFileSystem, RealFileSystem,
};
use sunwheel::util::testing;
use sunwheel::{Settings, WheelContext};

fn fixture_context() -> WheelContext {
    testing::init_test_setup();
    let hierarchy =
        load_hierarchy(&RealFileSystem, Path::new("tests/resources/languages.json")).unwrap();
    WheelContext::build(&hierarchy, &Settings::default()).unwrap()
}

fn fixture_regions() -> Vec<String> {
    load_region_names(&RealFileSystem, Path::new("tests/resources/regions.txt")).unwrap()
}

#[test]
fn given_region_file_when_loading_then_comment_skipped_and_order_kept() {
    let regions = fixture_regions();

    assert_eq!(regions.len(), 10);
    assert_eq!(regions.first().map(String::as_str), Some("English"));
    assert_eq!(regions.last().map(String::as_str), Some("Atlantis"));
}

#[test]
fn given_fixture_when_binding_regions_then_known_regions_carry_node_attributes() {
    // Arrange
    let ctx = fixture_context();

    // Act
    let index = ctx.bind_regions(&fixture_regions());

    // Assert
    assert_eq!(index.bindings.len(), 9);
    let english = index.binding("English").unwrap();
    assert_eq!(english.class, "English Root Indo-European Germanic");
    assert_eq!(english.title, "English");
    let node = ctx.tree().node(english.node).unwrap();
    assert_eq!(english.color_hex, node.color.to_hex());

    assert_eq!(index.binding("Ocean").unwrap().color_hex, "#8080ff");
    assert_eq!(index.binding("Uninhabited").unwrap().color_hex, "#ffffff");
}

#[test]
fn given_fixture_when_binding_regions_then_mismatches_reported_not_fatal() {
    // Arrange
    let ctx = fixture_context();

    // Act
    let index = ctx.bind_regions(&fixture_regions());

    // Assert
    assert!(!index.is_complete());
    assert_eq!(index.unknown_regions, vec!["Atlantis"]);
    assert_eq!(
        index.unmatched_nodes,
        vec!["Dutch", "Italian", "Hindi", "Persian", "Cantonese", "Yoruba"]
    );
}

#[test]
fn given_duplicated_name_when_binding_then_last_node_in_preorder_owns_region() {
    // Arrange
    let ctx = WheelContext::build(&json!({"Malay": {"Malay": {}}}), &Settings::default()).unwrap();

    // Act
    let index = ctx.bind_regions(&["Malay".to_string()]);

    // Assert
    let binding = index.binding("Malay").unwrap();
    assert_eq!(binding.class, "Malay Root Malay");
    assert!(index.is_complete());
}

#[test]
fn given_bound_region_when_building_tooltip_then_families_list_ancestors() {
    // Arrange
    let ctx = fixture_context();
    let index = ctx.bind_regions(&fixture_regions());
    let french = index.binding("French").unwrap();

    // Act
    let tooltip = ctx.tooltip(french.node).unwrap();

    // Assert
    assert_eq!(
        tooltip.lines(),
        vec![
            "Language: French".to_string(),
            "Families: Root, Indo-European, Romance".to_string()
        ]
    );
}

#[test]
fn given_json_array_region_list_when_loading_then_parsed_as_names() {
    // Arrange
    let fs = MemoryFileSystem::new().with_file("zones.json", r#"["Ocean", "Basque"]"#);

    // Act
    let regions = load_region_names(&fs, Path::new("zones.json")).unwrap();

    // Assert
    assert_eq!(regions, vec!["Ocean", "Basque"]);
}

#[test]
fn given_missing_file_when_loading_then_io_error() {
    let fs = MemoryFileSystem::new();

    let result = load_hierarchy(&fs, Path::new("missing.json"));

    match result {
        Err(InfraError::Io { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn given_invalid_json_when_loading_hierarchy_then_parse_error() {
    let fs = MemoryFileSystem::new().with_file("broken.json", "{ \"A\": ");

    let result = load_hierarchy(&fs, Path::new("broken.json"));

    assert!(matches!(result, Err(InfraError::Parse { .. })));
}

#[test]
fn given_structurally_malformed_fixture_when_building_then_domain_error() {
    // Arrange: valid JSON, but a leaf is a string
    let hierarchy =
        load_hierarchy(&RealFileSystem, Path::new("tests/resources/malformed.json")).unwrap();

    // Act
    let result = WheelContext::build(&hierarchy, &Settings::default());

    // Assert
    assert!(matches!(
        result,
        Err(sunwheel::ApplicationError::Domain(
            sunwheel::DomainError::MalformedHierarchy { .. }
        ))
    ));
}
