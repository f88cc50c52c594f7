//! End-to-end interaction scenarios driven through WheelContext.

use std::f64::consts::{PI, TAU};
use std::time::Duration;

use serde_json::json;

use sunwheel::application::{Visibility, ZoomState};
use sunwheel::domain::DomainError;
use sunwheel::util::testing;
use sunwheel::{ApplicationError, Settings, WheelContext};

const EPS: f64 = 1e-6;

fn context() -> WheelContext {
    testing::init_test_setup();
    WheelContext::build(
        &json!({"A": {"A1": {}, "A2": {}}, "B": {}}),
        &Settings::default(),
    )
    .unwrap()
}

fn layout_of<'a>(
    layout: &'a [sunwheel::application::NodeLayout],
    path: &str,
) -> &'a sunwheel::application::NodeLayout {
    layout.iter().find(|n| n.path == path).unwrap()
}

#[test]
fn given_simple_hierarchy_when_built_then_five_nodes_three_leaves() {
    // Act
    let ctx = context();

    // Assert
    let tree = ctx.tree();
    assert_eq!(tree.len(), 5);
    let leaves: Vec<&str> = tree
        .leaves()
        .into_iter()
        .map(|i| tree.get_node(i).unwrap().name.as_str())
        .collect();
    assert_eq!(leaves, vec!["A1", "A2", "B"]);

    let layout = ctx.layout();
    let a = layout_of(&layout, "A");
    let a1 = layout_of(&layout, "A/A1");
    let a2 = layout_of(&layout, "A/A2");
    assert!(((a.x1 - a.x0) - ((a1.x1 - a1.x0) + (a2.x1 - a2.x0))).abs() < 1e-9);
}

#[test]
fn given_click_on_a_when_zoom_completes_then_a_children_fill_circle_and_b_root_hidden() {
    // Arrange
    let mut ctx = context();
    let a = ctx.find("A").unwrap();

    // Act
    let generation = ctx.on_click(a).unwrap();
    let outcome = ctx.tick(Duration::from_millis(1000));

    // Assert
    assert_eq!(ctx.focus(), a);
    let completion = outcome.zoom_completed.expect("zoom completes after its duration");
    assert_eq!(completion.generation, generation);
    assert_eq!(ctx.zoom().state(), ZoomState::Idle);

    let layout = ctx.layout();
    let a1 = layout_of(&layout, "A/A1");
    let a2 = layout_of(&layout, "A/A2");
    assert!(a1.arc.start_angle.abs() < EPS);
    assert!((a1.arc.end_angle - PI).abs() < EPS);
    assert!((a2.arc.start_angle - PI).abs() < EPS);
    assert!((a2.arc.end_angle - TAU).abs() < EPS);

    assert_eq!(layout_of(&layout, "B").visibility, Visibility::Hidden);
    assert_eq!(layout_of(&layout, "").visibility, Visibility::Hidden);
    assert_eq!(layout_of(&layout, "A").visibility, Visibility::Visible);
}

#[test]
fn given_click_when_highlight_settles_then_only_focus_subtree_emphasized() {
    // Arrange
    let mut ctx = context();
    let a = ctx.find("A").unwrap();

    // Act
    ctx.on_click(a).unwrap();
    ctx.tick(Duration::from_secs(1));

    // Assert
    let layout = ctx.layout();
    for node in &layout {
        let inside = node.path == "A" || node.path.starts_with("A/");
        let expected = if inside { 1.0 } else { 0.1 };
        assert!(
            (node.wheel.fill_opacity - expected).abs() < EPS,
            "{} has fill {}",
            node.name,
            node.wheel.fill_opacity
        );
    }
}

#[test]
fn given_hover_on_a1_in_lineage_mode_when_fade_finishes_then_lineage_full_others_dimmed() {
    // Arrange
    let mut ctx = context();
    let a1 = ctx.find("A/A1").unwrap();

    // Act
    let target = ctx.on_hover(a1).unwrap();
    let outcome = ctx.tick(Duration::from_millis(250));

    // Assert
    assert!(outcome.highlight_finished);
    assert!(outcome.zoom_completed.is_none());
    assert_eq!(target.wheel_names(ctx.tree()), vec!["Root", "A", "A1"]);

    let layout = ctx.layout();
    for (path, expected) in [("", 1.0), ("A", 1.0), ("A/A1", 1.0), ("A/A2", 0.1), ("B", 0.1)] {
        let node = layout_of(&layout, path);
        assert!((node.wheel.fill_opacity - expected).abs() < EPS, "{path:?} wheel");
        assert!((node.map.fill_opacity - expected).abs() < EPS, "{path:?} map");
    }
}

#[test]
fn given_hover_then_leave_when_at_root_then_everything_returns_to_full() {
    // Arrange
    let mut ctx = context();
    let a1 = ctx.find("A/A1").unwrap();
    ctx.on_hover(a1).unwrap();
    ctx.tick(Duration::from_millis(250));

    // Act
    ctx.on_unhover(a1).unwrap();
    ctx.tick(Duration::from_millis(250));

    // Assert
    for node in ctx.layout() {
        assert!((node.wheel.fill_opacity - 1.0).abs() < EPS, "{}", node.name);
    }
}

#[test]
fn given_hover_during_zoom_when_ticking_then_zoom_keeps_its_own_clock() {
    // Arrange
    let mut ctx = context();
    let a = ctx.find("A").unwrap();
    ctx.on_click(a).unwrap();
    ctx.tick(Duration::from_millis(500));

    // Act: a hover restarts only the highlight timeline
    ctx.on_hover(ctx.find("A/A2").unwrap()).unwrap();
    let during = ctx.tick(Duration::from_millis(100));
    let after = ctx.tick(Duration::from_millis(400));

    // Assert
    assert!(during.zoom_completed.is_none());
    assert!(!during.highlight_finished);
    assert_eq!(ctx.zoom().state(), ZoomState::Idle);
    assert_eq!(after.zoom_completed.map(|c| c.generation), Some(1));
    assert!(after.highlight_finished);
}

#[test]
fn given_second_click_mid_zoom_when_ticking_then_first_completion_is_dropped() {
    // Arrange
    let mut ctx = context();
    let first = ctx.on_click(ctx.find("A").unwrap()).unwrap();
    ctx.tick(Duration::from_millis(400));
    let before = ctx.frame();

    // Act
    let b = ctx.find("B").unwrap();
    let second = ctx.on_click(b).unwrap();
    let restart = ctx.interpolate(0.0);
    let early = ctx.tick(Duration::from_millis(700));
    let late = ctx.tick(Duration::from_millis(300));

    // Assert
    assert!(second > first);
    for (x, y) in before.wedges.iter().zip(&restart.wedges) {
        assert_eq!(x.arc, y.arc);
    }
    assert!(early.zoom_completed.is_none());
    let done = late.zoom_completed.unwrap();
    assert_eq!(done.generation, second);
    assert_eq!(done.root, b);
    assert_eq!(ctx.focus(), b);
}

#[test]
fn given_layout_when_inspecting_labels_then_root_has_none_and_colors_are_hex() {
    let ctx = context();

    let layout = ctx.layout();

    assert!(layout_of(&layout, "").label.is_none());
    let a1 = layout_of(&layout, "A/A1");
    assert_eq!(a1.label.as_ref().unwrap().word1, "A1");
    for node in &layout {
        assert_eq!(node.color_hex.len(), 7);
        assert!(node.color_hex.starts_with('#'));
    }
}

#[test]
fn given_node_when_building_tooltip_then_subject_and_families_rows() {
    // Arrange
    let ctx = context();
    let a1 = ctx.find("A/A1").unwrap();

    // Act
    let tooltip = ctx.tooltip(a1).unwrap();

    // Assert
    assert_eq!(
        tooltip.lines(),
        vec!["Language: A1".to_string(), "Families: Root, A".to_string()]
    );
}

#[test]
fn given_unknown_path_when_locating_then_node_not_found() {
    let ctx = context();

    let result = ctx.find("A/Z");

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NodeNotFound(_)))
    ));
}
