//! Wheel context: the built node snapshot plus the interaction state.
//!
//! The tree is never mutated after [`WheelContext::build`]. The only mutable
//! interaction state is the focus (current wheel root) and the two
//! independent timelines, all owned here and passed explicitly.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::application::error_ext::DomainResultExt;
use crate::application::highlight::{
    Emphasis, HighlightController, HighlightTarget, InteractionEvent,
};
use crate::application::regions::{bind_regions, RegionIndex, Tooltip};
use crate::application::scale::{ArcGeometry, LabelPlacement};
use crate::application::zoom::{Visibility, WheelFrame, ZoomCompletion, ZoomTransition};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    ColorAssigner, HierarchyArena, HierarchyBuilder, HierarchyNode, LabelStyle, NodeId,
    RadialPartitioner, WordParts,
};

/// What happened during one [`WheelContext::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub zoom_completed: Option<ZoomCompletion>,
    pub highlight_finished: bool,
}

/// Everything a renderer needs to draw one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub ordinal: usize,
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub arc: ArcGeometry,
    pub label_placement: LabelPlacement,
    /// `None` for the synthetic root, which carries no label
    pub label: Option<WordParts>,
    pub label_style: LabelStyle,
    pub label_opacity: f64,
    pub color_hex: String,
    pub lab: [f64; 3],
    pub visibility: Visibility,
    pub wheel: Emphasis,
    pub map: Emphasis,
}

/// Built hierarchy plus focus, zoom and highlight state.
#[derive(Debug, Clone)]
pub struct WheelContext {
    tree: HierarchyArena,
    focus: NodeId,
    zoom: ZoomTransition,
    highlight: HighlightController,
    subject_label: String,
}

impl WheelContext {
    /// Run the build pipeline: builder, partitioner, color assigner.
    #[instrument(level = "debug", skip_all, fields(root = %settings.root_name))]
    pub fn build(hierarchy: &Value, settings: &Settings) -> ApplicationResult<Self> {
        let mut tree = HierarchyBuilder::new(settings.root_name.clone())
            .with_word_separator(settings.word_separator)
            .build(hierarchy)?;

        RadialPartitioner::new(settings.wedge_width_depth_cutoff).partition(&mut tree);

        ColorAssigner::new(settings.color_scheme)
            .with_label_coloring(settings.label_coloring)
            .with_reserved(settings.reserved_lab()?)
            .assign(&mut tree);

        info!(
            nodes = tree.len(),
            scheme = %settings.color_scheme,
            "wheel built"
        );
        Self::from_tree(tree, settings)
    }

    /// Wrap an already partitioned and colored tree.
    pub fn from_tree(tree: HierarchyArena, settings: &Settings) -> ApplicationResult<Self> {
        let focus = tree.root().ok_or_else(|| ApplicationError::Config {
            message: "hierarchy has no root".into(),
        })?;
        let zoom = ZoomTransition::new(
            &tree,
            settings.geometry,
            settings.zoom_duration(),
            settings.easing,
        );
        let highlight = HighlightController::new(
            &tree,
            settings.hover_mode,
            settings.opacity,
            settings.highlight_duration(),
            settings.easing,
        );
        Ok(Self {
            tree,
            focus,
            zoom,
            highlight,
            subject_label: settings.subject_label.clone(),
        })
    }

    pub fn tree(&self) -> &HierarchyArena {
        &self.tree
    }

    /// Current wheel root.
    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn focus_node(&self) -> ApplicationResult<&HierarchyNode> {
        Ok(self.tree.node(self.focus)?)
    }

    pub fn zoom(&self) -> &ZoomTransition {
        &self.zoom
    }

    pub fn highlight(&self) -> &HighlightController {
        &self.highlight
    }

    /// Locate a node by slash path below the root, e.g. `A/A1`.
    pub fn find(&self, path: &str) -> ApplicationResult<NodeId> {
        Ok(self.tree.find_path(path)?)
    }

    /// Pointer entered a wedge or region: highlight with the hover mode.
    pub fn on_hover(&mut self, node: NodeId) -> ApplicationResult<HighlightTarget> {
        self.dispatch(InteractionEvent::HoverEnter(node))
    }

    /// Pointer left: fall back to the subtree of the current focus.
    pub fn on_unhover(&mut self, node: NodeId) -> ApplicationResult<HighlightTarget> {
        self.dispatch(InteractionEvent::HoverLeave(node))
    }

    /// Re-root the wheel on `node`: set focus, start the zoom, highlight the
    /// new focus subtree. Returns the zoom generation.
    #[instrument(level = "debug", skip(self))]
    pub fn on_click(&mut self, node: NodeId) -> ApplicationResult<u64> {
        let generation = self
            .zoom
            .start(&self.tree, node)
            .with_action_context("zoom")?;
        self.focus = node;
        self.dispatch(InteractionEvent::Click(node))?;
        Ok(generation)
    }

    fn dispatch(&mut self, event: InteractionEvent) -> ApplicationResult<HighlightTarget> {
        Ok(self.highlight.handle(&self.tree, event, self.focus)?)
    }

    /// Advance both timelines by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        TickOutcome {
            zoom_completed: self.zoom.tick(&self.tree, dt),
            highlight_finished: self.highlight.tick(dt),
        }
    }

    /// Wheel geometry at the current clock position.
    pub fn frame(&self) -> WheelFrame {
        self.zoom.frame(&self.tree)
    }

    /// Wheel geometry at eased `t` of the in-flight zoom, without advancing it.
    pub fn interpolate(&self, t: f64) -> WheelFrame {
        self.zoom.interpolate(&self.tree, t)
    }

    /// Full per-node render state, in pre-order.
    pub fn layout(&self) -> Vec<NodeLayout> {
        let frame = self.frame();
        let wheel = self.highlight.wheel();
        let map = self.highlight.map();
        let full = self.highlight.emphasis(true);

        self.tree
            .iter()
            .zip(frame.wedges)
            .map(|((_, node), wedge)| NodeLayout {
                ordinal: node.ordinal,
                name: node.name.clone(),
                path: node.path(),
                depth: node.depth,
                value: node.value,
                x0: node.x0,
                x1: node.x1,
                y0: node.y0,
                y1: node.y1,
                arc: wedge.arc,
                label_placement: wedge.label,
                label: (!node.is_root()).then(|| node.word_parts.clone()),
                label_style: node.label_style,
                label_opacity: wedge.label_opacity,
                color_hex: node.color.to_hex(),
                lab: [node.color.l, node.color.a, node.color.b],
                visibility: wedge.visibility,
                wheel: wheel.get(node.ordinal).copied().unwrap_or(full),
                map: map.get(node.ordinal).copied().unwrap_or(full),
            })
            .collect()
    }

    pub fn tooltip(&self, node: NodeId) -> ApplicationResult<Tooltip> {
        let node = self.tree.node(node)?;
        Ok(Tooltip::for_node(node, &self.subject_label))
    }

    pub fn bind_regions(&self, regions: &[String]) -> RegionIndex {
        bind_regions(&self.tree, regions)
    }
}
