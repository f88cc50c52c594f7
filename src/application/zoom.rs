//! Zoom transition: re-root the wheel on a clicked node.
//!
//! The transition never re-partitions. It interpolates the display scales from
//! wherever they currently are (possibly mid-flight) to the scales that make
//! the target's subtree fill the wheel, and recomputes wedge and label
//! geometry from the interpolated scales.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::scale::{ArcGeometry, LabelPlacement, ScaleState, WheelGeometry};
use crate::application::timeline::{Easing, PlaybackState, TimelineKind, Transition};
use crate::domain::{deepest_y1, DomainResult, HierarchyArena, NodeId, Relation};

/// Default zoom duration.
pub const DEFAULT_ZOOM_DURATION: Duration = Duration::from_millis(1000);

/// Whether a node can be seen and clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    /// Outside the focused subtree; must not intercept pointer events
    Hidden,
}

/// Geometry of one node at one sampled instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WedgeFrame {
    pub ordinal: usize,
    pub arc: ArcGeometry,
    pub label: LabelPlacement,
    pub label_opacity: f64,
    pub visibility: Visibility,
}

/// Geometry of every node at one sampled `t`, in pre-order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelFrame {
    pub t: f64,
    pub wedges: Vec<WedgeFrame>,
}

/// Zoom state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Idle,
    Animating,
}

/// Emitted once when a zoom reaches `t = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomCompletion {
    pub generation: u64,
    pub root: NodeId,
    /// Nodes outside the new root's subtree, now hidden
    pub hidden: Vec<NodeId>,
}

/// Idle/Animating state machine driving the wheel's display scales.
#[derive(Debug, Clone)]
pub struct ZoomTransition {
    geometry: WheelGeometry,
    clock: Transition,
    /// Scales as of the last tick
    current: ScaleState,
    from: ScaleState,
    to: ScaleState,
    label_from: Vec<f64>,
    label_to: Vec<f64>,
    label_current: Vec<f64>,
    visibility: Vec<Visibility>,
    target: Option<NodeId>,
}

impl ZoomTransition {
    pub fn new(tree: &HierarchyArena, geometry: WheelGeometry, duration: Duration, easing: Easing) -> Self {
        let initial = ScaleState::initial(&geometry);
        let n = tree.len();
        Self {
            geometry,
            clock: Transition::new(TimelineKind::Zoom, duration, easing),
            current: initial,
            from: initial,
            to: initial,
            label_from: vec![1.0; n],
            label_to: vec![1.0; n],
            label_current: vec![1.0; n],
            visibility: vec![Visibility::Visible; n],
            target: None,
        }
    }

    /// Begin zooming to `target`, superseding any zoom in flight.
    ///
    /// The new transition starts from the current (possibly mid-flight)
    /// scales and label opacities. Returns the transition's generation.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn start(&mut self, tree: &HierarchyArena, node_id: NodeId) -> DomainResult<u64> {
        let node = tree.node(node_id)?;
        let outer = deepest_y1(tree, node_id);

        self.from = self.current;
        self.to = ScaleState::focused_on(node, outer, &self.geometry);
        self.label_from = self.label_current.clone();
        self.label_to = tree
            .iter()
            .map(|(_, n)| {
                if Relation::Subtree.holds(n, node, node) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        self.target = Some(node_id);

        let generation = self.clock.restart();
        info!(node = %node.name, generation, "zoom started");
        Ok(generation)
    }

    /// Advance the animation. Returns the completion on the tick that reaches `t = 1`.
    pub fn tick(&mut self, tree: &HierarchyArena, dt: Duration) -> Option<ZoomCompletion> {
        if !self.clock.is_running() {
            return None;
        }
        let finished = self.clock.tick(dt);
        let t = self.clock.t();
        self.current = self.from.interpolate(&self.to, t);
        self.label_current = self.labels_at(t);

        let generation = finished?;
        let root = self.target?;
        let hidden = self.apply_visibility(tree, root);
        debug!(generation, hidden = hidden.len(), "zoom finished");
        Some(ZoomCompletion {
            generation,
            root,
            hidden,
        })
    }

    /// Geometry of every node at eased parameter `t` of the current transition.
    ///
    /// Pure: samples without advancing the clock. While idle every `t` yields
    /// the resting geometry.
    pub fn interpolate(&self, tree: &HierarchyArena, t: f64) -> WheelFrame {
        let t = t.clamp(0.0, 1.0);
        let (scales, labels) = if self.clock.is_running() {
            (self.from.interpolate(&self.to, t), self.labels_at(t))
        } else {
            (self.current, self.label_current.clone())
        };
        self.frame_from(tree, &scales, &labels, t)
    }

    /// Geometry at the current clock position.
    pub fn frame(&self, tree: &HierarchyArena) -> WheelFrame {
        let t = if self.clock.is_running() { self.clock.t() } else { 1.0 };
        self.frame_from(tree, &self.current, &self.label_current, t)
    }

    fn frame_from(&self, tree: &HierarchyArena, scales: &ScaleState, labels: &[f64], t: f64) -> WheelFrame {
        let wedges = tree
            .iter()
            .map(|(_, node)| WedgeFrame {
                ordinal: node.ordinal,
                arc: scales.arc(node),
                label: scales.label(node, &self.geometry),
                label_opacity: labels.get(node.ordinal).copied().unwrap_or(1.0),
                visibility: self
                    .visibility
                    .get(node.ordinal)
                    .copied()
                    .unwrap_or(Visibility::Visible),
            })
            .collect();
        WheelFrame { t, wedges }
    }

    fn labels_at(&self, t: f64) -> Vec<f64> {
        self.label_from
            .iter()
            .zip(&self.label_to)
            .map(|(a, b)| a + (b - a) * t)
            .collect()
    }

    fn apply_visibility(&mut self, tree: &HierarchyArena, root: NodeId) -> Vec<NodeId> {
        let Some(root_node) = tree.get_node(root) else {
            return Vec::new();
        };
        let mut hidden = Vec::new();
        for (idx, node) in tree.iter() {
            let inside = Relation::Subtree.holds(node, root_node, root_node);
            if let Some(v) = self.visibility.get_mut(node.ordinal) {
                *v = if inside {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                };
            }
            if !inside {
                hidden.push(idx);
            }
        }
        hidden
    }

    pub fn state(&self) -> ZoomState {
        match self.clock.state() {
            PlaybackState::Running => ZoomState::Animating,
            PlaybackState::Idle => ZoomState::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    pub fn progress(&self) -> f64 {
        self.clock.progress()
    }

    pub fn scales(&self) -> &ScaleState {
        &self.current
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn visibility(&self, ordinal: usize) -> Visibility {
        self.visibility
            .get(ordinal)
            .copied()
            .unwrap_or(Visibility::Visible)
    }

    pub fn geometry(&self) -> &WheelGeometry {
        &self.geometry
    }
}
