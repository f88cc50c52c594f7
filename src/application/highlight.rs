//! Cross-diagram highlighting.
//!
//! Every interaction event is turned into a target emphasis per node for the
//! wheel and for the map, one relation call per node and surface. Targets are
//! recomputed on every event, then eased in on the highlight timeline.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::timeline::{Easing, TimelineKind, Transition};
use crate::domain::entities::normalize_token;
use crate::domain::{DomainError, DomainResult, HierarchyArena, HierarchyNode, NodeId, Relation};

/// Default highlight fade duration.
pub const DEFAULT_HIGHLIGHT_DURATION: Duration = Duration::from_millis(250);

/// Pointer interaction forwarded by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    HoverEnter(NodeId),
    HoverLeave(NodeId),
    Click(NodeId),
}

impl InteractionEvent {
    pub fn node(&self) -> NodeId {
        match *self {
            InteractionEvent::HoverEnter(n)
            | InteractionEvent::HoverLeave(n)
            | InteractionEvent::Click(n) => n,
        }
    }
}

/// Which nodes stay emphasized relative to the hovered/clicked basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightMode {
    /// Basis, its ancestors and its descendants, on both surfaces
    #[default]
    Lineage,
    /// Full lineage on the wheel, basis subtree only on the map
    Focus,
    /// Subtree of the current wheel focus on both surfaces
    WheelSubtree,
    ShowAll,
}

impl HighlightMode {
    /// Relations evaluated for the (wheel, map) surfaces.
    pub fn relations(&self) -> (Relation, Relation) {
        match self {
            HighlightMode::Lineage => (Relation::Lineage, Relation::Lineage),
            HighlightMode::Focus => (Relation::Lineage, Relation::Subtree),
            HighlightMode::WheelSubtree => (Relation::WheelSubtree, Relation::WheelSubtree),
            HighlightMode::ShowAll => (Relation::All, Relation::All),
        }
    }
}

impl FromStr for HighlightMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "lineage" => Ok(HighlightMode::Lineage),
            "focus" => Ok(HighlightMode::Focus),
            "wheel-subtree" => Ok(HighlightMode::WheelSubtree),
            "show-all" | "all" => Ok(HighlightMode::ShowAll),
            _ => Err(DomainError::UnknownRelationMode(s.to_string())),
        }
    }
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HighlightMode::Lineage => "lineage",
            HighlightMode::Focus => "focus",
            HighlightMode::WheelSubtree => "wheel-subtree",
            HighlightMode::ShowAll => "show-all",
        };
        write!(f, "{s}")
    }
}

/// Opacity values for emphasized and dimmed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityLevels {
    pub full: f64,
    pub dimmed: f64,
    pub stroke_full: f64,
    pub stroke_dimmed: f64,
}

impl Default for OpacityLevels {
    fn default() -> Self {
        Self {
            full: 1.0,
            dimmed: 0.1,
            stroke_full: 0.5,
            stroke_dimmed: 0.1,
        }
    }
}

/// Fill and stroke opacity of one node on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Emphasis {
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
}

impl Emphasis {
    fn interpolate(&self, other: &Emphasis, t: f64) -> Emphasis {
        Emphasis {
            fill_opacity: self.fill_opacity + (other.fill_opacity - self.fill_opacity) * t,
            stroke_opacity: self.stroke_opacity + (other.stroke_opacity - self.stroke_opacity) * t,
        }
    }
}

/// Emphasis target for every node, in pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightTarget {
    pub mode: HighlightMode,
    pub basis: NodeId,
    pub wheel: Vec<bool>,
    pub map: Vec<bool>,
}

impl HighlightTarget {
    /// Names of nodes emphasized on the wheel, in pre-order.
    pub fn wheel_names<'a>(&self, tree: &'a HierarchyArena) -> Vec<&'a str> {
        names_where(tree, &self.wheel)
    }

    /// Names of nodes emphasized on the map, in pre-order.
    pub fn map_names<'a>(&self, tree: &'a HierarchyArena) -> Vec<&'a str> {
        names_where(tree, &self.map)
    }
}

fn names_where<'a>(tree: &'a HierarchyArena, flags: &[bool]) -> Vec<&'a str> {
    tree.iter()
        .filter(|(_, n)| flags.get(n.ordinal).copied().unwrap_or(false))
        .map(|(_, n)| n.name.as_str())
        .collect()
}

/// Compute which nodes are emphasized for `mode` around `basis`.
pub fn evaluate_highlight(
    tree: &HierarchyArena,
    mode: HighlightMode,
    basis: &HierarchyNode,
    focus: &HierarchyNode,
) -> (Vec<bool>, Vec<bool>) {
    let (wheel_rel, map_rel) = mode.relations();
    tree.iter()
        .map(|(_, node)| {
            (
                wheel_rel.holds(node, basis, focus),
                map_rel.holds(node, basis, focus),
            )
        })
        .unzip()
}

/// Maps interaction events to emphasis and animates opacity toward it.
#[derive(Debug, Clone)]
pub struct HighlightController {
    hover_mode: HighlightMode,
    levels: OpacityLevels,
    clock: Transition,
    wheel_from: Vec<Emphasis>,
    wheel_to: Vec<Emphasis>,
    map_from: Vec<Emphasis>,
    map_to: Vec<Emphasis>,
    last: Option<HighlightTarget>,
}

impl HighlightController {
    pub fn new(
        tree: &HierarchyArena,
        hover_mode: HighlightMode,
        levels: OpacityLevels,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        let full = Emphasis {
            fill_opacity: levels.full,
            stroke_opacity: levels.stroke_full,
        };
        let n = tree.len();
        Self {
            hover_mode,
            levels,
            clock: Transition::new(TimelineKind::Highlight, duration, easing),
            wheel_from: vec![full; n],
            wheel_to: vec![full; n],
            map_from: vec![full; n],
            map_to: vec![full; n],
            last: None,
        }
    }

    /// Mode used for an event: hover-enter uses the configured hover mode,
    /// leaving and clicking fall back to the wheel focus.
    pub fn mode_for(&self, event: &InteractionEvent) -> HighlightMode {
        match event {
            InteractionEvent::HoverEnter(_) => self.hover_mode,
            InteractionEvent::HoverLeave(_) | InteractionEvent::Click(_) => {
                HighlightMode::WheelSubtree
            }
        }
    }

    /// Handle an event. `focus` must already reflect a click's new wheel root.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn handle(
        &mut self,
        tree: &HierarchyArena,
        event: InteractionEvent,
        focus: NodeId,
    ) -> DomainResult<HighlightTarget> {
        let mode = self.mode_for(&event);
        self.apply(tree, mode, event.node(), focus)
    }

    /// Evaluate `mode` around `basis` and start fading toward it.
    ///
    /// Supersedes an in-flight highlight, starting from its current values.
    pub fn apply(
        &mut self,
        tree: &HierarchyArena,
        mode: HighlightMode,
        basis: NodeId,
        focus: NodeId,
    ) -> DomainResult<HighlightTarget> {
        let basis_node = tree.node(basis)?;
        let focus_node = tree.node(focus)?;
        let (wheel, map) = evaluate_highlight(tree, mode, basis_node, focus_node);

        let t = self.clock.t();
        self.wheel_from = interpolate_all(&self.wheel_from, &self.wheel_to, t);
        self.map_from = interpolate_all(&self.map_from, &self.map_to, t);
        self.wheel_to = wheel.iter().map(|&on| self.emphasis(on)).collect();
        self.map_to = map.iter().map(|&on| self.emphasis(on)).collect();
        self.clock.restart();

        debug!(
            %mode,
            basis = %basis_node.name,
            emphasized = wheel.iter().filter(|&&on| on).count(),
            "highlight started"
        );
        let target = HighlightTarget {
            mode,
            basis,
            wheel,
            map,
        };
        self.last = Some(target.clone());
        Ok(target)
    }

    /// Advance the fade. Returns true on the tick that finishes it.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.clock.tick(dt).is_some()
    }

    pub fn emphasis(&self, on: bool) -> Emphasis {
        if on {
            Emphasis {
                fill_opacity: self.levels.full,
                stroke_opacity: self.levels.stroke_full,
            }
        } else {
            Emphasis {
                fill_opacity: self.levels.dimmed,
                stroke_opacity: self.levels.stroke_dimmed,
            }
        }
    }

    /// Wheel emphasis at the current clock position, in pre-order.
    pub fn wheel(&self) -> Vec<Emphasis> {
        interpolate_all(&self.wheel_from, &self.wheel_to, self.clock.t())
    }

    /// Map emphasis at the current clock position, in pre-order.
    pub fn map(&self) -> Vec<Emphasis> {
        interpolate_all(&self.map_from, &self.map_to, self.clock.t())
    }

    pub fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    pub fn last_target(&self) -> Option<&HighlightTarget> {
        self.last.as_ref()
    }

    pub fn hover_mode(&self) -> HighlightMode {
        self.hover_mode
    }
}

fn interpolate_all(from: &[Emphasis], to: &[Emphasis], t: f64) -> Vec<Emphasis> {
    from.iter().zip(to).map(|(a, b)| a.interpolate(b, t)).collect()
}
