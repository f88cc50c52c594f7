//! Color assignment over a partitioned hierarchy.
//!
//! Leaves are colored by the selected [`ColorScheme`]; for the `hue` family
//! internal nodes then take the Lab mean of their children so every ancestor
//! sits "between" its descendants without hue wrap-around artifacts.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use tracing::{debug, instrument, trace};

use crate::domain::arena::HierarchyArena;
use crate::domain::color::{Hsl, Lab, Rgb, DARK_BRIGHTNESS_THRESHOLD};
use crate::domain::entities::{ColorScheme, LabelColoring, LabelStyle, NodeId};

/// Lightness multiplier applied to averaged ancestors.
pub const ANCESTOR_LIGHTNESS_FACTOR: f64 = 1.1;
/// Stride used to scatter saturation and lightness across neighbouring leaves.
#[allow(clippy::approx_constant)]
const SCATTER_STRIDE: f64 = 3.14;
/// Lightness offset between alternating leaf siblings under `hue-parents`.
const SIBLING_LIGHTNESS_DELTA: f64 = 20.0;

/// Default reserved colors: background land and water categories.
pub fn default_reserved_colors() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Uninhabited".to_string(), "#fff".to_string()),
        ("Ocean".to_string(), "#8080FF".to_string()),
    ])
}

/// Assigns a color to every node of a partitioned hierarchy.
#[derive(Debug, Clone)]
pub struct ColorAssigner {
    scheme: ColorScheme,
    label_coloring: LabelColoring,
    reserved: HashMap<String, Lab>,
}

impl ColorAssigner {
    pub fn new(scheme: ColorScheme) -> Self {
        let reserved = default_reserved_colors()
            .iter()
            .filter_map(|(name, hex)| hex.parse::<Rgb>().ok().map(|rgb| (name.clone(), rgb.to_lab())))
            .collect();
        Self {
            scheme,
            label_coloring: LabelColoring::default(),
            reserved,
        }
    }

    pub fn with_label_coloring(mut self, label_coloring: LabelColoring) -> Self {
        self.label_coloring = label_coloring;
        self
    }

    /// Replace the reserved name -> color table.
    pub fn with_reserved(mut self, reserved: HashMap<String, Lab>) -> Self {
        self.reserved = reserved;
        self
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    /// Color every node. Requires partition geometry (`x0`, `x1`).
    #[instrument(level = "debug", skip(self, tree), fields(scheme = %self.scheme))]
    pub fn assign(&self, tree: &mut HierarchyArena) {
        let mut colors: HashMap<NodeId, Lab> = HashMap::new();

        match self.scheme {
            ColorScheme::Hue => self.color_leaves_by_hue(tree, &mut colors),
            ColorScheme::HueLab => self.color_leaves_in_lab(tree, &mut colors),
            ColorScheme::HueParents => self.color_by_parents(tree, &mut colors),
            ColorScheme::Hash => self.color_by_hash(tree, &mut colors),
        }

        // Post-order: every child is final before its parent is resolved,
        // so each node is computed exactly once.
        let postorder: Vec<NodeId> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in postorder {
            let Some(node) = tree.get_node(idx) else {
                continue;
            };
            let color = if let Some(reserved) = self.reserved.get(&node.name) {
                *reserved
            } else if self.scheme.propagates() && !node.is_leaf() {
                let child_colors: Vec<Lab> = tree
                    .children(idx)
                    .iter()
                    .filter_map(|c| colors.get(c).copied())
                    .collect();
                Lab::mean(&child_colors)
                    .map(|mean| mean.map_lightness(|l| l * ANCESTOR_LIGHTNESS_FACTOR))
                    .unwrap_or(Lab::WHITE)
            } else {
                colors.get(&idx).copied().unwrap_or(Lab::WHITE)
            };
            trace!(name = %node.name, %color, "assigned color");
            colors.insert(idx, color);
        }

        for (idx, color) in colors {
            if let Some(node) = tree.get_node_mut(idx) {
                node.color = color;
                node.label_style = self.label_style(&color);
            }
        }
        debug!("colored {} nodes", tree.len());
    }

    fn label_style(&self, color: &Lab) -> LabelStyle {
        match self.label_coloring {
            LabelColoring::Brightness if color.brightness() < DARK_BRIGHTNESS_THRESHOLD => {
                LabelStyle::Bright
            }
            _ => LabelStyle::Standard,
        }
    }

    /// Leaves in angular order, hue evenly spread, saturation/lightness scattered.
    fn color_leaves_by_hue(&self, tree: &HierarchyArena, colors: &mut HashMap<NodeId, Lab>) {
        let leaves = leaves_by_angle(tree);
        let n = leaves.len() as f64;
        for (i, idx) in leaves.into_iter().enumerate() {
            let i = i as f64;
            let hsl = Hsl::new(
                i * 360.0 / n,
                (i * SCATTER_STRIDE) % 0.7 + 0.3,
                (i * SCATTER_STRIDE) % 0.35 / 2.0 + 0.4,
            );
            colors.insert(idx, brighten(hsl.to_lab()));
        }
    }

    /// Leaves walk a closed loop through the a/b plane with a rippled lightness.
    fn color_leaves_in_lab(&self, tree: &HierarchyArena, colors: &mut HashMap<NodeId, Lab>) {
        let leaves = leaves_by_angle(tree);
        let n = leaves.len() as f64;
        for (i, idx) in leaves.into_iter().enumerate() {
            let e = i as f64 / n;
            colors.insert(
                idx,
                Lab::new(
                    (e * 60.0 * PI).cos() * 15.0 + 70.0,
                    (e - 0.5).abs() * 400.0 - 100.0,
                    ((e - 0.25).abs() - 0.5).abs() * 400.0 - 100.0,
                ),
            );
        }
    }

    /// Internal nodes get hues; leaf children inherit with alternating lightness.
    fn color_by_parents(&self, tree: &HierarchyArena, colors: &mut HashMap<NodeId, Lab>) {
        let mut parents: Vec<NodeId> = tree.parents();
        parents.sort_by(|&a, &b| {
            let (Some(a), Some(b)) = (tree.get_node(a), tree.get_node(b)) else {
                return Ordering::Equal;
            };
            (a.x0 + a.x1)
                .total_cmp(&(b.x0 + b.x1))
                .then(a.x0.total_cmp(&b.x0))
        });

        let m = parents.len() as f64;
        for (i, idx) in parents.into_iter().enumerate() {
            let color = brighten(Hsl::new(i as f64 * 360.0 / m, 0.5, 0.5).to_lab());
            colors.insert(idx, color);

            for (j, &child) in tree.children(idx).iter().enumerate() {
                if tree.get_node(child).is_some_and(|c| c.is_leaf()) {
                    let jitter = ((j % 2) as f64 - 0.5) * SIBLING_LIGHTNESS_DELTA;
                    colors.insert(child, color.map_lightness(|l| l + jitter));
                }
            }
        }

        // A lone root is a leaf with no parent to inherit from.
        if let Some(root) = tree.root() {
            colors.entry(root).or_insert(Lab::WHITE);
        }
    }

    /// Every node colored from a hash of its own name, pulled toward midtones.
    fn color_by_hash(&self, tree: &HierarchyArena, colors: &mut HashMap<NodeId, Lab>) {
        for (idx, node) in tree.iter() {
            let lab = hash_color(&node.name).to_lab();
            colors.insert(idx, lab.map_lightness(|l| l * 0.5 + 50.0));
        }
    }
}

/// Keep hue-derived colors away from near-black.
fn brighten(lab: Lab) -> Lab {
    lab.map_lightness(|l| l * 0.8 + 20.0)
}

fn leaves_by_angle(tree: &HierarchyArena) -> Vec<NodeId> {
    let mut leaves = tree.leaves();
    leaves.sort_by(|&a, &b| match (tree.get_node(a), tree.get_node(b)) {
        (Some(a), Some(b)) => a.x0.total_cmp(&b.x0),
        _ => Ordering::Equal,
    });
    leaves
}

/// Signed 32-bit rolling hash over UTF-16 code units: `h = h * 31 + c`.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |h, c| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(c))
    })
}

/// Pseudo-color from the low 24 bits of [`string_hash`]; white for an empty name.
pub fn hash_color(s: &str) -> Rgb {
    if s.is_empty() {
        return Rgb::WHITE;
    }
    let hash = string_hash(s);
    Rgb::new(
        f64::from((hash & 0xFF0000) >> 16),
        f64::from((hash & 0x00FF00) >> 8),
        f64::from(hash & 0x0000FF),
    )
}
