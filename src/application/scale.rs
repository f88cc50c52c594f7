//! Display scales mapping partition coordinates to angles and radii.
//!
//! Partition values (`x0..x1` in radians, `y0..y1` in normalized bands) never
//! change after layout; zooming only moves the domains and ranges below.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::domain::entities::HierarchyNode;

/// Fixed wheel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelGeometry {
    /// Outer radius in pixels
    pub radius: f64,
    /// Gap between a label and the inner edge of its wedge
    pub padding: f64,
    /// Inner radius reserved when zoomed into a non-root node
    pub inner_offset: f64,
    /// Exponent of the radial power scale
    pub radial_exponent: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            radius: 200.0,
            padding: 5.0,
            inner_offset: 20.0,
            radial_exponent: 1.3,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_pair(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t)]
}

/// Position of `x` within `[a, b]`; a degenerate domain maps to its middle.
fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        0.5
    } else {
        (x - a) / span
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, x: f64) -> f64 {
        lerp(
            self.range[0],
            self.range[1],
            normalize(self.domain[0], self.domain[1], x),
        )
    }

    pub fn interpolate(&self, other: &LinearScale, t: f64) -> LinearScale {
        LinearScale {
            domain: lerp_pair(self.domain, other.domain, t),
            range: lerp_pair(self.range, other.range, t),
        }
    }
}

/// Power scale: linear over `sign(x)·|x|^k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowScale {
    pub exponent: f64,
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl PowScale {
    pub fn new(exponent: f64, domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            exponent,
            domain,
            range,
        }
    }

    fn raise(&self, x: f64) -> f64 {
        x.signum() * x.abs().powf(self.exponent)
    }

    pub fn apply(&self, x: f64) -> f64 {
        let t = normalize(
            self.raise(self.domain[0]),
            self.raise(self.domain[1]),
            self.raise(x),
        );
        lerp(self.range[0], self.range[1], t)
    }

    pub fn interpolate(&self, other: &PowScale, t: f64) -> PowScale {
        PowScale {
            exponent: other.exponent,
            domain: lerp_pair(self.domain, other.domain, t),
            range: lerp_pair(self.range, other.range, t),
        }
    }
}

/// The pair of scales that place every wedge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleState {
    pub x: LinearScale,
    pub y: PowScale,
}

impl ScaleState {
    /// Whole tree visible: full circle, full radius.
    pub fn initial(geometry: &WheelGeometry) -> Self {
        Self {
            x: LinearScale::new([0.0, TAU], [0.0, TAU]),
            y: PowScale::new(geometry.radial_exponent, [0.0, 1.0], [0.0, geometry.radius]),
        }
    }

    /// Scales that make `node`'s subtree fill the wheel.
    ///
    /// `deepest_y1` is the outer edge of the subtree's deepest leaf.
    pub fn focused_on(node: &HierarchyNode, deepest_y1: f64, geometry: &WheelGeometry) -> Self {
        let inner = if node.y0 > 0.0 {
            geometry.inner_offset
        } else {
            0.0
        };
        Self {
            x: LinearScale::new([node.x0, node.x1], [0.0, TAU]),
            y: PowScale::new(
                geometry.radial_exponent,
                [node.y0, deepest_y1],
                [inner, geometry.radius],
            ),
        }
    }

    pub fn interpolate(&self, other: &ScaleState, t: f64) -> ScaleState {
        ScaleState {
            x: self.x.interpolate(&other.x, t),
            y: self.y.interpolate(&other.y, t),
        }
    }

    pub fn arc(&self, node: &HierarchyNode) -> ArcGeometry {
        ArcGeometry {
            start_angle: self.x.apply(node.x0).clamp(0.0, TAU),
            end_angle: self.x.apply(node.x1).clamp(0.0, TAU),
            inner_radius: if node.y0 != 0.0 {
                self.y.apply(node.y0).max(0.0)
            } else {
                0.0
            },
            outer_radius: self.y.apply(node.y1).max(0.0),
        }
    }

    pub fn label(&self, node: &HierarchyNode, geometry: &WheelGeometry) -> LabelPlacement {
        let theta = self.x.apply(node.xm);
        let angle = theta.to_degrees() - 90.0;
        let rotate = angle
            + if node.word_parts.is_multiline() {
                -0.5
            } else {
                0.0
            };
        LabelPlacement {
            rotate,
            translate: self.y.apply(node.y0) + geometry.padding,
            flip: if angle > 90.0 { -180.0 } else { 0.0 },
            anchor: if theta > PI {
                TextAnchor::End
            } else {
                TextAnchor::Start
            },
        }
    }
}

/// Annular sector of one wedge, angles in radians clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcGeometry {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

/// Label transform: `rotate(rotate) translate(translate) rotate(flip)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub rotate: f64,
    pub translate: f64,
    pub flip: f64,
    pub anchor: TextAnchor,
}

impl LabelPlacement {
    pub fn transform(&self) -> String {
        format!(
            "rotate({})translate({})rotate({})",
            self.rotate, self.translate, self.flip
        )
    }
}
