//! Domain entities: hierarchy nodes and the enumerations that steer layout

use std::fmt;
use std::str::FromStr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::color::Lab;
use crate::domain::error::DomainError;

/// Handle of a node inside a [`HierarchyArena`](crate::domain::HierarchyArena).
pub type NodeId = Index;

/// Default separator between the two words of a wedge label.
pub const DEFAULT_WORD_SEPARATOR: char = '-';

/// One entry of the classification hierarchy, with its layout and color.
///
/// Structure (`name`, `ancestors`, `depth`, `children`) is fixed by the builder.
/// Geometry is written once by the partitioner and color once by the color
/// assigner; nothing mutates a node after that.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Identifier, unique among siblings only
    pub name: String,
    /// Names from the synthetic root down to the immediate parent
    pub ancestors: Vec<String>,
    /// Length of `ancestors`; 0 for the synthetic root
    pub depth: usize,
    /// Position in the pre-order flattening; 0 for the synthetic root
    pub ordinal: usize,
    /// Parent handle, None for the synthetic root
    pub parent: Option<NodeId>,
    /// Child handles in key order; None marks a leaf
    pub children: Option<Vec<NodeId>>,
    /// Own contribution to the angular partition
    pub weight: f64,
    /// Own weight plus all descendant weights
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    /// Angular midpoint, drives the label angle
    pub xm: f64,
    pub color: Lab,
    pub word_parts: WordParts,
    pub label_style: LabelStyle,
}

impl HierarchyNode {
    pub fn new(name: impl Into<String>, ancestors: Vec<String>, parent: Option<NodeId>) -> Self {
        let name = name.into();
        let word_parts = WordParts::split(&name, DEFAULT_WORD_SEPARATOR);
        Self {
            depth: ancestors.len(),
            name,
            ancestors,
            ordinal: 0,
            parent,
            children: None,
            weight: 0.0,
            value: 0.0,
            x0: 0.0,
            x1: 0.0,
            y0: 0.0,
            y1: 0.0,
            xm: 0.0,
            color: Lab::WHITE,
            word_parts,
            label_style: LabelStyle::Standard,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn angular_width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// True iff `other` names one of this node's ancestors.
    pub fn has_ancestor(&self, other: &HierarchyNode) -> bool {
        self.ancestors.iter().any(|a| *a == other.name)
    }

    /// Class string applied to matching map regions: own name, then ancestors.
    pub fn class_string(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.ancestors.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Slash-separated path below the synthetic root, e.g. `A/A1`; empty for the root.
    pub fn path(&self) -> String {
        if self.is_root() {
            return String::new();
        }
        self.ancestors
            .iter()
            .skip(1)
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Display for HierarchyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Name split for two-line label rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordParts {
    pub word1: String,
    pub word2: Option<String>,
}

impl WordParts {
    /// First segment is mandatory; only the second segment is kept as `word2`.
    pub fn split(name: &str, separator: char) -> Self {
        let mut parts = name.split(separator);
        let word1 = parts.next().unwrap_or_default().to_string();
        let word2 = parts.next().map(str::to_string);
        Self { word1, word2 }
    }

    pub fn is_multiline(&self) -> bool {
        self.word2.is_some()
    }
}

/// Label text treatment chosen from the wedge fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStyle {
    Standard,
    /// Light text on a dark wedge
    Bright,
}

/// Leaf coloring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Hash,
    #[default]
    Hue,
    HueLab,
    HueParents,
}

impl ColorScheme {
    /// Schemes whose internal nodes average their children.
    pub fn propagates(&self) -> bool {
        matches!(self, ColorScheme::Hue | ColorScheme::HueLab)
    }
}

impl FromStr for ColorScheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "hash" => Ok(ColorScheme::Hash),
            "hue" | "hue-children" => Ok(ColorScheme::Hue),
            "hue-lab" => Ok(ColorScheme::HueLab),
            "hue-parents" => Ok(ColorScheme::HueParents),
            _ => Err(DomainError::UnknownOption {
                kind: "color scheme",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorScheme::Hash => "hash",
            ColorScheme::Hue => "hue",
            ColorScheme::HueLab => "hue-lab",
            ColorScheme::HueParents => "hue-parents",
        };
        write!(f, "{s}")
    }
}

/// How label text color is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LabelColoring {
    #[default]
    Brightness,
    Flat,
}

impl FromStr for LabelColoring {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "brightness" => Ok(LabelColoring::Brightness),
            "flat" => Ok(LabelColoring::Flat),
            _ => Err(DomainError::UnknownOption {
                kind: "label coloring",
                value: s.to_string(),
            }),
        }
    }
}

/// Lowercase and unify `_`/space to `-` so `Wheel_Subtree` and `wheel-subtree` match.
pub(crate) fn normalize_token(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace(['_', ' '], "-")
}
