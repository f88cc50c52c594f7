//! Ancestry relations used to decide which nodes light up together.
//!
//! Every relation is a membership test on the `ancestors` list computed at
//! build time; no traversal happens at query time.

use std::fmt;
use std::str::FromStr;

use crate::domain::entities::{normalize_token, HierarchyNode};
use crate::domain::error::DomainError;

/// Named relation between a node `a` and a basis node `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Same name
    Node,
    /// `a` is `b` or one of `b`'s ancestors
    Ancestors,
    /// `a` and `b` lie on one root-to-leaf path, in either direction
    Lineage,
    /// `a` is `b` or inside `b`'s subtree
    Subtree,
    /// `a` is inside the subtree of the current wheel focus; `b` is ignored
    WheelSubtree,
    /// Always true
    All,
}

impl Relation {
    pub const VARIANTS: [Relation; 6] = [
        Relation::Node,
        Relation::Ancestors,
        Relation::Lineage,
        Relation::Subtree,
        Relation::WheelSubtree,
        Relation::All,
    ];

    /// Lenient parse: unknown names fall back to [`Relation::All`].
    ///
    /// This is the only place the permissive fallback applies; everything
    /// else goes through [`FromStr`] and reports `UnknownRelationMode`.
    pub fn parse_or_all(s: &str) -> Relation {
        s.parse().unwrap_or(Relation::All)
    }

    /// Evaluate the relation for `a` against basis `b`, with the wheel focus
    /// passed explicitly for [`Relation::WheelSubtree`].
    pub fn holds(&self, a: &HierarchyNode, b: &HierarchyNode, focus: &HierarchyNode) -> bool {
        match self {
            Relation::Node => is_same(a, b),
            Relation::Ancestors => is_same(a, b) || b.has_ancestor(a),
            Relation::Lineage => is_same(a, b) || b.has_ancestor(a) || a.has_ancestor(b),
            Relation::Subtree => is_same(a, b) || a.has_ancestor(b),
            Relation::WheelSubtree => Relation::Subtree.holds(a, focus, focus),
            Relation::All => true,
        }
    }
}

/// Free-function form of [`Relation::holds`].
pub fn evaluate(
    relation: Relation,
    a: &HierarchyNode,
    b: &HierarchyNode,
    focus: &HierarchyNode,
) -> bool {
    relation.holds(a, b, focus)
}

fn is_same(a: &HierarchyNode, b: &HierarchyNode) -> bool {
    a.name == b.name
}

impl FromStr for Relation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "node" | "self" => Ok(Relation::Node),
            "ancestors" => Ok(Relation::Ancestors),
            "lineage" => Ok(Relation::Lineage),
            "subtree" => Ok(Relation::Subtree),
            "wheel-subtree" => Ok(Relation::WheelSubtree),
            "all" | "show-all" => Ok(Relation::All),
            _ => Err(DomainError::UnknownRelationMode(s.to_string())),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Node => "node",
            Relation::Ancestors => "ancestors",
            Relation::Lineage => "lineage",
            Relation::Subtree => "subtree",
            Relation::WheelSubtree => "wheel-subtree",
            Relation::All => "all",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_parse() {
        for relation in Relation::VARIANTS {
            assert_eq!(relation.to_string().parse::<Relation>().unwrap(), relation);
        }
    }

    #[test]
    fn unknown_mode_is_an_error_unless_lenient() {
        assert_eq!(
            "sideways".parse::<Relation>(),
            Err(DomainError::UnknownRelationMode("sideways".into()))
        );
        assert_eq!(Relation::parse_or_all("sideways"), Relation::All);
    }
}
