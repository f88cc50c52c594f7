//! Hierarchy builder: nested name mapping -> typed node arena.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::domain::arena::HierarchyArena;
use crate::domain::entities::{HierarchyNode, NodeId, WordParts, DEFAULT_WORD_SEPARATOR};
use crate::domain::error::{DomainError, DomainResult};

/// Nesting limit; deeper input is treated as a runaway (cyclic) structure.
pub const MAX_DEPTH: usize = 256;

/// Result type for hierarchy building.
pub type BuildResult<T> = Result<T, DomainError>;

/// Converts a nested `{name: {child: {...}}}` mapping into a [`HierarchyArena`].
///
/// Keys are names, values are the same mapping type recursively; an empty
/// mapping is a leaf. A synthetic root is placed above the top-level keys.
pub struct HierarchyBuilder {
    root_name: String,
    word_separator: char,
}

impl HierarchyBuilder {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            word_separator: DEFAULT_WORD_SEPARATOR,
        }
    }

    pub fn with_word_separator(mut self, separator: char) -> Self {
        self.word_separator = separator;
        self
    }

    /// Parse JSON text, then build.
    pub fn build_from_str(&self, json: &str) -> BuildResult<HierarchyArena> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DomainError::MalformedHierarchy {
                path: String::new(),
                reason: e.to_string(),
            })?;
        self.build(&value)
    }

    /// Parse JSON from a reader, then build.
    pub fn build_from_reader<R: std::io::Read>(&self, reader: R) -> BuildResult<HierarchyArena> {
        let value: Value =
            serde_json::from_reader(reader).map_err(|e| DomainError::MalformedHierarchy {
                path: String::new(),
                reason: e.to_string(),
            })?;
        self.build(&value)
    }

    /// Build the arena with a depth-first walk.
    ///
    /// Nodes are inserted in pre-order, children in key order, so the arena's
    /// flattening puts the root at 0 and each parent right before its subtree.
    #[instrument(level = "debug", skip(self, hierarchy), fields(root = %self.root_name))]
    pub fn build(&self, hierarchy: &Value) -> BuildResult<HierarchyArena> {
        let top = as_mapping(hierarchy, &self.root_name)?;

        let mut tree = HierarchyArena::new();
        let root = self.make_node(&self.root_name, Vec::new(), None);
        let root_idx = tree.insert_node(root, None);
        self.insert_level(&mut tree, top, vec![self.root_name.clone()], root_idx)?;

        debug!("built hierarchy with {} nodes", tree.len());
        Ok(tree)
    }

    /// Insert every entry of `mapping`, each immediately followed by its subtree.
    fn insert_level(
        &self,
        tree: &mut HierarchyArena,
        mapping: &Map<String, Value>,
        ancestors: Vec<String>,
        parent_idx: NodeId,
    ) -> BuildResult<()> {
        for (name, child) in mapping {
            let path = path_of(&ancestors, name);
            if name.trim().is_empty() {
                return Err(DomainError::MalformedHierarchy {
                    path,
                    reason: "empty name".to_string(),
                });
            }
            if ancestors.len() >= MAX_DEPTH {
                return Err(DomainError::MalformedHierarchy {
                    path,
                    reason: format!("nesting deeper than {MAX_DEPTH} levels"),
                });
            }
            let sub = as_mapping(child, &path)?;

            let node = self.make_node(name, ancestors.clone(), Some(parent_idx));
            let idx = tree.insert_node(node, Some(parent_idx));

            if !sub.is_empty() {
                let mut child_ancestors = ancestors.clone();
                child_ancestors.push(name.clone());
                self.insert_level(tree, sub, child_ancestors, idx)?;
            }
        }
        Ok(())
    }

    fn make_node(&self, name: &str, ancestors: Vec<String>, parent: Option<NodeId>) -> HierarchyNode {
        let mut node = HierarchyNode::new(name, ancestors, parent);
        node.word_parts = WordParts::split(name, self.word_separator);
        node
    }
}

fn as_mapping<'v>(value: &'v Value, path: &str) -> DomainResult<&'v Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::MalformedHierarchy {
            path: path.to_string(),
            reason: format!("expected a mapping, found {}", kind_of(other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn path_of(ancestors: &[String], name: &str) -> String {
    ancestors
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(name))
        .collect::<Vec<_>>()
        .join("/")
}
