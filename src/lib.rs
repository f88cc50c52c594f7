//! sunwheel: sunburst wheel layout engine
//!
//! Turns a nested name hierarchy into a radial partition with Lab-averaged
//! colors, and drives the zoom and cross-diagram highlight interactions.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{WheelContext, ApplicationError, ApplicationResult};
pub use config::Settings;
pub use domain::{DomainError, HierarchyArena, HierarchyBuilder, HierarchyNode, NodeId, Relation};
