//! Domain layer: hierarchy, layout, color, swatches and ancestry
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod ancestry;
pub mod arena;
pub mod builder;
pub mod color;
pub mod coloring;
pub mod entities;
pub mod error;
pub mod partition;
pub mod swatch;

pub use ancestry::{evaluate, Relation};
pub use arena::HierarchyArena;
pub use builder::HierarchyBuilder;
pub use color::{Hsl, Lab, Rgb};
pub use coloring::ColorAssigner;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use partition::{deepest_y1, RadialPartitioner, DEFAULT_DEPTH_CUTOFF};
pub use swatch::{SwatchGrid, SwatchPlane, DEFAULT_SWATCH_STEP};
