//! Infrastructure layer: I/O implementations
//!
//! This layer reads hierarchy documents and region lists from disk.

pub mod error;
pub mod loader;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use loader::{load_hierarchy, load_region_names};
pub use traits::{FileSystem, MemoryFileSystem, RealFileSystem};
