//! Error conversion helpers
//!
//! Provides extension traits for attaching node context to domain results.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainResult;

/// Extension trait for converting `DomainResult` to `ApplicationResult` with context.
pub trait DomainResultExt<T> {
    /// Wrap a domain error with the action that failed.
    ///
    /// # Example
    /// ```ignore
    /// tree.find_path(path).with_action_context("zoom to")?;
    /// ```
    fn with_action_context(self, action: &str) -> ApplicationResult<T>;
}

impl<T> DomainResultExt<T> for DomainResult<T> {
    fn with_action_context(self, action: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{action}: {e}"),
            source: Box::new(e),
        })
    }
}
