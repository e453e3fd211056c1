//! Error conversion helpers for I/O at the application boundary
//!
//! Roster and config files are the only things this crate reads or writes;
//! these helpers attach the file and the attempted action to the error.

use std::fmt::Display;
use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&roster)
    ///     .with_path_context("read roster", &roster)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Add a free-form context to an I/O error.
    fn with_context(self, context: impl Display) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(format_args!("{}: {}", action, path.display()))
    }

    fn with_context(self, context: impl Display) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context.to_string(),
            source: Box::new(e),
        })
    }
}
