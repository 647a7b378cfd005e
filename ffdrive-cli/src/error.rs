// ============================================================================
// ffdrive-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and context helpers
//
// The CLI reuses `CoreError`. Failures that only exist at this layer (reading
// an overlay file, writing a frame) are wrapped with a short context string.

use std::fmt;

use ffdrive_core::{CoreError, CoreResult};

pub type CliResult<T> = CoreResult<T>;

/// Adds a context prefix to an error, similar to anyhow's `context`.
pub trait CliErrorContext<T> {
    fn cli_context<C: fmt::Display>(self, context: C) -> CliResult<T>;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn cli_context<C: fmt::Display>(self, context: C) -> CliResult<T> {
        self.map_err(|e| CoreError::InvalidInput(format!("{context}: {e}")))
    }
}
