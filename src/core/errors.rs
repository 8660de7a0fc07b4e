//!    Error handling
//!
//! This module provides error handling using anyhow.
//! Nothing in this crate surfaces an error to the user: failures are logged
//! at the boundary where they are caught and the feature degrades to doing
//! nothing.

#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, ensure, Error};
use anyhow::{Context, Result};

/// Result type alias for convenience throughout the application
pub type CycleResult<T> = Result<T>;

/// Helper functions for creating common error contexts
pub trait CycleContext<T> {
    /// Add file operation context to an error
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> CycleResult<T>;

    /// Add tool activation context to an error
    fn with_activation_context(
        self,
        layer_id: &str,
        tool_id: &str,
    ) -> CycleResult<T>;
}

impl<T, E> CycleContext<T> for Result<T, E>
where
    Self: Context<T, E>,
{
    fn with_file_context<P: AsRef<std::path::Path>>(
        self,
        operation: &str,
        path: P,
    ) -> CycleResult<T> {
        self.with_context(|| {
            format!("Failed to {} file: {}", operation, path.as_ref().display())
        })
    }

    fn with_activation_context(
        self,
        layer_id: &str,
        tool_id: &str,
    ) -> CycleResult<T> {
        self.with_context(|| {
            format!("Failed to activate tool '{tool_id}' on layer '{layer_id}'")
        })
    }
}

/// Error for an activation request naming a layer the host doesn't know
#[macro_export]
macro_rules! layer_not_found {
    ($layer:expr, $available:expr) => {
        anyhow::anyhow!(
            "Layer '{}' not found in scene controls (available layers: {})",
            $layer,
            $available
        )
    };
}

/// Error for an activation request naming a tool the layer doesn't expose
#[macro_export]
macro_rules! tool_not_found {
    ($layer:expr, $tool:expr) => {
        anyhow::anyhow!("Tool '{}' not found on layer '{}'", $tool, $layer)
    };
}

/// Validate a path handed to us on the command line
pub fn validate_config_path<P: AsRef<std::path::Path>>(
    path: P,
) -> CycleResult<()> {
    let path = path.as_ref();

    ensure!(path.exists(), "Config path does not exist: {}", path.display());
    ensure!(
        path.is_file(),
        "Config path must be a file: {}",
        path.display()
    );
    ensure!(
        path.extension().and_then(|s| s.to_str()) == Some("json"),
        "Config file must be JSON: {}",
        path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_context_names_layer_and_tool() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "host refused",
        ));
        let err = result.with_activation_context("walls", "door").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to activate tool 'door' on layer 'walls'"
        );
    }

    #[test]
    fn activation_context_wraps_anyhow_errors() {
        let result: CycleResult<()> = Err(anyhow!("tool is disabled"));
        let err = result.with_activation_context("walls", "terrain").unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "Failed to activate tool 'terrain' on layer 'walls': tool is disabled"
        );
    }

    #[test]
    fn missing_config_path_is_rejected() {
        let err = validate_config_path("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
