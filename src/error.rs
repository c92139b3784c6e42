//! Error taxonomy for auto-mode.
//!
//! Most code propagates `anyhow::Result` with context; these typed errors sit at
//! the root of the chain so `main` can pick the right exit code.

use crate::constants::{EXIT_CONFIGURATION_ERROR, EXIT_FAILURE, EXIT_PLATFORM_ERROR};

#[derive(Debug, thiserror::Error)]
pub enum AutoModeError {
    /// Invalid or missing location, configuration value or argument.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The appearance capability is unavailable on this system or was denied.
    #[error("Platform error: {0}")]
    Platform(String),
}

impl AutoModeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => EXIT_CONFIGURATION_ERROR,
            Self::Platform(_) => EXIT_PLATFORM_ERROR,
        }
    }
}

/// Map an error chain to a process exit code.
///
/// The first `AutoModeError` found anywhere in the chain decides; anything else
/// is a general failure.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<AutoModeError>())
        .map(AutoModeError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
