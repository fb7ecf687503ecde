//! CLI error types with exit code handling
//!
//! Library errors are sorted into a few CLI categories, each with its own
//! exit code. The original diagnostic is kept for display.

use chartkit_core::CoreError;
use chartkit_synth::SynthError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// An object, chart name or id was rejected
    #[error("Validation failed")]
    #[diagnostic(code(chartkit::cli::validation))]
    Validation {
        #[source]
        #[diagnostic_source]
        source: SynthError,
    },

    /// An aggregation reference could not be resolved
    #[error("Reference check failed")]
    #[diagnostic(code(chartkit::cli::reference))]
    Reference {
        #[source]
        #[diagnostic_source]
        source: SynthError,
    },

    /// Synthesized output could not be loaded
    #[error("Failed to load output")]
    #[diagnostic(code(chartkit::cli::load))]
    Load {
        #[source]
        #[diagnostic_source]
        source: SynthError,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error")]
    #[diagnostic(code(chartkit::cli::io))]
    Io {
        #[source]
        #[diagnostic_source]
        source: SynthError,
    },

    /// Anything else from the library
    #[error("{source}")]
    #[diagnostic(code(chartkit::cli::error))]
    Other { source: SynthError },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Reference { .. } => exit_codes::REFERENCE_ERROR,
            CliError::Load { .. } => exit_codes::LOAD_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }
}

impl From<SynthError> for CliError {
    fn from(source: SynthError) -> Self {
        if let Some(core) = source.as_core() {
            if core.is_validation() {
                return CliError::Validation { source };
            }
            if core.is_reference() {
                return CliError::Reference { source };
            }
        }

        match source {
            SynthError::Write { .. } | SynthError::Io(_) => CliError::Io { source },
            SynthError::OutputNotFound { .. }
            | SynthError::Parse { .. }
            | SynthError::MissingManifest { .. } => CliError::Load { source },
            _ => CliError::Other { source },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        SynthError::from(err).into()
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
