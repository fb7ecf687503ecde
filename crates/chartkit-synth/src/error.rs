//! Synthesis error types

use chartkit_core::CoreError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SynthError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] CoreError),

    #[error("YAML error: {0}")]
    #[diagnostic(code(chartkit::synth::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(chartkit::synth::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    #[diagnostic(code(chartkit::synth::write))]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(chartkit::synth::io))]
    Io(#[from] std::io::Error),

    #[error("Output directory not found: {path}")]
    #[diagnostic(
        code(chartkit::load::not_found),
        help("Run `chartkit synth` first or pass the directory it wrote to")
    )]
    OutputNotFound { path: String },

    #[error("Failed to parse {path}: {message}")]
    #[diagnostic(code(chartkit::load::parse))]
    Parse { path: String, message: String },

    #[error("Kustomization {kustomization} references missing file {path}")]
    #[diagnostic(code(chartkit::load::missing_manifest))]
    MissingManifest { kustomization: String, path: String },
}

impl SynthError {
    /// The core error behind this one, if any
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            SynthError::Core(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
