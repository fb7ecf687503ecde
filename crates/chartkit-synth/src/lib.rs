//! chartkit Synth - writes chartkit apps as Kubernetes manifests
//!
//! This crate turns an [`App`](chartkit_core::App) into output files:
//! - Pre-flight checks over the whole tree before anything is rendered
//! - YAML stream or JSON array rendering, byte-stable between runs
//! - Pluggable sinks (directory on disk, in-memory for tests)
//! - A loader that reads synthesized output back, following kustomizations

pub mod error;
pub mod loader;
pub mod plan;
pub mod render;
pub mod sink;
pub mod synthesizer;

pub use error::{Result, SynthError};
pub use loader::{LoadedManifest, LoadedOutput, load_output};
pub use plan::{Plan, PlannedDocument, plan};
pub use render::{parse_documents, render_objects};
pub use sink::{DirectorySink, ManifestSink, MemorySink};
pub use synthesizer::{RenderedDocument, SynthConfig, SynthResult, Synthesizer, SynthesizerBuilder};
