//! Synthesis driver

use std::path::{Path, PathBuf};

use chartkit_core::{App, OutputFormat};

use crate::error::Result;
use crate::plan::plan;
use crate::render::render_objects;
use crate::sink::{DirectorySink, ManifestSink};

/// Where and how a run writes its documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    /// Output directory (default: `dist`)
    pub outdir: PathBuf,

    /// Document format (default: YAML)
    pub format: OutputFormat,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            outdir: PathBuf::from("dist"),
            format: OutputFormat::default(),
        }
    }
}

/// A rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Name of the chart or aggregation that produced it
    pub chart: String,
    pub filename: String,
    pub object_count: usize,
    pub contents: String,
}

/// Result of rendering an app
#[derive(Debug, Clone, Default)]
pub struct SynthResult {
    /// Rendered documents in tree order
    pub documents: Vec<RenderedDocument>,
}

impl SynthResult {
    pub fn get(&self, filename: &str) -> Option<&RenderedDocument> {
        self.documents.iter().find(|doc| doc.filename == filename)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|doc| doc.filename.as_str())
    }
}

/// Synthesizer builder
pub struct SynthesizerBuilder {
    config: SynthConfig,
}

impl Default for SynthesizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthesizerBuilder {
    pub fn new() -> Self {
        Self {
            config: SynthConfig::default(),
        }
    }

    /// Set the output directory
    pub fn outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
        self.config.outdir = outdir.into();
        self
    }

    /// Set the document format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn build(self) -> Synthesizer {
        Synthesizer::new(self.config)
    }
}

/// Turns an app into output files
///
/// A run has three phases: plan (validate the whole tree), render (every
/// document into memory) and write (hand documents to a sink). The first two
/// are pure, so a failure there leaves the output untouched.
pub struct Synthesizer {
    config: SynthConfig,
}

impl Synthesizer {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> SynthesizerBuilder {
        SynthesizerBuilder::new()
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn outdir(&self) -> &Path {
        &self.config.outdir
    }

    /// Plan and render every document without writing
    pub fn render(&self, app: &App) -> Result<SynthResult> {
        let plan = plan(app, self.config.format)?;

        let mut documents = Vec::with_capacity(plan.documents.len());
        for doc in &plan.documents {
            let contents = render_objects(doc.objects.iter().map(|o| &**o), self.config.format)?;
            documents.push(RenderedDocument {
                chart: doc.chart.to_string(),
                filename: doc.filename.clone(),
                object_count: doc.objects.len(),
                contents,
            });
        }

        Ok(SynthResult { documents })
    }

    /// Hand rendered documents to a sink, in order
    pub fn write(&self, result: &SynthResult, sink: &mut dyn ManifestSink) -> Result<()> {
        for doc in &result.documents {
            sink.write(&doc.filename, &doc.contents)?;
        }
        Ok(())
    }

    /// Render the app and write it to `sink`
    pub fn synth_into(&self, app: &App, sink: &mut dyn ManifestSink) -> Result<SynthResult> {
        let result = self.render(app)?;
        self.write(&result, sink)?;
        tracing::info!(
            documents = result.documents.len(),
            format = %self.config.format,
            "synthesized app"
        );
        Ok(result)
    }

    /// Render the app and write it to the configured output directory
    pub fn synth(&self, app: &App) -> Result<SynthResult> {
        let mut sink = DirectorySink::new(&self.config.outdir);
        self.synth_into(app, &mut sink)
    }
}
