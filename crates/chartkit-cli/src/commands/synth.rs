//! Synth command - write the sample app's manifests

use chartkit_core::OutputFormat;
use chartkit_synth::Synthesizer;
use console::style;
use std::path::Path;

use crate::error::Result;
use crate::sample;
use crate::util::{format_size, plural};

pub fn run(output_dir: &Path, format: OutputFormat) -> Result<()> {
    let app = sample::build_app()?;
    tracing::debug!(nodes = app.len(), "built sample app");

    let synthesizer = Synthesizer::builder()
        .outdir(output_dir)
        .format(format)
        .build();
    tracing::debug!(outdir = %output_dir.display(), %format, "synthesizing");
    let result = synthesizer.synth(&app)?;

    for doc in &result.documents {
        println!(
            "  {} {} ({}, {})",
            style("wrote").green(),
            output_dir.join(&doc.filename).display(),
            plural(doc.object_count, "object"),
            format_size(doc.contents.len())
        );
    }

    println!();
    println!(
        "{} Synthesized {} to {}",
        style("✓").green().bold(),
        plural(result.documents.len(), "file"),
        output_dir.display()
    );

    Ok(())
}
