//! Inspect command - list the resources of a synthesized output directory

use chartkit_synth::load_output;
use console::style;
use std::path::Path;

use crate::error::Result;
use crate::util::{plural, relative_to};

pub fn run(dir: &Path) -> Result<()> {
    let output = load_output(dir)?;
    tracing::debug!(
        dir = %dir.display(),
        kustomizations = output.kustomizations.len(),
        manifests = output.manifests.len(),
        "loaded output"
    );

    if output.is_aggregated() {
        for kustomization in &output.kustomizations {
            println!(
                "{} {}",
                style("Kustomization").cyan().bold(),
                relative_to(kustomization, dir).display()
            );
        }
        println!();
    }

    if output.manifests.is_empty() {
        println!("No manifests found in {}", dir.display());
        return Ok(());
    }

    for manifest in &output.manifests {
        let chart = manifest
            .chart
            .as_deref()
            .map(|name| format!(" ({})", name))
            .unwrap_or_default();
        println!(
            "{}{}",
            style(relative_to(&manifest.path, dir).display()).bold(),
            style(chart).dim()
        );
        for object in &manifest.objects {
            println!("  {}", object.identity());
        }
    }

    println!();
    println!(
        "{} in {}",
        plural(output.objects().count(), "resource"),
        plural(output.manifests.len(), "file")
    );

    Ok(())
}
