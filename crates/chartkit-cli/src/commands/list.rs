//! List command - show the charts of the sample app

use chartkit_core::{Node, OutputFormat};
use console::style;

use crate::error::Result;
use crate::sample;

pub fn run(format: OutputFormat) -> Result<()> {
    let app = sample::build_app()?;

    println!(
        "{:<24} {:<12} {:<8} {}",
        style("CHART").bold(),
        style("TYPE").bold(),
        style("OBJECTS").bold(),
        style("FILE").bold()
    );

    for node in app.nodes() {
        let (kind, objects) = match node {
            Node::Chart(chart) => ("chart", chart.len()),
            Node::Aggregation(_) => ("aggregation", 1),
        };
        println!(
            "{:<24} {:<12} {:<8} {}",
            node.name(),
            kind,
            objects,
            format.filename(node.name())
        );
    }

    for aggregation in app.aggregations() {
        println!();
        println!(
            "{} {}:",
            style(aggregation.name()).cyan().bold(),
            style("references").dim()
        );
        for reference in aggregation.references() {
            println!("  - {}", reference);
        }
    }

    Ok(())
}
