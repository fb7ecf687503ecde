//! Pre-flight planning
//!
//! [`plan`] walks the whole tree once, before anything is rendered, and
//! decides what every output file contains. Aggregations are resolved here
//! against the set of charts in the same app, and resource identities are
//! checked for collisions across charts. A failing plan means no file is
//! touched.

use std::borrow::Cow;
use std::collections::HashMap;

use chartkit_core::{ApiObject, App, CoreError, Node, OutputFormat, ResourceIdentity};

use crate::error::Result;

/// One output file and the objects it will hold
#[derive(Debug, Clone)]
pub struct PlannedDocument<'a> {
    /// Name of the chart or aggregation producing the file
    pub chart: &'a str,
    /// Output file name, derived from the chart name
    pub filename: String,
    pub objects: Vec<Cow<'a, ApiObject>>,
}

/// Every output file of one synthesis run, in tree order
#[derive(Debug, Clone, Default)]
pub struct Plan<'a> {
    pub documents: Vec<PlannedDocument<'a>>,
}

impl Plan<'_> {
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|doc| doc.filename.as_str())
    }

    pub fn object_count(&self) -> usize {
        self.documents.iter().map(|doc| doc.objects.len()).sum()
    }
}

/// Validate the tree and lay out the output files
pub fn plan(app: &App, format: OutputFormat) -> Result<Plan<'_>> {
    let synthesized = app.chart_names();
    let mut owners: HashMap<ResourceIdentity, String> = HashMap::new();
    let mut documents = Vec::with_capacity(app.len());

    for node in app.nodes() {
        let entries: Vec<(String, Cow<'_, ApiObject>)> = match node {
            Node::Chart(chart) => chart
                .entries()
                .map(|(id, obj)| (format!("{}/{}", chart.name(), id), Cow::Borrowed(obj)))
                .collect(),
            Node::Aggregation(agg) => {
                let obj = agg.build(&synthesized, format)?;
                vec![(agg.name().to_string(), Cow::Owned(obj))]
            }
        };

        let mut objects = Vec::with_capacity(entries.len());
        for (path, obj) in entries {
            if let Some(first) = owners.insert(obj.identity(), path.clone()) {
                return Err(CoreError::DuplicateResource {
                    identity: obj.identity().to_string(),
                    first,
                    second: path,
                }
                .into());
            }
            objects.push(obj);
        }

        tracing::debug!(chart = %node.name(), objects = objects.len(), "planned document");

        documents.push(PlannedDocument {
            chart: node.name(),
            filename: format.filename(node.name()),
            objects,
        });
    }

    Ok(Plan { documents })
}
