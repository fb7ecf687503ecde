//! The construct tree root
//!
//! An [`App`] owns every chart that is synthesized together. Chart names are
//! unique among the app's children, which makes the derived output file
//! names unique as well.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::aggregation::Aggregation;
use crate::chart::Chart;
use crate::error::{CoreError, Result};
use crate::naming::writes_kustomization_file;

/// A child of the app
#[derive(Debug, Clone)]
pub enum Node {
    /// A chart of regular objects
    Chart(Chart),
    /// A kustomization over other charts
    Aggregation(Aggregation),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Chart(chart) => chart.name(),
            Node::Aggregation(agg) => agg.name(),
        }
    }
}

/// Root of the construct tree
#[derive(Debug, Clone, Default)]
pub struct App {
    nodes: IndexMap<String, Node>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chart
    ///
    /// A regular chart may not take a name whose output file would be read
    /// back as a kustomization; that name belongs to aggregations.
    pub fn add_chart(&mut self, chart: Chart) -> Result<()> {
        if writes_kustomization_file(chart.name()) {
            return Err(CoreError::InvalidChartName {
                name: chart.name().to_string(),
                message: "output file name is reserved for aggregations".to_string(),
            });
        }
        self.insert(Node::Chart(chart))
    }

    /// Add an aggregation
    ///
    /// References are not checked here: the referenced charts may be added
    /// later. They are checked against the full tree at synthesis time.
    pub fn add_aggregation(&mut self, aggregation: Aggregation) -> Result<()> {
        self.insert(Node::Aggregation(aggregation))
    }

    fn insert(&mut self, node: Node) -> Result<()> {
        let name = node.name().to_string();
        if self.nodes.contains_key(&name) {
            return Err(CoreError::DuplicateId {
                scope: "app".to_string(),
                id: name,
            });
        }

        tracing::debug!(node = %name, "added node");
        self.nodes.insert(name, node);
        Ok(())
    }

    /// Children in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.nodes.values().filter_map(|node| match node {
            Node::Chart(chart) => Some(chart),
            Node::Aggregation(_) => None,
        })
    }

    pub fn aggregations(&self) -> impl Iterator<Item = &Aggregation> {
        self.nodes.values().filter_map(|node| match node {
            Node::Aggregation(agg) => Some(agg),
            Node::Chart(_) => None,
        })
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn chart(&self, name: &str) -> Option<&Chart> {
        match self.nodes.get(name) {
            Some(Node::Chart(chart)) => Some(chart),
            _ => None,
        }
    }

    /// Names of the charts an aggregation may reference
    pub fn chart_names(&self) -> HashSet<&str> {
        self.charts().map(Chart::name).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
