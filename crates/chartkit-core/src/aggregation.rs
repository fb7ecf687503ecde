//! Aggregation documents (kustomizations)
//!
//! An [`Aggregation`] is a chart whose single object lists the output files
//! of other charts. It stores chart *names*; file names are only derived when
//! the document is built, with the same function the synthesizer uses to
//! name the files, and only after checking the names against the set of
//! charts actually being synthesized.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};
use crate::naming::{OutputFormat, validate_chart_name};
use crate::object::{ApiObject, ApiObjectProps, ObjectMetadata};

pub const KUSTOMIZE_API_VERSION: &str = "kustomize.config.k8s.io/v1beta1";
pub const KUSTOMIZATION_KIND: &str = "Kustomization";

/// A kustomization referencing other charts by name
#[derive(Debug, Clone)]
pub struct Aggregation {
    name: String,
    metadata: ObjectMetadata,
    references: Vec<String>,
}

impl Aggregation {
    /// Create an aggregation chart called `name`
    ///
    /// The kustomization object takes the same name unless
    /// [`Aggregation::object_name`] overrides it. Any name works for loading
    /// back: the loader recognizes the output by its `Kustomization` kind.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_chart_name(&name)?;
        Ok(Self {
            metadata: ObjectMetadata {
                name: name.clone(),
                ..Default::default()
            },
            name,
            references: Vec::new(),
        })
    }

    pub fn object_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.name = name.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.labels.insert(key.into(), value.into());
        self
    }

    /// Append a chart reference; order is kept in the output
    pub fn reference(mut self, chart: impl Into<String>) -> Self {
        self.references.push(chart.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Referenced chart names, in order
    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn output_filename(&self, format: OutputFormat) -> String {
        format.filename(&self.name)
    }

    /// Check every reference against the synthesized chart set
    pub fn check_references(&self, synthesized: &HashSet<&str>) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.references.len());

        for chart in &self.references {
            if chart == &self.name {
                return Err(CoreError::SelfReference {
                    aggregation: self.name.clone(),
                });
            }
            if !synthesized.contains(chart.as_str()) {
                return Err(CoreError::DanglingReference {
                    aggregation: self.name.clone(),
                    chart: chart.clone(),
                });
            }
            if !seen.insert(chart.as_str()) {
                return Err(CoreError::DuplicateReference {
                    aggregation: self.name.clone(),
                    chart: chart.clone(),
                });
            }
        }
        Ok(())
    }

    /// Build the kustomization object
    ///
    /// `synthesized` is the set of chart names written in the same run.
    /// The `resources` list is the referenced charts' file names, in
    /// reference order.
    pub fn build(&self, synthesized: &HashSet<&str>, format: OutputFormat) -> Result<ApiObject> {
        self.check_references(synthesized)?;

        let resources: Vec<JsonValue> = self
            .references
            .iter()
            .map(|chart| JsonValue::String(format.filename(chart)))
            .collect();

        let props = ApiObjectProps {
            api_version: KUSTOMIZE_API_VERSION.to_string(),
            kind: KUSTOMIZATION_KIND.to_string(),
            metadata: self.metadata.clone(),
            payload: BTreeMap::from([("resources".to_string(), JsonValue::Array(resources))]),
        };

        ApiObject::new(props, None).map_err(|e| e.at(&self.name))
    }
}
