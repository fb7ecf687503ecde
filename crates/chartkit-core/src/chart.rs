//! Charts: named groups of objects written to one output file

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::naming::{OutputFormat, validate_chart_name};
use crate::object::{ApiObject, ApiObjectProps};

/// Defaults shared by every object in a chart
#[derive(Debug, Clone, Default)]
pub struct ChartProps {
    /// Namespace for objects that don't set one
    pub namespace: Option<String>,

    /// Labels added to every object; an object's own label wins on conflict
    pub labels: BTreeMap<String, String>,
}

impl ChartProps {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// A named group of objects
///
/// The chart name is both the node id inside the [`App`](crate::App) and the
/// stem of the output file name.
#[derive(Debug, Clone)]
pub struct Chart {
    name: String,
    props: ChartProps,
    objects: IndexMap<String, ApiObject>,
}

impl Chart {
    /// Create an empty chart
    pub fn new(name: impl Into<String>, props: ChartProps) -> Result<Self> {
        let name = name.into();
        validate_chart_name(&name)?;
        Ok(Self {
            name,
            props,
            objects: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn props(&self) -> &ChartProps {
        &self.props
    }

    /// Add an object under `id`, applying the chart defaults
    ///
    /// Ids are unique within the chart. The object is validated here, so a
    /// chart never holds an invalid object.
    pub fn add(&mut self, id: impl Into<String>, mut props: ApiObjectProps) -> Result<&ApiObject> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::Validation {
                resource: self.name.clone(),
                message: "object id is empty".to_string(),
            });
        }
        if self.objects.contains_key(&id) {
            return Err(CoreError::DuplicateId {
                scope: format!("chart '{}'", self.name),
                id,
            });
        }

        for (key, value) in &self.props.labels {
            props
                .metadata
                .labels
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        let path = format!("{}/{}", self.name, id);
        let object = ApiObject::new(props, self.props.namespace.as_deref())
            .map_err(|e| e.at(&path))?;

        tracing::debug!(chart = %self.name, id = %id, object = %object, "added object");

        let index = self.objects.insert_full(id, object).0;
        Ok(&self.objects[index])
    }

    /// Add a typed Kubernetes object under `id`
    pub fn add_typed<K>(&mut self, id: impl Into<String>, object: &K) -> Result<&ApiObject>
    where
        K: k8s_openapi::Resource + Serialize,
    {
        self.add(id, ApiObjectProps::from_typed(object)?)
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &ApiObject> {
        self.objects.values()
    }

    /// Objects with their ids, in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ApiObject)> {
        self.objects.iter().map(|(id, obj)| (id.as_str(), obj))
    }

    pub fn get(&self, id: &str) -> Option<&ApiObject> {
        self.objects.get(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn output_filename(&self, format: OutputFormat) -> String {
        format.filename(&self.name)
    }
}
