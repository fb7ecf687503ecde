//! Core error types

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CoreError {
    /// A resource is missing one of its identity fields
    #[error("Invalid resource {resource}: {message}")]
    #[diagnostic(code(chartkit::validation))]
    Validation { resource: String, message: String },

    #[error("Invalid chart name '{name}': {message}")]
    #[diagnostic(
        code(chartkit::validation::chart_name),
        help("Chart names become file names: use a non-empty name without path separators")
    )]
    InvalidChartName { name: String, message: String },

    #[error("Duplicate id '{id}' in {scope}")]
    #[diagnostic(code(chartkit::duplicate_id))]
    DuplicateId { scope: String, id: String },

    #[error("{identity} is defined by both '{first}' and '{second}'")]
    #[diagnostic(
        code(chartkit::duplicate_resource),
        help("Each kind/namespace/name triple may only be synthesized once")
    )]
    DuplicateResource {
        identity: String,
        first: String,
        second: String,
    },

    /// An aggregation points at a chart that is not part of the synthesized set
    #[error("Aggregation '{aggregation}' references chart '{chart}' which is not synthesized")]
    #[diagnostic(
        code(chartkit::dangling_reference),
        help("Add the chart to the app or remove the reference")
    )]
    DanglingReference { aggregation: String, chart: String },

    #[error("Aggregation '{aggregation}' references chart '{chart}' more than once")]
    #[diagnostic(code(chartkit::duplicate_reference))]
    DuplicateReference { aggregation: String, chart: String },

    #[error("Aggregation '{aggregation}' references itself")]
    #[diagnostic(code(chartkit::self_reference))]
    SelfReference { aggregation: String },

    #[error("Failed to convert object: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Re-label a validation error with the tree path of the offending object
    pub(crate) fn at(self, path: &str) -> Self {
        match self {
            CoreError::Validation { resource, message } => CoreError::Validation {
                resource: format!("{} ({})", path, resource),
                message,
            },
            other => other,
        }
    }

    /// Whether this error is a validation failure of an object or chart
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation { .. }
                | CoreError::InvalidChartName { .. }
                | CoreError::DuplicateId { .. }
                | CoreError::DuplicateResource { .. }
        )
    }

    /// Whether this error is a broken reference between charts
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            CoreError::DanglingReference { .. }
                | CoreError::DuplicateReference { .. }
                | CoreError::SelfReference { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
