//! chartkit Core - typed Kubernetes objects grouped into charts
//!
//! This crate provides the construct tree that gets synthesized to manifests:
//! - `ApiObject`: A validated, immutable Kubernetes object
//! - `Chart`: A named group of objects written to one output file
//! - `Aggregation`: A Kustomization listing other charts' output files
//! - `App`: The root of the tree, owning every chart
//! - `naming`: The single place output filenames are derived

pub mod aggregation;
pub mod app;
pub mod chart;
pub mod error;
pub mod naming;
pub mod object;

pub use aggregation::{Aggregation, KUSTOMIZATION_KIND, KUSTOMIZE_API_VERSION};
pub use app::{App, Node};
pub use chart::{Chart, ChartProps};
pub use error::{CoreError, Result};
pub use naming::{
    OutputFormat, chart_output_filename, is_kustomization_file, writes_kustomization_file,
};
pub use object::{ApiObject, ApiObjectProps, ObjectMetadata, ResourceIdentity};
