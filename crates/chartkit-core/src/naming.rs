//! Output file naming
//!
//! Every chart is written to exactly one file whose name is derived from the
//! chart name alone. Anything that needs to point at another chart's output
//! (an aggregation, the loader, the CLI listing) goes through
//! [`chart_output_filename`] or [`OutputFormat::filename`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// File names recognised as kustomization entry points
const KUSTOMIZATION_FILES: &[&str] = &[
    "kustomization.yaml",
    "kustomization.yml",
    "kustomization.k8s.yaml",
    "kustomization.k8s.json",
    "Kustomization",
];

/// Serialization format of synthesized documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-document YAML stream (default)
    #[default]
    Yaml,
    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    const ALL: [OutputFormat; 2] = [OutputFormat::Yaml, OutputFormat::Json];

    fn suffix(self) -> &'static str {
        match self {
            OutputFormat::Yaml => ".k8s.yaml",
            OutputFormat::Json => ".k8s.json",
        }
    }

    /// Output file name for the chart called `chart_name`
    #[must_use]
    pub fn filename(self, chart_name: &str) -> String {
        format!("{}{}", chart_name, self.suffix())
    }

    /// Inverse of [`OutputFormat::filename`]
    pub fn chart_name(self, filename: &str) -> Option<&str> {
        filename
            .strip_suffix(self.suffix())
            .filter(|stem| !stem.is_empty())
    }

    /// Find the format and chart name a file name was derived from
    pub fn detect(filename: &str) -> Option<(OutputFormat, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|format| format.chart_name(filename).map(|name| (format, name)))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Output file name of a chart in the default (YAML) format
///
/// `nginx-deployment` becomes `nginx-deployment.k8s.yaml`.
#[must_use]
pub fn chart_output_filename(chart_name: &str) -> String {
    OutputFormat::Yaml.filename(chart_name)
}

/// Check if a file name is a kustomization entry point
pub fn is_kustomization_file(file_name: &str) -> bool {
    KUSTOMIZATION_FILES.contains(&file_name)
}

/// Whether a chart called `chart_name` would be written under a kustomization file name
pub fn writes_kustomization_file(chart_name: &str) -> bool {
    OutputFormat::ALL
        .into_iter()
        .any(|format| is_kustomization_file(&format.filename(chart_name)))
}

/// Check that a chart name can be used as a file name stem
pub fn validate_chart_name(name: &str) -> Result<()> {
    let invalid = |message: &str| {
        Err(CoreError::InvalidChartName {
            name: name.to_string(),
            message: message.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name.trim() != name {
        return invalid("name has leading or trailing whitespace");
    }
    if name == "." || name == ".." {
        return invalid("name is a relative path component");
    }
    if name.contains(['/', '\\']) {
        return invalid("name contains a path separator");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_output_filename() {
        assert_eq!(chart_output_filename("nginx-deployment"), "nginx-deployment.k8s.yaml");
        assert_eq!(OutputFormat::Json.filename("nginx-deployment"), "nginx-deployment.k8s.json");
    }

    #[test]
    fn test_writes_kustomization_file() {
        assert!(writes_kustomization_file("kustomization"));
        assert!(!writes_kustomization_file("kustomization-extra"));
        assert!(!writes_kustomization_file("nginx-deployment"));
    }

    #[test]
    fn test_chart_output_filename_is_stable() {
        let first = chart_output_filename("headlamp-deployment");
        let second = chart_output_filename("headlamp-deployment");
        assert_eq!(first, second);
    }

    #[test]
    fn test_chart_output_filename_is_injective() {
        let names = ["a", "b", "a.k8s", "ab", "a-b", "kustomization", "A"];
        let filenames: std::collections::HashSet<_> =
            names.iter().map(|n| chart_output_filename(n)).collect();
        assert_eq!(filenames.len(), names.len());
    }

    #[test]
    fn test_chart_name_inverse() {
        for name in ["nginx-deployment", "a.k8s", "x"] {
            let filename = chart_output_filename(name);
            assert_eq!(OutputFormat::Yaml.chart_name(&filename), Some(name));
        }
        assert_eq!(OutputFormat::Yaml.chart_name(".k8s.yaml"), None);
        assert_eq!(OutputFormat::Yaml.chart_name("nginx.yaml"), None);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            OutputFormat::detect("web.k8s.json"),
            Some((OutputFormat::Json, "web"))
        );
        assert_eq!(
            OutputFormat::detect("web.k8s.yaml"),
            Some((OutputFormat::Yaml, "web"))
        );
        assert_eq!(OutputFormat::detect("web.yml"), None);
    }

    #[test]
    fn test_is_kustomization_file() {
        assert!(is_kustomization_file("kustomization.yaml"));
        assert!(is_kustomization_file("kustomization.k8s.yaml"));
        assert!(is_kustomization_file("Kustomization"));
        assert!(!is_kustomization_file("nginx-deployment.k8s.yaml"));
        assert!(!is_kustomization_file("my-kustomization.yaml"));
    }

    #[test]
    fn test_validate_chart_name() {
        assert!(validate_chart_name("nginx-deployment").is_ok());
        assert!(validate_chart_name("v1.2").is_ok());

        for bad in ["", " web", "web ", ".", "..", "a/b", "a\\b"] {
            let err = validate_chart_name(bad).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidChartName { .. }),
                "expected invalid chart name for {:?}",
                bad
            );
        }
    }
}
