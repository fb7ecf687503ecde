//! Loading synthesized output back from disk
//!
//! The loader mirrors how a consumer picks up a synthesis run:
//! - Walk the output directory for `.yaml`, `.yml` and `.json` files
//! - A file is a kustomization when every document in it has kind
//!   `Kustomization`, or when it has a kustomization file name and no
//!   document declares another kind
//! - If kustomizations are present, load only the manifests they list,
//!   resolved relative to each kustomization, in listed order, each file once
//! - Otherwise load every manifest, sorted by path
//!
//! Every document goes through the same validation as a freshly built object.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chartkit_core::{ApiObject, KUSTOMIZATION_KIND, OutputFormat, is_kustomization_file};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{Result, SynthError};
use crate::render::parse_documents;

/// The part of a kustomization the loader cares about
#[derive(Debug, Default, Deserialize)]
struct KustomizationFile {
    #[serde(default)]
    resources: Vec<String>,
}

/// Objects parsed from one manifest file
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    /// Chart the file was synthesized from, when its name follows the convention
    pub chart: Option<String>,
    pub objects: Vec<ApiObject>,
}

/// Everything loaded from an output directory
#[derive(Debug, Clone, Default)]
pub struct LoadedOutput {
    /// Kustomization files that selected the manifests (empty if none)
    pub kustomizations: Vec<PathBuf>,
    pub manifests: Vec<LoadedManifest>,
}

impl LoadedOutput {
    /// Whether manifests were selected through kustomizations
    pub fn is_aggregated(&self) -> bool {
        !self.kustomizations.is_empty()
    }

    /// All objects, in load order
    pub fn objects(&self) -> impl Iterator<Item = &ApiObject> {
        self.manifests.iter().flat_map(|m| m.objects.iter())
    }
}

/// Load the manifests of a synthesized output directory
pub fn load_output(dir: &Path) -> Result<LoadedOutput> {
    if !dir.is_dir() {
        return Err(SynthError::OutputNotFound {
            path: dir.display().to_string(),
        });
    }

    let (kustomizations, regular) = find_manifests(dir)?;

    let paths = if kustomizations.is_empty() {
        regular
    } else {
        let mut seen = HashSet::new();
        let mut paths = Vec::new();
        for kustomization in &kustomizations {
            for path in read_kustomization(kustomization)? {
                // Kustomizations may reach the same file through different relative paths
                let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                if seen.insert(key) {
                    paths.push(path);
                } else {
                    tracing::debug!(path = %path.display(), "manifest already listed");
                }
            }
        }
        paths
    };

    let manifests = paths
        .into_iter()
        .map(|path| load_manifest(&path))
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedOutput {
        kustomizations,
        manifests,
    })
}

/// Split the files under `dir` into kustomizations and regular manifests
fn find_manifests(dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut kustomizations = Vec::new();
    let mut regular = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| SynthError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let named_kustomization = is_kustomization_file(&file_name);
        if !named_kustomization && !has_manifest_extension(&file_name) {
            tracing::warn!(path = %entry.path().display(), "skipping non-manifest file");
            continue;
        }

        if is_kustomization(entry.path(), named_kustomization) {
            kustomizations.push(entry.into_path());
        } else {
            regular.push(entry.into_path());
        }
    }

    Ok((kustomizations, regular))
}

/// Decide from the declared kinds whether a file is a kustomization
///
/// Unreadable files fall back to the file name; the later read reports the
/// actual error.
fn is_kustomization(path: &Path, named_kustomization: bool) -> bool {
    let kinds = match std::fs::read_to_string(path)
        .ok()
        .and_then(|content| document_kinds(&content).ok())
    {
        Some(kinds) => kinds,
        None => return named_kustomization,
    };

    let all_kustomizations =
        !kinds.is_empty() && kinds.iter().all(|kind| kind.as_deref() == Some(KUSTOMIZATION_KIND));
    let other_kind = kinds
        .iter()
        .any(|kind| kind.as_deref().is_some_and(|kind| kind != KUSTOMIZATION_KIND));

    if named_kustomization && other_kind {
        tracing::warn!(
            path = %path.display(),
            "file has a kustomization name but holds other kinds, loading it as a manifest"
        );
    }

    all_kustomizations || (named_kustomization && !other_kind)
}

/// The `kind` of every document in a YAML stream or JSON array
fn document_kinds(content: &str) -> std::result::Result<Vec<Option<String>>, serde_yaml::Error> {
    let mut kinds = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let items = match serde_yaml::Value::deserialize(document)? {
            serde_yaml::Value::Null => continue,
            serde_yaml::Value::Sequence(items) => items,
            other => vec![other],
        };
        kinds.extend(items.iter().map(|item| {
            item.get("kind")
                .and_then(serde_yaml::Value::as_str)
                .map(str::to_string)
        }));
    }
    Ok(kinds)
}

fn has_manifest_extension(file_name: &str) -> bool {
    [".yaml", ".yml", ".json"]
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

fn format_of(path: &Path) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Yaml,
    }
}

/// Read a kustomization and resolve its resources against its directory
fn read_kustomization(path: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path)?;
    let parse_error = |message: String| SynthError::Parse {
        path: path.display().to_string(),
        message,
    };

    // JSON output wraps the kustomization in an array; YAML reads JSON too
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
    let documents = match value {
        serde_yaml::Value::Sequence(items) => items,
        other => vec![other],
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut resolved = Vec::new();

    for document in documents {
        let kustomization: KustomizationFile =
            serde_yaml::from_value(document).map_err(|e| parse_error(e.to_string()))?;

        for resource in kustomization.resources {
            let resource_path = base.join(&resource);
            if !resource_path.is_file() {
                return Err(SynthError::MissingManifest {
                    kustomization: path.display().to_string(),
                    path: resource,
                });
            }
            resolved.push(resource_path);
        }
    }

    tracing::debug!(
        path = %path.display(),
        resources = resolved.len(),
        "read kustomization"
    );
    Ok(resolved)
}

fn load_manifest(path: &Path) -> Result<LoadedManifest> {
    let content = std::fs::read_to_string(path)?;
    let objects = parse_documents(&content, format_of(path)).map_err(|e| SynthError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let chart = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(OutputFormat::detect)
        .map(|(_, chart)| chart.to_string());

    Ok(LoadedManifest {
        path: path.to_path_buf(),
        chart,
        objects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::Synthesizer;
    use chartkit_core::{Aggregation, ApiObjectProps, App, Chart, ChartProps};
    use std::fs;
    use tempfile::TempDir;

    fn config_map(namespace: &str, name: &str) -> String {
        format!(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: {}\n  namespace: {}\n",
            name, namespace
        )
    }

    fn app() -> App {
        let mut app = App::new();
        for (chart_name, objects) in [("nginx", vec!["web"]), ("headlamp", vec!["ui", "ui-config"])] {
            let mut chart =
                Chart::new(chart_name, ChartProps::default().namespace("default")).unwrap();
            for name in objects {
                chart
                    .add(name, ApiObjectProps::new("v1", "ConfigMap").name(name))
                    .unwrap();
            }
            app.add_chart(chart).unwrap();
        }
        app.add_aggregation(
            Aggregation::new("kustomization")
                .unwrap()
                .namespace("default")
                .reference("headlamp")
                .reference("nginx"),
        )
        .unwrap();
        app
    }

    #[test]
    fn test_load_follows_kustomization_order() {
        let tmp = TempDir::new().unwrap();
        let app = app();
        Synthesizer::builder()
            .outdir(tmp.path())
            .build()
            .synth(&app)
            .unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert!(loaded.is_aggregated());

        let charts: Vec<_> = loaded
            .manifests
            .iter()
            .map(|m| m.chart.as_deref().unwrap())
            .collect();
        assert_eq!(charts, vec!["headlamp", "nginx"]);

        let names: Vec<_> = loaded.objects().map(|o| o.name()).collect();
        assert_eq!(names, vec!["ui", "ui-config", "web"]);
    }

    #[test]
    fn test_loaded_objects_equal_built_objects() {
        let tmp = TempDir::new().unwrap();
        let app = app();
        Synthesizer::builder()
            .outdir(tmp.path())
            .build()
            .synth(&app)
            .unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        let nginx = app.chart("nginx").unwrap();
        let loaded_nginx = loaded
            .manifests
            .iter()
            .find(|m| m.chart.as_deref() == Some("nginx"))
            .unwrap();
        let built: Vec<_> = nginx.objects().cloned().collect();
        assert_eq!(loaded_nginx.objects, built);
    }

    #[test]
    fn test_load_json_output() {
        let tmp = TempDir::new().unwrap();
        Synthesizer::builder()
            .outdir(tmp.path())
            .format(OutputFormat::Json)
            .build()
            .synth(&app())
            .unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert!(loaded.is_aggregated());
        assert_eq!(loaded.objects().count(), 3);
    }

    #[test]
    fn test_load_without_kustomization_sorts_by_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.yaml"), config_map("default", "b")).unwrap();
        fs::write(tmp.path().join("a.yml"), config_map("default", "a")).unwrap();
        fs::write(tmp.path().join("README.md"), "# not a manifest").unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert!(!loaded.is_aggregated());

        let names: Vec<_> = loaded.objects().map(|o| o.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(loaded.manifests.iter().all(|m| m.chart.is_none()));
    }

    #[test]
    fn test_kustomization_resolves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let overlay = tmp.path().join("overlay");
        fs::create_dir(&overlay).unwrap();
        fs::write(tmp.path().join("base.yaml"), config_map("default", "base")).unwrap();
        fs::write(
            overlay.join("kustomization.yaml"),
            "resources:\n- ../base.yaml\n",
        )
        .unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert_eq!(loaded.kustomizations, vec![overlay.join("kustomization.yaml")]);
        assert_eq!(loaded.objects().next().unwrap().name(), "base");
    }

    #[test]
    fn test_kustomization_with_no_resources() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("kustomization.yaml"), "resources: []\n").unwrap();
        fs::write(tmp.path().join("ignored.yaml"), config_map("default", "x")).unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert!(loaded.is_aggregated());
        assert_eq!(loaded.objects().count(), 0);
    }

    #[test]
    fn test_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("kustomization.yaml"),
            "resources:\n- gone.k8s.yaml\n",
        )
        .unwrap();

        let err = load_output(tmp.path()).unwrap_err();
        match err {
            SynthError::MissingManifest { path, .. } => assert_eq!(path, "gone.k8s.yaml"),
            other => panic!("expected missing manifest, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_manifest_names_the_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.yaml"), "kind: [unclosed\n").unwrap();

        let err = load_output(tmp.path()).unwrap_err();
        match err {
            SynthError::Parse { path, .. } => assert!(path.ends_with("broken.yaml")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregation_with_custom_name_is_followed() {
        let tmp = TempDir::new().unwrap();
        let mut app = App::new();
        let mut web = Chart::new("web", ChartProps::default().namespace("default")).unwrap();
        web.add("cm", ApiObjectProps::new("v1", "ConfigMap").name("web"))
            .unwrap();
        app.add_chart(web).unwrap();
        app.add_aggregation(
            Aggregation::new("bundle")
                .unwrap()
                .namespace("default")
                .reference("web"),
        )
        .unwrap();
        Synthesizer::builder()
            .outdir(tmp.path())
            .build()
            .synth(&app)
            .unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert_eq!(loaded.kustomizations, vec![tmp.path().join("bundle.k8s.yaml")]);
        let names: Vec<_> = loaded.objects().map(|o| o.name()).collect();
        assert_eq!(names, vec!["web"]);
    }

    #[test]
    fn test_kustomization_name_with_other_kinds_is_a_manifest() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("kustomization.k8s.yaml"),
            config_map("default", "kustomization"),
        )
        .unwrap();
        fs::write(tmp.path().join("web.k8s.yaml"), config_map("default", "web")).unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert!(!loaded.is_aggregated());
        let names: Vec<_> = loaded.objects().map(|o| o.name()).collect();
        assert_eq!(names, vec!["kustomization", "web"]);
    }

    #[test]
    fn test_file_listed_twice_loads_once() {
        let tmp = TempDir::new().unwrap();
        let overlay = tmp.path().join("overlay");
        fs::create_dir(&overlay).unwrap();
        fs::write(tmp.path().join("base.yaml"), config_map("default", "base")).unwrap();
        fs::write(tmp.path().join("extra.yaml"), config_map("default", "extra")).unwrap();
        fs::write(
            tmp.path().join("kustomization.yaml"),
            "resources:\n- base.yaml\n- extra.yaml\n",
        )
        .unwrap();
        fs::write(
            overlay.join("kustomization.yaml"),
            "resources:\n- ../base.yaml\n",
        )
        .unwrap();

        let loaded = load_output(tmp.path()).unwrap();
        assert_eq!(loaded.kustomizations.len(), 2);
        let names: Vec<_> = loaded.objects().map(|o| o.name()).collect();
        assert_eq!(names, vec!["base", "extra"]);
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = load_output(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, SynthError::OutputNotFound { .. }));
    }
}
