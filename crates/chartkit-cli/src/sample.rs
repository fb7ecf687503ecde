//! Built-in sample application
//!
//! Two application charts (nginx and headlamp) and a kustomization listing
//! their output files, headlamp first.

use std::collections::BTreeMap;

use chartkit_core::{Aggregation, ApiObjectProps, App, Chart, ChartProps, Result};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, EnvVar, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use serde_json::json;

pub const NAMESPACE: &str = "default";

pub const NGINX_CHART: &str = "nginx-deployment";
pub const HEADLAMP_CHART: &str = "headlamp-deployment";
pub const KUSTOMIZATION: &str = "kustomization";

fn app_labels(app: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), app.to_string())])
}

/// A Deployment whose selector and pod template share `labels`
fn deployment(name: &str, labels: BTreeMap<String, String>, container: Container) -> Deployment {
    Deployment {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(NAMESPACE.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(3),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn port(container_port: i32, name: Option<&str>) -> ContainerPort {
    ContainerPort {
        container_port,
        name: name.map(str::to_string),
        ..Default::default()
    }
}

fn env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

/// A single nginx Deployment
pub fn nginx_chart() -> Result<Chart> {
    let mut chart = Chart::new(NGINX_CHART, ChartProps::default().namespace(NAMESPACE))?;

    let container = Container {
        name: "nginx".to_string(),
        image: Some("nginx:latest".to_string()),
        ports: Some(vec![port(80, None)]),
        ..Default::default()
    };
    chart.add_typed(
        NGINX_CHART,
        &deployment(NGINX_CHART, app_labels("nginx"), container),
    )?;

    Ok(chart)
}

/// Headlamp Deployment, its Service and the admin token Secret
pub fn headlamp_chart() -> Result<Chart> {
    let mut chart = Chart::new(HEADLAMP_CHART, ChartProps::default().namespace(NAMESPACE))?;
    let labels = app_labels("headlamp");

    let container = Container {
        name: "headlamp".to_string(),
        image: Some("ghcr.io/headlamp-k8s/headlamp:latest".to_string()),
        args: Some(vec![
            "-in-cluster".to_string(),
            "-plugins-dir=/headlamp/plugins".to_string(),
        ]),
        env: Some(vec![
            env("HEADLAMP_CONFIG_TRACING_ENABLED", "true"),
            env("HEADLAMP_CONFIG_METRICS_ENABLED", "true"),
            env("HEADLAMP_CONFIG_OTLP_ENDPOINT", "otel-collector:4317"),
            env("HEADLAMP_CONFIG_SERVICE_NAME", "headlamp"),
            env("HEADLAMP_CONFIG_SERVICE_VERSION", "latest"),
        ]),
        ports: Some(vec![port(4466, Some("http")), port(9090, Some("metrics"))]),
        ..Default::default()
    };
    chart.add_typed(
        HEADLAMP_CHART,
        &deployment(HEADLAMP_CHART, labels.clone(), container),
    )?;

    chart.add(
        "headlamp-service",
        ApiObjectProps::new("v1", "Service")
            .name("headlamp-service")
            .field(
                "spec",
                json!({
                    "selector": labels,
                    "ports": [{"port": 80, "targetPort": 4466}],
                }),
            ),
    )?;

    chart.add(
        "headlamp-secret",
        ApiObjectProps::new("v1", "Secret")
            .name("headlamp-admin")
            .annotation("kubernetes.io/service-account.name", "headlamp-admin")
            .field("type", json!("kubernetes.io/service-account-token")),
    )?;

    Ok(chart)
}

/// Kustomization over both application charts
pub fn kustomization() -> Result<Aggregation> {
    Ok(Aggregation::new(KUSTOMIZATION)?
        .namespace(NAMESPACE)
        .reference(HEADLAMP_CHART)
        .reference(NGINX_CHART))
}

/// The whole sample application
pub fn build_app() -> Result<App> {
    let mut app = App::new();
    app.add_chart(nginx_chart()?)?;
    app.add_chart(headlamp_chart()?)?;
    app.add_aggregation(kustomization()?)?;
    Ok(app)
}
