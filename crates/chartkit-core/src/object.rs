//! Kubernetes API objects
//!
//! [`ApiObjectProps`] is the plain input record a caller fills in, either by
//! hand or by lowering a typed `k8s-openapi` value with
//! [`ApiObjectProps::from_typed`]. [`ApiObject`] is the validated, immutable
//! form that charts own and the synthesizer writes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};

/// Top-level keys owned by the object envelope
const RESERVED_KEYS: &[&str] = &["apiVersion", "kind", "metadata"];

/// Object metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Object name (required)
    #[serde(default)]
    pub name: String,

    /// Namespace, filled from the chart default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Other metadata keys (`finalizers`, `generateName`, `creationTimestamp`, ...), kept as given
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// Unvalidated description of an API object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiObjectProps {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMetadata,

    /// Kind-specific top-level fields (`spec`, `type`, `data`, `resources`, ...)
    #[serde(flatten)]
    pub payload: BTreeMap<String, JsonValue>,
}

impl ApiObjectProps {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Lower a typed Kubernetes object into props
    ///
    /// `apiVersion` and `kind` come from the type itself, so a typed call site
    /// can never misspell them.
    pub fn from_typed<K>(object: &K) -> Result<Self>
    where
        K: k8s_openapi::Resource + Serialize,
    {
        let mut props: ApiObjectProps = serde_json::from_value(serde_json::to_value(object)?)?;
        props.api_version = K::API_VERSION.to_string();
        props.kind = K::KIND.to_string();
        // Status is owned by the cluster, never by a manifest
        props.payload.remove("status");
        Ok(props)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
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

    pub fn annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.annotations.insert(key.into(), value.into());
        self
    }

    /// Set a top-level payload field
    pub fn field(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

/// Identity of an object within a synthesized set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceIdentity {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// A validated Kubernetes object
///
/// Construction always goes through [`ApiObject::new`]; deserialization is
/// routed through the same checks, with no default namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ApiObjectProps")]
pub struct ApiObject {
    api_version: String,
    kind: String,
    metadata: ObjectMetadata,
    #[serde(flatten)]
    payload: BTreeMap<String, JsonValue>,
}

impl ApiObject {
    /// Validate props into an object
    ///
    /// Fails when `apiVersion`, `kind` or `metadata.name` is empty, when the
    /// payload shadows an envelope key, or when neither the props nor
    /// `default_namespace` provide a namespace.
    pub fn new(props: ApiObjectProps, default_namespace: Option<&str>) -> Result<Self> {
        let ApiObjectProps {
            api_version,
            kind,
            mut metadata,
            payload,
        } = props;

        let resource = describe(&kind, &metadata.name);
        let invalid = |message: String| CoreError::Validation {
            resource: resource.clone(),
            message,
        };

        if api_version.trim().is_empty() {
            return Err(invalid("apiVersion is empty".to_string()));
        }
        if kind.trim().is_empty() {
            return Err(invalid("kind is empty".to_string()));
        }
        if metadata.name.trim().is_empty() {
            return Err(invalid("metadata.name is empty".to_string()));
        }
        if let Some(key) = payload.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(invalid(format!("payload field '{}' shadows the object envelope", key)));
        }

        let namespace = match metadata.namespace.take() {
            Some(ns) if ns.trim().is_empty() => {
                return Err(invalid("metadata.namespace is empty".to_string()));
            }
            Some(ns) => ns,
            None => match default_namespace {
                Some(ns) if !ns.trim().is_empty() => ns.to_string(),
                _ => {
                    return Err(invalid(
                        "metadata.namespace is not set and no default namespace is configured"
                            .to_string(),
                    ));
                }
            },
        };
        metadata.namespace = Some(namespace);

        Ok(Self {
            api_version,
            kind,
            metadata,
            payload,
        })
    }

    /// Shorthand for building from a typed Kubernetes object
    pub fn from_typed<K>(object: &K, default_namespace: Option<&str>) -> Result<Self>
    where
        K: k8s_openapi::Resource + Serialize,
    {
        Self::new(ApiObjectProps::from_typed(object)?, default_namespace)
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace of the object (always set after validation)
    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.metadata.labels
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.metadata.annotations
    }

    pub fn payload(&self) -> &BTreeMap<String, JsonValue> {
        &self.payload
    }

    /// Get a top-level payload field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.payload.get(key)
    }

    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity {
            kind: self.kind.clone(),
            namespace: self.namespace().to_string(),
            name: self.metadata.name.clone(),
        }
    }
}

impl TryFrom<ApiObjectProps> for ApiObject {
    type Error = CoreError;

    fn try_from(props: ApiObjectProps) -> Result<Self> {
        Self::new(props, None)
    }
}

impl From<ApiObject> for ApiObjectProps {
    fn from(object: ApiObject) -> Self {
        Self {
            api_version: object.api_version,
            kind: object.kind,
            metadata: object.metadata,
            payload: object.payload,
        }
    }
}

impl fmt::Display for ApiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity())
    }
}

fn describe(kind: &str, name: &str) -> String {
    match (kind.is_empty(), name.is_empty()) {
        (false, false) => format!("{} '{}'", kind, name),
        (false, true) => format!("unnamed {}", kind),
        (true, false) => format!("'{}'", name),
        (true, true) => "unnamed object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::Secret;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use serde_json::json;

    fn config_map() -> ApiObjectProps {
        ApiObjectProps::new("v1", "ConfigMap")
            .name("settings")
            .field("data", json!({"mode": "fast"}))
    }

    #[test]
    fn test_new_with_explicit_namespace() {
        let obj = ApiObject::new(config_map().namespace("apps"), None).unwrap();
        assert_eq!(obj.api_version(), "v1");
        assert_eq!(obj.kind(), "ConfigMap");
        assert_eq!(obj.name(), "settings");
        assert_eq!(obj.namespace(), "apps");
        assert_eq!(obj.get("data"), Some(&json!({"mode": "fast"})));
    }

    #[test]
    fn test_default_namespace_applies_only_when_absent() {
        let defaulted = ApiObject::new(config_map(), Some("default")).unwrap();
        assert_eq!(defaulted.namespace(), "default");

        let explicit = ApiObject::new(config_map().namespace("apps"), Some("default")).unwrap();
        assert_eq!(explicit.namespace(), "apps");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = ApiObject::new(config_map().name(""), Some("default")).unwrap_err();
        match err {
            CoreError::Validation { resource, message } => {
                assert_eq!(resource, "unnamed ConfigMap");
                assert!(message.contains("metadata.name"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_api_version_and_kind_are_rejected() {
        let props = ApiObjectProps::new("", "ConfigMap").name("x");
        assert!(matches!(
            ApiObject::new(props, Some("default")),
            Err(CoreError::Validation { .. })
        ));

        let props = ApiObjectProps::new("v1", " ").name("x");
        assert!(matches!(
            ApiObject::new(props, Some("default")),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn test_missing_namespace_without_default_is_rejected() {
        let err = ApiObject::new(config_map(), None).unwrap_err();
        assert!(err.to_string().contains("no default namespace"));
        assert!(err.to_string().contains("ConfigMap 'settings'"));

        let err = ApiObject::new(config_map().namespace(""), Some("default")).unwrap_err();
        assert!(err.to_string().contains("metadata.namespace is empty"));
    }

    #[test]
    fn test_reserved_payload_key_is_rejected() {
        let props = config_map().field("kind", json!("Secret"));
        let err = ApiObject::new(props, Some("default")).unwrap_err();
        assert!(err.to_string().contains("'kind'"));
    }

    #[test]
    fn test_round_trip_through_yaml() {
        let obj = ApiObject::new(
            config_map()
                .namespace("apps")
                .label("app", "web")
                .annotation("note", "kept"),
            None,
        )
        .unwrap();

        let yaml = serde_yaml::to_string(&obj).unwrap();
        let parsed: ApiObject = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, obj);
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let yaml = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n";
        let err = serde_yaml::from_str::<ApiObject>(yaml).unwrap_err();
        assert!(err.to_string().contains("no default namespace"));
    }

    #[test]
    fn test_serialized_envelope_order() {
        let obj = ApiObject::new(config_map().namespace("apps"), None).unwrap();
        let yaml = serde_yaml::to_string(&obj).unwrap();
        let api_version = yaml.find("apiVersion").unwrap();
        let kind = yaml.find("kind").unwrap();
        let metadata = yaml.find("metadata").unwrap();
        let data = yaml.find("\ndata:").unwrap();
        assert!(api_version < kind && kind < metadata && metadata < data);
    }

    #[test]
    fn test_from_typed_deployment() {
        let deployment = Deployment {
            metadata: ObjectMeta {
                name: Some("web".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let obj = ApiObject::from_typed(&deployment, Some("default")).unwrap();
        assert_eq!(obj.api_version(), "apps/v1");
        assert_eq!(obj.kind(), "Deployment");
        assert_eq!(obj.namespace(), "default");
        assert!(obj.get("status").is_none());
    }

    #[test]
    fn test_from_typed_secret_keeps_type() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("admin".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            type_: Some("kubernetes.io/service-account-token".to_string()),
            ..Default::default()
        };

        let obj = ApiObject::from_typed(&secret, None).unwrap();
        assert_eq!(obj.kind(), "Secret");
        assert_eq!(obj.get("type"), Some(&json!("kubernetes.io/service-account-token")));
    }

    #[test]
    fn test_from_typed_without_name_fails() {
        let deployment = Deployment::default();
        let err = ApiObject::from_typed(&deployment, Some("default")).unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[test]
    fn test_from_typed_keeps_other_metadata() {
        let deployment = Deployment {
            metadata: ObjectMeta {
                name: Some("web".to_string()),
                finalizers: Some(vec!["example.com/cleanup".to_string()]),
                generate_name: Some("web-".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let obj = ApiObject::from_typed(&deployment, Some("default")).unwrap();
        assert_eq!(
            obj.metadata().extra.get("finalizers"),
            Some(&json!(["example.com/cleanup"]))
        );
        assert_eq!(obj.metadata().extra.get("generateName"), Some(&json!("web-")));
    }

    #[test]
    fn test_unknown_metadata_round_trips() {
        let yaml = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  creationTimestamp: null\n  name: settings\n  namespace: apps\n";
        let obj: ApiObject = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(obj.name(), "settings");
        assert_eq!(
            obj.metadata().extra.get("creationTimestamp"),
            Some(&JsonValue::Null)
        );

        let rendered = serde_yaml::to_string(&obj).unwrap();
        assert!(rendered.contains("creationTimestamp: null"));
        let parsed: ApiObject = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed, obj);
    }

    #[test]
    fn test_identity_display() {
        let obj = ApiObject::new(config_map(), Some("default")).unwrap();
        assert_eq!(obj.identity().to_string(), "ConfigMap default/settings");
    }
}
