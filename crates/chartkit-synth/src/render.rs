//! Document rendering and parsing
//!
//! A YAML document is a stream of objects separated by `---` lines. A JSON
//! document is a pretty-printed array. Both end with a newline.

use chartkit_core::{ApiObject, OutputFormat};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Render objects into one document
pub fn render_objects<'a, I>(objects: I, format: OutputFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a ApiObject>,
{
    match format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            for (i, object) in objects.into_iter().enumerate() {
                if i > 0 {
                    out.push_str("---\n");
                }
                out.push_str(&serde_yaml::to_string(object)?);
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let objects: Vec<&ApiObject> = objects.into_iter().collect();
            let mut out = serde_json::to_string_pretty(&objects)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Parse a document back into objects
///
/// Empty YAML documents are skipped. A JSON document may be an array or a
/// single object.
pub fn parse_documents(content: &str, format: OutputFormat) -> Result<Vec<ApiObject>> {
    match format {
        OutputFormat::Yaml => {
            let mut objects = Vec::new();
            for document in serde_yaml::Deserializer::from_str(content) {
                let value = serde_yaml::Value::deserialize(document)?;
                if value.is_null() {
                    continue;
                }
                objects.push(serde_yaml::from_value(value)?);
            }
            Ok(objects)
        }
        OutputFormat::Json => match serde_json::from_str::<JsonValue>(content)? {
            JsonValue::Array(items) => items
                .into_iter()
                .map(|item| Ok(serde_json::from_value(item)?))
                .collect(),
            other => Ok(vec![serde_json::from_value(other)?]),
        },
    }
}
