//! Just enough of GeoJSON to read feature names and add aliases while leaving
//! every other member, and member order, as it was.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AliasError, Result};

/// Mutable access to the `features` array of a collection document.
pub fn features_mut(doc: &mut Value) -> Result<&mut Vec<Value>> {
    doc.get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| AliasError::MissingField("features".to_string()))
}

pub fn feature_name(feature: &Value) -> Option<&str> {
    feature.get("properties")?.get("name")?.as_str()
}

/// Sets or clears `properties.alias`. A new key is appended after the
/// existing properties; an existing one keeps its position.
pub fn set_alias(feature: &mut Value, alias: Option<&str>) -> Result<()> {
    let properties = feature
        .get_mut("properties")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| AliasError::MissingField("properties".to_string()))?;
    match alias {
        Some(a) => {
            properties.insert("alias".to_string(), Value::String(a.to_string()));
        }
        None => {
            // shift_remove keeps the order of the remaining keys
            properties.shift_remove("alias");
        }
    }
    Ok(())
}

/// Name-only view used when extracting canonical names, so geometry is
/// skipped instead of materialized.
#[derive(Debug, Deserialize)]
pub(crate) struct NamedCollection {
    pub features: Vec<NamedFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedFeature {
    #[serde(default)]
    pub properties: NamedProperties,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NamedProperties {
    #[serde(default)]
    pub name: Option<Value>,
}
