use tracing::info;

use crate::error::{AliasError, Result};
use crate::geojson::NamedCollection;
use crate::types::{Context, Neighborhood};

/// Reads `properties.name` of every feature in the cached collection, in
/// feature order, into alias-less neighborhood records.
pub async fn extract(mut ctx: Context) -> Result<Context> {
    let bytes = tokio::fs::read(&ctx.local_path).await?;
    let collection: NamedCollection = serde_json::from_slice(&bytes)?;

    let mut neighborhoods = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.into_iter().enumerate() {
        match feature.properties.name {
            Some(serde_json::Value::String(name)) => neighborhoods.push(Neighborhood::new(name)),
            _ => {
                return Err(AliasError::MissingField(format!(
                    "features[{}].properties.name",
                    i
                )))
            }
        }
    }

    info!("Grabbed {} neighborhood names", neighborhoods.len());
    ctx.neighborhoods = neighborhoods;
    Ok(ctx)
}
