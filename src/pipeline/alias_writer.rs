use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::{AliasError, Result};
use crate::geojson::{feature_name, features_mut, set_alias};
use crate::infra::fs_store::write_atomic;
use crate::types::Context;

/// Re-reads the cached collection, adds `properties.alias` to every feature
/// and writes the result compactly to `final_path`. Nothing else in the
/// document changes, member order included.
#[instrument(skip(ctx), fields(final_path = %final_path.display()))]
pub async fn write(final_path: &Path, mut ctx: Context) -> Result<Context> {
    let bytes = tokio::fs::read(&ctx.local_path).await?;
    let mut doc: Value = serde_json::from_slice(&bytes)?;

    apply_aliases(&mut doc, &ctx)?;
    write_atomic(final_path, serde_json::to_vec(&doc)?).await?;

    info!("Aliases written to {}", final_path.display());
    ctx.final_path = Some(final_path.to_path_buf());
    Ok(ctx)
}

/// Copies each neighborhood's alias onto the feature with the same name.
/// A feature with no neighborhood record is an error, not a skip.
pub fn apply_aliases(doc: &mut Value, ctx: &Context) -> Result<()> {
    let mut by_name: HashMap<&str, Option<&str>> = HashMap::with_capacity(ctx.neighborhoods.len());
    for n in &ctx.neighborhoods {
        by_name.entry(n.name.as_str()).or_insert(n.alias.as_deref());
    }

    for feature in features_mut(doc)? {
        let name = feature_name(feature).unwrap_or_default().to_string();
        let alias = by_name
            .get(name.as_str())
            .ok_or_else(|| AliasError::UnmatchedFeature(name.clone()))?;
        set_alias(feature, *alias)?;
    }
    Ok(())
}
