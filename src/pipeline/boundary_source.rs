use metrics::counter;
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::app::ports::HttpClientPort;
use crate::constants::RESPONSE_DATA_KEY;
use crate::error::{AliasError, Result};
use crate::infra::fs_store::write_atomic;
use crate::infra::http_client::redact_token;
use crate::types::Context;

/// A cache counts as usable only if it can be opened for both reading and
/// writing. Opening for write does not truncate.
pub async fn cache_is_usable(path: &Path) -> bool {
    tokio::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .await
        .is_ok()
}

/// Returns a context pointing at the local boundary copy, fetching it first
/// when the cache is missing or `refresh` is set.
#[instrument(skip(http, endpoint), fields(cache = %cache_path.display()))]
pub async fn obtain(
    http: &dyn HttpClientPort,
    endpoint: &str,
    cache_path: &Path,
    refresh: bool,
) -> Result<Context> {
    if !refresh && cache_is_usable(cache_path).await {
        info!("Using cached boundaries at {}", cache_path.display());
        return Ok(Context::new(cache_path));
    }

    fetch_to_cache(http, endpoint, cache_path).await?;
    info!("Copied boundaries from {}", redact_token(endpoint));
    Ok(Context::new(cache_path))
}

/// GETs the endpoint, unwraps its `data` member and writes it compactly.
/// The cache is replaced by rename, so a failed run leaves the old one intact.
pub async fn fetch_to_cache(
    http: &dyn HttpClientPort,
    endpoint: &str,
    cache_path: &Path,
) -> Result<()> {
    counter!("boundary_fetches_total").increment(1);
    let resp = http.get(endpoint).await.map_err(AliasError::Network)?;
    if !resp.is_success() {
        return Err(AliasError::Network(format!(
            "boundary endpoint returned status {}",
            resp.status
        )));
    }

    let mut body: Value = serde_json::from_slice(&resp.bytes).map_err(|e| {
        warn!("Boundary response ({}) is not JSON", resp.content_type);
        e
    })?;
    let data = body
        .get_mut(RESPONSE_DATA_KEY)
        .map(Value::take)
        .ok_or_else(|| AliasError::MissingField(RESPONSE_DATA_KEY.to_string()))?;

    write_atomic(cache_path, serde_json::to_vec(&data)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_cache_is_not_usable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.geojson");
        assert!(!cache_is_usable(&path).await);
        fs::write(&path, "{}").unwrap();
        assert!(cache_is_usable(&path).await);
        // probing must not truncate
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
