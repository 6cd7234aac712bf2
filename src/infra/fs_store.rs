use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Sibling path the bytes are staged in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` next to `path` and renames into place, so a reader never
/// sees a half-written file. Creates the parent directory when missing.
pub async fn write_atomic(path: &Path, bytes: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp = staging_path(path);
    if let Err(e) = tokio::fs::write(&tmp, bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("neighborhoods/boundaries.geojson")),
            PathBuf::from("neighborhoods/boundaries.geojson.tmp")
        );
    }

    #[tokio::test]
    async fn replaces_existing_file_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out.geojson");

        write_atomic(&path, b"first, and longer".to_vec()).await.unwrap();
        write_atomic(&path, b"second".to_vec()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("out.geojson")]);
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boundaries.geojson");
        std::fs::write(&path, "{\"type\":\"FeatureCollection\",\"features\":[]}").unwrap();
        // a directory squatting on the staging path makes the write fail
        std::fs::create_dir(staging_path(&path)).unwrap();

        assert!(write_atomic(&path, b"{\"trunc".to_vec()).await.is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"type\":\"FeatureCollection\",\"features\":[]}"
        );
    }
}
