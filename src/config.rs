use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{AliasError, Result};

/// Settings for one alias run. Every field has a default so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub boundary_url: String,
    pub boundary_token: Option<String>,
    pub cache_path: PathBuf,
    pub output_path: PathBuf,
    pub source_paths: Vec<PathBuf>,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boundary_url: constants::DEFAULT_BOUNDARY_URL.to_string(),
            boundary_token: None,
            cache_path: PathBuf::from(constants::DEFAULT_CACHE_PATH),
            output_path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            source_paths: constants::default_source_paths()
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Loads `path` if given, otherwise `aliases.toml` when it exists,
    /// otherwise the defaults. The token env var wins over the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(token) = std::env::var(constants::TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                config.boundary_token = Some(token);
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AliasError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Boundary URL with the access token attached, if one is configured.
    pub fn endpoint(&self) -> String {
        match self.boundary_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {
                let sep = if self.boundary_url.contains('?') { '&' } else { '?' };
                format!("{}{}token={}", self.boundary_url, sep, token)
            }
            _ => self.boundary_url.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.boundary_url.trim().is_empty() {
            return Err(AliasError::Config("boundary_url is empty".to_string()));
        }
        if self.cache_path.as_os_str().is_empty() {
            return Err(AliasError::Config("cache_path is empty".to_string()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(AliasError::Config("output_path is empty".to_string()));
        }
        if self.source_paths.is_empty() {
            return Err(AliasError::Config(
                "at least one source path is required".to_string(),
            ));
        }
        if let Some(p) = self.source_paths.iter().find(|p| p.as_os_str().is_empty()) {
            return Err(AliasError::Config(format!("empty source path: {:?}", p)));
        }
        Ok(())
    }
}
