use std::path::PathBuf;

/// A canonical boundary name and the free-text label resolved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    pub name: String,
    pub alias: Option<String>,
}

impl Neighborhood {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// Sets the alias unless one is already present. Returns whether it was set.
    pub fn assign_alias(&mut self, alias: &str) -> bool {
        if self.has_alias() {
            return false;
        }
        self.alias = Some(alias.to_string());
        true
    }
}

/// State threaded through one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub local_path: PathBuf,
    pub neighborhoods: Vec<Neighborhood>,
    pub final_path: Option<PathBuf>,
}

impl Context {
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            ..Self::default()
        }
    }

    pub fn aliased_count(&self) -> usize {
        self.neighborhoods.iter().filter(|n| n.has_alias()).count()
    }
}
