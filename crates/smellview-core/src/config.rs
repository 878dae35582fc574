//! Configuration loading for smellview

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CountPolicy;

pub const CONFIG_FILENAME: &str = ".smellviewrc.json";

/// Analysis service the upload client talks to when nothing is configured.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Contents of `.smellviewrc.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub count_policy: Option<CountPolicy>,
    pub show_source: Option<bool>,
    /// Base URL of the analysis service.
    pub server: Option<String>,
}

impl Config {
    pub fn count_policy(&self) -> CountPolicy {
        self.count_policy.unwrap_or_default()
    }

    pub fn show_source(&self) -> bool {
        self.show_source.unwrap_or(false)
    }

    pub fn server(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }
}

/// Find and load the config file. Searches `work_dir` then its parents.
///
/// A missing file yields the defaults; an explicit `custom_path` must exist.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = match custom_path {
        Some(p) => {
            let path = if p.is_absolute() {
                p.to_path_buf()
            } else {
                work_dir.join(p)
            };
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path)
        }
        None => find_config_in_parents(work_dir),
    };

    match path {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", path.display()))
}

fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
