//! User configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.npmspec/
//!   config.yaml      (optional; every key has a default)
//!   templates/       (optional *.tera overrides)
//! ~/.npm/registry.npmjs.org/
//!   <package>/.cache.json
//! ```
//!
//! As elsewhere in the workspace, `load_at(home)` takes an explicit home so
//! tests can point it at a `TempDir`; `load()` derives it from
//! `dirs::home_dir()`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const DEFAULT_OBS_API: &str = "https://build.opensuse.org";
pub const DEFAULT_OBS_PROJECT: &str = "devel:languages:nodejs";
pub const DEFAULT_OBS_REPOSITORY: &str = "Tumbleweed";
pub const DEFAULT_OBS_ARCH: &str = "x86_64";
const FALLBACK_AUTHOR: &str = "unknown@localhost";

/// Settings read from `~/.npmspec/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry_url: String,
    /// Registry cache root; `None` means `~/.npm/registry.npmjs.org`.
    pub cache_dir: Option<PathBuf>,
    pub obs_api: String,
    pub obs_project: String,
    pub obs_repository: String,
    pub obs_arch: String,
    /// Change-log author; `None` falls back to `$EMAIL`.
    pub author: Option<String>,
    /// Template overrides; `None` means `~/.npmspec/templates`.
    pub templates_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            cache_dir: None,
            obs_api: DEFAULT_OBS_API.to_string(),
            obs_project: DEFAULT_OBS_PROJECT.to_string(),
            obs_repository: DEFAULT_OBS_REPOSITORY.to_string(),
            obs_arch: DEFAULT_OBS_ARCH.to_string(),
            author: None,
            templates_dir: None,
        }
    }
}

impl Config {
    /// Cache root, resolved against `home`.
    pub fn cache_root(&self, home: &Path) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| home.join(".npm").join("registry.npmjs.org"))
    }

    /// Template override directory, resolved against `home`.
    pub fn templates_root(&self, home: &Path) -> PathBuf {
        self.templates_dir
            .clone()
            .unwrap_or_else(|| config_root(home).join("templates"))
    }

    /// Author for change-log entries: config, then `$EMAIL`, then a
    /// placeholder.
    pub fn resolved_author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("EMAIL").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| FALLBACK_AUTHOR.to_string())
    }
}

/// `<home>/.npmspec`
pub fn config_root(home: &Path) -> PathBuf {
    home.join(".npmspec")
}

/// `<home>/.npmspec/config.yaml`
pub fn config_path_at(home: &Path) -> PathBuf {
    config_root(home).join("config.yaml")
}

/// Load the config under `home`; a missing file yields defaults.
pub fn load_at(home: &Path) -> Result<Config, CoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CoreError::ConfigParse { path, source })
}

/// [`load_at`] convenience wrapper rooted at the user's home directory.
pub fn load() -> Result<Config, CoreError> {
    load_at(&home()?)
}

pub fn home() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let home = TempDir::new().unwrap();
        let config = load_at(home.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.cache_root(home.path()),
            home.path().join(".npm").join("registry.npmjs.org")
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(config_root(home.path())).unwrap();
        std::fs::write(
            config_path_at(home.path()),
            "author: someone@example.org\nobs_repository: openSUSE_Factory\n",
        )
        .unwrap();

        let config = load_at(home.path()).unwrap();
        assert_eq!(config.author.as_deref(), Some("someone@example.org"));
        assert_eq!(config.obs_repository, "openSUSE_Factory");
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.resolved_author(), "someone@example.org");
    }

    #[test]
    fn corrupt_file_reports_path() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(config_root(home.path())).unwrap();
        std::fs::write(config_path_at(home.path()), "author: [unclosed").unwrap();

        let err = load_at(home.path()).unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse { .. }), "got: {err}");
        assert!(err.to_string().contains("config.yaml"));
    }
}
