//! Subcommand implementations.

pub mod genpkg;
pub mod genspec;

use std::path::PathBuf;

use anyhow::{Context, Result};

use npmspec_core::{config, Config};

use crate::GlobalOpts;

/// Home directory and config with command-line overrides applied.
pub(crate) fn load_config(globals: &GlobalOpts, author: Option<&str>) -> Result<(PathBuf, Config)> {
    let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
    let mut config = config::load_at(&home).context("failed to load ~/.npmspec/config.yaml")?;

    if let Some(registry) = &globals.registry {
        config.registry_url = registry.clone();
    }
    if let Some(author) = author {
        config.author = Some(author.to_string());
    }
    tracing::debug!("registry: {}, project: {}", config.registry_url, config.obs_project);
    Ok((home, config))
}

pub(crate) fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("could not determine working directory")
}
