//! `npmspec genspec <package>`: print a generated spec file.

use anyhow::{Context, Result};
use clap::Args;

use npmspec_core::PackageName;
use npmspec_sync::{Syncer, UreqTransport};

use crate::GlobalOpts;

/// Arguments for `npmspec genspec`.
#[derive(Args, Debug)]
pub struct GenspecArgs {
    /// npm package name.
    pub package: String,
}

impl GenspecArgs {
    pub fn run(self, globals: &GlobalOpts) -> Result<()> {
        let (home, config) = super::load_config(globals, None)?;
        let transport = UreqTransport::new();
        let syncer = Syncer::new(&transport, config, &home, super::working_dir()?)
            .context("failed to load templates")?;

        let spec = syncer
            .generate_spec(&PackageName::from(self.package.as_str()))
            .with_context(|| format!("genspec failed for '{}'", self.package))?;

        print!("{spec}");
        if !spec.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}
