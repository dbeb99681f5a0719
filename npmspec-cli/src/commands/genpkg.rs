//! `npmspec genpkg <package>`: create or update a package directory.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use npmspec_core::PackageName;
use npmspec_sync::{DownloadResult, SyncOptions, SyncOutcome, Syncer, UreqTransport, WriteResult};

use crate::GlobalOpts;

/// Arguments for `npmspec genpkg`.
#[derive(Args, Debug)]
pub struct GenpkgArgs {
    /// npm package name.
    pub package: String,

    /// Apply an available update to an existing spec file.
    #[arg(short, long)]
    pub update: bool,

    /// Create the package even if the build service already tracks it.
    #[arg(short, long)]
    pub force: bool,

    /// Change-log author, overriding the config file and `$EMAIL`.
    #[arg(long, value_name = "EMAIL")]
    pub author: Option<String>,
}

impl GenpkgArgs {
    pub fn run(self, globals: &GlobalOpts) -> Result<()> {
        let (home, config) = super::load_config(globals, self.author.as_deref())?;
        let project = config.obs_project.clone();
        let transport = UreqTransport::new();
        let syncer = Syncer::new(&transport, config, &home, super::working_dir()?)
            .context("failed to load templates")?;

        let name = PackageName::from(self.package.as_str());
        let opts = SyncOptions {
            update: self.update,
            force: self.force,
            dry_run: globals.dry_run,
        };
        let outcome = syncer
            .sync_package(&name, opts)
            .with_context(|| format!("genpkg failed for '{}'", self.package))?;

        print_outcome(&name.rpm_name(), &project, &outcome, globals.dry_run);
        Ok(())
    }
}

fn print_outcome(rpm_name: &str, project: &str, outcome: &SyncOutcome, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let tick = "✓".green().bold();

    match outcome {
        SyncOutcome::Created {
            version,
            dir,
            writes,
            download,
        } => {
            println!("{prefix}{tick} '{rpm_name}' {version} created in {}", dir.display());
            print_writes(writes, download);
        }
        SyncOutcome::UpToDate { version } => {
            println!("{prefix}{tick} '{rpm_name}' is up to date ({version})");
        }
        SyncOutcome::UpdateAvailable {
            current,
            latest,
            preview,
            dependencies,
        } => {
            println!(
                "{prefix}{} '{rpm_name}' {current} -> {latest} available; rerun with --update",
                "↑".yellow().bold()
            );
            print!("{preview}");
            if !preview.is_empty() && !preview.ends_with('\n') {
                println!();
            }
            print_dependencies(dependencies);
        }
        SyncOutcome::Updated {
            previous,
            version,
            writes,
            download,
        } => {
            println!("{prefix}{tick} '{rpm_name}' updated {previous} -> {version}");
            print_writes(writes, download);
        }
        SyncOutcome::AlreadyTracked { latest, tracked } => {
            let tracked = if tracked.is_empty() {
                "unknown"
            } else {
                tracked.as_str()
            };
            println!(
                "{prefix}{} '{rpm_name}' already exists in {project} (registry: {latest}, build service: {tracked}); use --force to create it anyway",
                "!".yellow().bold()
            );
        }
    }
}

fn print_writes(writes: &[WriteResult], download: &DownloadResult) {
    for w in writes {
        match w {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
        }
    }
    match download {
        DownloadResult::Downloaded { path, bytes } => {
            println!("  ↓  {} ({bytes} bytes)", path.display())
        }
        DownloadResult::WouldDownload { path } => println!("  ~  {}", path.display()),
        DownloadResult::Present { path } => println!("  ·  {}", path.display()),
    }
}

fn print_dependencies(dependencies: &BTreeMap<String, String>) {
    if dependencies.is_empty() {
        return;
    }
    println!("{}", "dependencies:".bold());
    for (name, range) in dependencies {
        println!("  {name} {range}");
    }
}
