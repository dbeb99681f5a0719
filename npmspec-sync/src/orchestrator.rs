//! Create-or-update workflow for one npm package.
//!
//! ## `sync_package` transitions
//!
//! 1. Resolve the target: `nodejs-<name>.spec` in the working directory, else
//!    in `nodejs-<name>/`, else a new `nodejs-<name>/` directory.
//! 2. Fetch the latest registry metadata (conditional, cached).
//! 3. No spec file: check the build service (unless forced), render spec and
//!    `_service`, prepend a change-log entry, download the tarball.
//! 4. Spec file present, same `Version`: nothing to do.
//! 5. Spec file present, other `Version`: preview the edit, or with
//!    `update` apply it, prepend a change-log entry and download.
//!
//! Dry runs walk the same transitions and report what would be written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use npmspec_core::{changes, ChangeEntry, Config, CoreError, PackageName, SpecFile, VersionMetadata};
use npmspec_renderer::{Renderer, TemplateContext};

use crate::cache::RegistryCache;
use crate::diff::preview_diff;
use crate::download::{download_artifact, DownloadResult};
use crate::error::{io_err, SyncError};
use crate::obs::{self, Tracking};
use crate::transport::Transport;

const VERSION_TAG: &str = "Version";

// ---------------------------------------------------------------------------
// Options and outcomes
// ---------------------------------------------------------------------------

/// Flags for [`Syncer::sync_package`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Apply an available update instead of only previewing it.
    pub update: bool,
    /// Skip the build service check for new packages.
    pub force: bool,
    /// Compute the outcome without writing anything.
    pub dry_run: bool,
}

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf },
    /// `--dry` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path } | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// What [`Syncer::sync_package`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// New package directory populated.
    Created {
        version: String,
        dir: PathBuf,
        writes: Vec<WriteResult>,
        download: DownloadResult,
    },
    /// Spec file already at the registry's latest version.
    UpToDate { version: String },
    /// A newer version exists; rerun with `update` to apply it.
    UpdateAvailable {
        current: String,
        latest: String,
        /// Unified diff of the spec file edit.
        preview: String,
        /// Raw registry ranges of the new version.
        dependencies: BTreeMap<String, String>,
    },
    /// Spec file moved to the new version.
    Updated {
        previous: String,
        version: String,
        writes: Vec<WriteResult>,
        download: DownloadResult,
    },
    /// Not created: the build service already carries the package.
    AlreadyTracked {
        latest: String,
        /// Version reported by the build service; empty when unknown.
        tracked: String,
    },
}

/// Where a package lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// `nodejs-<name>`
    pub rpm_name: String,
    /// Directory holding the spec, change-log, `_service` and tarball.
    pub dir: PathBuf,
    pub spec_path: PathBuf,
    /// Whether `spec_path` already exists.
    pub exists: bool,
}

impl Target {
    /// `<dir>/nodejs-<name>.changes`
    pub fn changes_path(&self) -> PathBuf {
        self.dir.join(format!("{}.changes", self.rpm_name))
    }
}

// ---------------------------------------------------------------------------
// Syncer
// ---------------------------------------------------------------------------

/// Runs the workflow for packages under one working directory.
pub struct Syncer<'t> {
    transport: &'t dyn Transport,
    config: Config,
    workdir: PathBuf,
    cache: RegistryCache,
    renderer: Renderer,
}

impl<'t> Syncer<'t> {
    /// Cache and template override locations are resolved against `home`.
    pub fn new(
        transport: &'t dyn Transport,
        config: Config,
        home: &Path,
        workdir: impl Into<PathBuf>,
    ) -> Result<Self, SyncError> {
        let cache = RegistryCache::new(config.cache_root(home), config.registry_url.clone());
        let renderer = Renderer::with_overrides(Some(config.templates_root(home).as_path()))?;
        Ok(Self {
            transport,
            config,
            workdir: workdir.into(),
            cache,
            renderer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Locate the spec file for `name` without touching the network.
    pub fn resolve(&self, name: &PackageName) -> Target {
        let rpm_name = name.rpm_name();
        let spec_file = format!("{rpm_name}.spec");

        let here = self.workdir.join(&spec_file);
        if here.is_file() {
            return Target {
                rpm_name,
                dir: self.workdir.clone(),
                spec_path: here,
                exists: true,
            };
        }

        let dir = self.workdir.join(&rpm_name);
        let spec_path = dir.join(&spec_file);
        let exists = spec_path.is_file();
        Target {
            rpm_name,
            dir,
            spec_path,
            exists,
        }
    }

    /// Metadata of the version `dist-tags.latest` points at.
    pub fn latest(&self, name: &PackageName) -> Result<VersionMetadata, SyncError> {
        let document = self.cache.fetch(self.transport, name)?;
        Ok(document.latest()?)
    }

    /// Render a fresh spec file for `name`. Only the registry cache is
    /// written.
    pub fn generate_spec(&self, name: &PackageName) -> Result<String, SyncError> {
        let meta = self.latest(name)?;
        let ctx = TemplateContext::from_metadata(&meta)?;
        tracing::debug!("requires for {name}: {:?}", ctx.requires);
        Ok(self.renderer.render_spec(&ctx)?)
    }

    /// Create or update the package directory for `name`.
    pub fn sync_package(
        &self,
        name: &PackageName,
        opts: SyncOptions,
    ) -> Result<SyncOutcome, SyncError> {
        let target = self.resolve(name);
        tracing::debug!(
            "target for {name}: {} (exists: {})",
            target.spec_path.display(),
            target.exists
        );
        let meta = self.latest(name)?;

        if target.exists {
            self.update(&target, &meta, opts)
        } else {
            self.create(&target, &meta, opts)
        }
    }

    fn create(
        &self,
        target: &Target,
        meta: &VersionMetadata,
        opts: SyncOptions,
    ) -> Result<SyncOutcome, SyncError> {
        if !opts.force {
            if let Tracking::Tracked(tracked) =
                obs::tracked_version(self.transport, &self.config, &target.rpm_name)?
            {
                tracing::warn!(
                    "{} already exists in {}",
                    target.rpm_name,
                    self.config.obs_project
                );
                tracing::warn!(
                    "current version: {}, build service version: {tracked}",
                    meta.version
                );
                return Ok(SyncOutcome::AlreadyTracked {
                    latest: meta.version.clone(),
                    tracked,
                });
            }
        }

        // Translation errors surface here, before anything touches the disk.
        let ctx = TemplateContext::from_metadata(meta)?;
        let rendered = self
            .renderer
            .render_all(&ctx, &target.dir, &target.rpm_name)?;

        if !opts.dry_run {
            std::fs::create_dir_all(&target.dir).map_err(|e| io_err(&target.dir, e))?;
            if self.workdir.join(".osc").is_dir() {
                tracing::info!(
                    "{} is inside an osc checkout; run `osc add {}`",
                    target.dir.display(),
                    target.rpm_name
                );
            }
        }

        let mut writes = Vec::with_capacity(rendered.len() + 1);
        for (path, content) in &rendered {
            writes.push(write_file(path, content, opts.dry_run)?);
        }
        writes.push(self.write_changes(target, &meta.version, opts.dry_run)?);
        let download =
            download_artifact(self.transport, &meta.dist.tarball, &target.dir, opts.dry_run)?;

        Ok(SyncOutcome::Created {
            version: meta.version.clone(),
            dir: target.dir.clone(),
            writes,
            download,
        })
    }

    fn update(
        &self,
        target: &Target,
        meta: &VersionMetadata,
        opts: SyncOptions,
    ) -> Result<SyncOutcome, SyncError> {
        let spec = SpecFile::read(&target.spec_path)?;
        let current = spec
            .get(VERSION_TAG)
            .ok_or_else(|| CoreError::MissingField {
                tag: VERSION_TAG.to_string(),
                path: target.spec_path.clone(),
            })?
            .to_string();

        if current == meta.version {
            tracing::info!("{} {current} is up to date", target.rpm_name);
            return Ok(SyncOutcome::UpToDate { version: current });
        }

        let mut updated = spec.clone();
        updated.set(VERSION_TAG, &meta.version);

        if !opts.update {
            tracing::info!(
                "{}: {current} -> {} available",
                target.rpm_name,
                meta.version
            );
            let label = format!("{}.spec", target.rpm_name);
            return Ok(SyncOutcome::UpdateAvailable {
                current,
                latest: meta.version.clone(),
                preview: preview_diff(&label, &spec.render(), &updated.render()),
                dependencies: meta.dependencies.clone(),
            });
        }

        let spec_write = if opts.dry_run {
            tracing::info!("[dry-run] would write: {}", target.spec_path.display());
            WriteResult::WouldWrite {
                path: target.spec_path.clone(),
            }
        } else {
            updated.write(&target.spec_path)?;
            tracing::info!("wrote: {}", target.spec_path.display());
            WriteResult::Written {
                path: target.spec_path.clone(),
            }
        };
        let writes = vec![
            spec_write,
            self.write_changes(target, &meta.version, opts.dry_run)?,
        ];
        let download =
            download_artifact(self.transport, &meta.dist.tarball, &target.dir, opts.dry_run)?;

        Ok(SyncOutcome::Updated {
            previous: current,
            version: meta.version.clone(),
            writes,
            download,
        })
    }

    fn write_changes(
        &self,
        target: &Target,
        version: &str,
        dry_run: bool,
    ) -> Result<WriteResult, SyncError> {
        let path = target.changes_path();
        if dry_run {
            tracing::info!("[dry-run] would write: {}", path.display());
            return Ok(WriteResult::WouldWrite { path });
        }
        let entry = ChangeEntry::now(self.config.resolved_author(), version);
        changes::prepend_entry(&path, &entry)?;
        tracing::info!("wrote: {}", path.display());
        Ok(WriteResult::Written { path })
    }
}

fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, SyncError> {
    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }
    std::fs::write(path, content).map_err(|e| io_err(path, e))?;
    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
