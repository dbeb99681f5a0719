//! Registry cache: conditional fetches keyed by package name.
//!
//! Persists the last registry response for each package at
//! `<cache_root>/<name>/.cache.json`, with the response's entity tag stored
//! under the reserved `_etag` key. Writes use the same atomic `.tmp` +
//! rename pattern as the rest of the workspace.
//!
//! One file per key, no index: the layout stays inspectable with `cat`.

use std::path::PathBuf;

use serde_json::{Map, Value};

use npmspec_core::{PackageDocument, PackageName};

use crate::error::{io_err, SyncError};
use crate::transport::{RegistryResponse, Transport};

/// Reserved key holding the validator token inside the cached body.
pub const ETAG_KEY: &str = "_etag";

/// One cached registry response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub document: PackageDocument,
    pub etag: Option<String>,
}

/// Flat-file registry cache rooted at `root`.
#[derive(Debug, Clone)]
pub struct RegistryCache {
    root: PathBuf,
    registry_url: String,
}

impl RegistryCache {
    pub fn new(root: impl Into<PathBuf>, registry_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            registry_url: registry_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `<root>/<name>/.cache.json`
    pub fn entry_path(&self, name: &PackageName) -> PathBuf {
        self.root.join(&name.0).join(".cache.json")
    }

    /// Load the cached entry for `name`, `None` if never fetched.
    pub fn load(&self, name: &PackageName) -> Result<Option<CacheEntry>, SyncError> {
        let path = self.entry_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let mut body: Map<String, Value> =
            serde_json::from_str(&contents).map_err(|source| SyncError::CacheJson {
                path: path.clone(),
                source,
            })?;
        let etag = match body.remove(ETAG_KEY) {
            Some(Value::String(tag)) => Some(tag),
            _ => None,
        };
        Ok(Some(CacheEntry {
            document: PackageDocument(body),
            etag,
        }))
    }

    /// Save the entry for `name` atomically, overwriting any previous one.
    pub fn save(&self, name: &PackageName, entry: &CacheEntry) -> Result<(), SyncError> {
        let path = self.entry_path(name);
        let Some(dir) = path.parent() else {
            return Err(io_err(
                path,
                std::io::Error::other("invalid cache path"),
            ));
        };

        // Ensure the per-package directory exists.
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let mut body = entry.document.0.clone();
        if let Some(tag) = &entry.etag {
            body.insert(ETAG_KEY.to_string(), Value::String(tag.clone()));
        }
        let json = serde_json::to_string(&body).map_err(|source| SyncError::CacheJson {
            path: path.clone(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&path, e));
        }
        Ok(())
    }

    /// Fetch the registry document for `name`, revalidating the cached copy.
    ///
    /// 1. Load the cached entry, if any.
    /// 2. Request `<registry>/<name>`, conditional on the cached etag.
    /// 3. 304 -> return the cached document untouched.
    /// 4. Fresh body -> parse, persist body + etag, return it.
    pub fn fetch(
        &self,
        transport: &dyn Transport,
        name: &PackageName,
    ) -> Result<PackageDocument, SyncError> {
        let cached = self.load(name)?;
        let url = format!("{}/{}", self.registry_url, name.0);
        let validator = cached.as_ref().and_then(|c| c.etag.as_deref());

        match transport.fetch_registry(&url, validator)? {
            RegistryResponse::NotModified => match cached {
                Some(entry) => {
                    tracing::debug!("using cached data for {name}");
                    Ok(entry.document)
                }
                None => Err(SyncError::UnexpectedNotModified {
                    package: name.0.clone(),
                }),
            },
            RegistryResponse::Fresh { body, etag } => {
                let document = PackageDocument::from_slice(&body)?;
                if etag.is_none() {
                    tracing::debug!("registry sent no etag for {name}; next fetch is unconditional");
                }
                let entry = CacheEntry { document, etag };
                self.save(name, &entry)?;
                tracing::debug!("cached registry data for {name}");
                Ok(entry.document)
            }
        }
    }
}
