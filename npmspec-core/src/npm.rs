//! npm registry metadata types.
//!
//! The registry returns one JSON document per package holding every
//! published version. [`PackageDocument`] keeps it as raw JSON so it can be
//! cached verbatim; only the version pointed at by `dist-tags.latest` is ever
//! deserialised into a [`VersionMetadata`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Placeholder written when the registry carries no license.
pub const LICENSE_PLACEHOLDER: &str = "FIXME";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// An npm package name (`left-pad`, `@scope/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageName(pub String);

impl PackageName {
    /// Distribution package name, see [`rpm_name_for`].
    pub fn rpm_name(&self) -> String {
        rpm_name_for(&self.0)
    }
}

/// Distribution package name for an npm name: `nodejs-<name>`. Scoped names
/// flatten, `@scope/pkg` becomes `nodejs-scope-pkg`.
pub fn rpm_name_for(npm_name: &str) -> String {
    let flat = npm_name.trim_start_matches('@').replace('/', "-");
    format!("nodejs-{flat}")
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// PackageDocument
// ---------------------------------------------------------------------------

/// Full registry response for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageDocument(pub Map<String, Value>);

impl PackageDocument {
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// The version `dist-tags.latest` points at.
    ///
    /// A single lookup, never a scan over `versions`.
    pub fn latest(&self) -> Result<VersionMetadata, CoreError> {
        let package = self
            .0
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        let missing = |reason: &str| CoreError::MissingLatest {
            package: package.clone(),
            reason: reason.to_string(),
        };

        let tag = self
            .0
            .get("dist-tags")
            .and_then(|tags| tags.get("latest"))
            .and_then(Value::as_str)
            .ok_or_else(|| missing("no dist-tags.latest"))?;
        let entry = self
            .0
            .get("versions")
            .and_then(|versions| versions.get(tag))
            .ok_or_else(|| missing(&format!("version {tag} not listed")))?;

        Ok(VersionMetadata::deserialize(entry)?)
    }
}

// ---------------------------------------------------------------------------
// VersionMetadata
// ---------------------------------------------------------------------------

/// One entry of the registry's `versions` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    pub dist: Dist,
}

impl VersionMetadata {
    /// License identifier, or [`LICENSE_PLACEHOLDER`].
    pub fn license_or_placeholder(&self) -> &str {
        self.license
            .as_ref()
            .map(License::identifier)
            .unwrap_or(LICENSE_PLACEHOLDER)
    }

    /// First line of the description.
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or_default()
    }
}

/// `license` is a SPDX string today; old packages used `{ "type": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum License {
    Spdx(String),
    Legacy {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl License {
    pub fn identifier(&self) -> &str {
        match self {
            License::Spdx(id) => id,
            License::Legacy { kind } => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dist {
    pub tarball: String,
}
