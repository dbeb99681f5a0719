//! Template context: the field-set both templates are rendered from.

use serde::{Deserialize, Serialize};

use npmspec_core::{npm, range, CoreError, VersionMetadata};

use crate::error::RenderError;

/// Flat rendering payload.
///
/// Keys are exactly what `spec.tera` and `service.tera` consume; user
/// override templates rely on the same names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    /// npm package name (without the `nodejs-` prefix).
    pub name: String,
    /// Distribution package name, `nodejs-<name>` with scopes flattened.
    pub rpm_name: String,
    pub version: String,
    /// Tarball URL.
    pub source: String,
    pub description: String,
    /// License identifier, `FIXME` when the registry has none.
    pub license: String,
    /// Homepage URL.
    pub url: String,
    /// First line of the description.
    pub summary: String,
    /// Translated dependencies, `nodejs-<name> >= version`, sorted by name.
    pub requires: Vec<String>,
}

impl TemplateContext {
    /// Build the context for the latest registry version.
    ///
    /// Fails if any dependency range cannot be translated.
    pub fn from_metadata(meta: &VersionMetadata) -> Result<Self, CoreError> {
        let requires = range::translate_all(&meta.dependencies)?
            .iter()
            .map(range::Requirement::rpm_dependency)
            .collect();

        Ok(TemplateContext {
            name: meta.name.clone(),
            rpm_name: npm::rpm_name_for(&meta.name),
            version: meta.version.clone(),
            source: meta.dist.tarball.clone(),
            description: meta.description.clone(),
            license: meta.license_or_placeholder().to_string(),
            url: meta.homepage.clone().unwrap_or_default(),
            summary: meta.summary().to_string(),
            requires,
        })
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
