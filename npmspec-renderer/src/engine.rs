//! Tera rendering engine: [`OutputKind`] enum and [`Renderer`].
//!
//! # Path mapping
//!
//! | Output  | Template       | Path (relative to the package dir) |
//! |---------|----------------|------------------------------------|
//! | Spec    | `spec.tera`    | `nodejs-<name>.spec`               |
//! | Service | `service.tera` | `_service`                         |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::TemplateContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("spec.tera", include_str!("templates/spec.tera")),
    ("service.tera", include_str!("templates/service.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// `*.tera` files directly inside `dir`, keyed by file name. A missing
/// directory has no overrides.
fn load_user_templates(dir: &Path) -> Result<HashMap<String, String>, RenderError> {
    let mut overrides = HashMap::new();
    if !dir.is_dir() {
        return Ok(overrides);
    }
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let path = entry.map_err(|e| io_err(dir, e))?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("tera") {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let source = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("template override: {}", path.display());
        overrides.insert(file_name.to_string(), source);
    }
    Ok(overrides)
}

/// Embedded templates, with same-named overrides from `user_template_dir`
/// taking their place.
fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut sources: HashMap<String, String> = TPLS
        .iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();
    if let Some(dir) = user_template_dir {
        sources.extend(load_user_templates(dir)?);
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(sources)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// OutputKind
// ---------------------------------------------------------------------------

/// Files rendered for a brand-new package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Spec,
    Service,
}

impl OutputKind {
    /// All outputs in write order.
    pub fn all() -> &'static [OutputKind] {
        &[OutputKind::Spec, OutputKind::Service]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            OutputKind::Spec    => "spec.tera",
            OutputKind::Service => "service.tera",
        }
    }

    /// Output path inside `package_dir` for the distribution package
    /// `rpm_name` (`nodejs-foo`).
    pub fn output_path(&self, package_dir: &Path, rpm_name: &str) -> PathBuf {
        match self {
            OutputKind::Spec    => package_dir.join(format!("{rpm_name}.spec")),
            OutputKind::Service => package_dir.join("_service"),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for the embedded templates plus optional user
/// overrides.
///
/// A `<name>.tera` file in the override directory replaces the embedded
/// template of the same name.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Renderer with the embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_overrides(None)
    }

    pub fn with_overrides(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(Renderer { tera })
    }

    pub fn render(&self, ctx: &TemplateContext, kind: OutputKind) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(kind.template_name(), &tera_ctx)?)
    }

    pub fn render_spec(&self, ctx: &TemplateContext) -> Result<String, RenderError> {
        self.render(ctx, OutputKind::Spec)
    }

    pub fn render_service(&self, ctx: &TemplateContext) -> Result<String, RenderError> {
        self.render(ctx, OutputKind::Service)
    }

    /// Render every output; one `(path, content)` per [`OutputKind`].
    pub fn render_all(
        &self,
        ctx: &TemplateContext,
        package_dir: &Path,
        rpm_name: &str,
    ) -> Result<Vec<(PathBuf, String)>, RenderError> {
        OutputKind::all()
            .iter()
            .map(|kind| Ok((kind.output_path(package_dir, rpm_name), self.render(ctx, *kind)?)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_context(requires: &[&str]) -> TemplateContext {
        TemplateContext {
            name: "foo".to_string(),
            rpm_name: "nodejs-foo".to_string(),
            version: "1.2.0".to_string(),
            source: "https://registry.npmjs.org/foo/-/foo-1.2.0.tgz".to_string(),
            description: "Foo things\n\nLonger text.".to_string(),
            license: "MIT".to_string(),
            url: "https://foo.example".to_string(),
            summary: "Foo things".to_string(),
            requires: requires.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn spec_contains_preamble_fields() {
        let renderer = Renderer::new().unwrap();
        let spec = renderer.render_spec(&make_context(&[])).unwrap();
        assert!(spec.contains("Name:           nodejs-foo\n"));
        assert!(spec.contains("Version:        1.2.0\n"));
        assert!(spec.contains("Summary:        Foo things\n"));
        assert!(spec.contains("License:        MIT\n"));
        assert!(spec.contains("Source:         https://registry.npmjs.org/foo/-/foo-1.2.0.tgz\n"));
    }

    #[test]
    fn one_requires_line_per_dependency() {
        let renderer = Renderer::new().unwrap();
        let spec = renderer
            .render_spec(&make_context(&["nodejs-bar >= 1.0.0", "nodejs-baz >= 2.1.0"]))
            .unwrap();
        assert!(spec.contains("BuildArch:      noarch\nRequires:       nodejs-bar >= 1.0.0\nRequires:       nodejs-baz >= 2.1.0\n%nodejs_find_provides_and_requires\n"));
    }

    #[test]
    fn no_requires_lines_without_dependencies() {
        let renderer = Renderer::new().unwrap();
        let spec = renderer.render_spec(&make_context(&[])).unwrap();
        assert!(!spec.contains("Requires:       "));
        assert!(spec.contains("BuildArch:      noarch\n%nodejs_find_provides_and_requires\n"));
    }

    #[test]
    fn rpm_macros_survive_rendering() {
        let renderer = Renderer::new().unwrap();
        let spec = renderer.render_spec(&make_context(&[])).unwrap();
        assert!(spec.contains("%{nodejs_sitelib}/%{base_name}\n"));
    }

    #[test]
    fn service_is_xml() {
        let renderer = Renderer::new().unwrap();
        let service = renderer.render_service(&make_context(&[])).unwrap();
        assert!(service.starts_with("<services>"));
        assert!(service.trim_end().ends_with("</services>"));
    }

    #[test]
    fn render_all_maps_output_paths() {
        let renderer = Renderer::new().unwrap();
        let dir = PathBuf::from("/work/nodejs-foo");
        let outputs = renderer
            .render_all(&make_context(&[]), &dir, "nodejs-foo")
            .unwrap();
        let paths: Vec<_> = outputs.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            paths,
            vec![dir.join("nodejs-foo.spec"), dir.join("_service")]
        );
    }

    #[test]
    fn no_crlf_in_any_rendered_output() {
        let renderer = Renderer::new().unwrap();
        for kind in OutputKind::all() {
            let content = renderer.render(&make_context(&["bar >= 1.0.0"]), *kind).unwrap();
            assert!(
                !content.contains('\r'),
                "Rendered output for {:?} contains CR char",
                kind
            );
        }
    }
}
