//! # npmspec-renderer
//!
//! Tera-based template engine that renders a new `nodejs-<name>.spec` and
//! its `_service` file from npm registry metadata.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use npmspec_core::VersionMetadata;
//! use npmspec_renderer::{Renderer, TemplateContext};
//!
//! fn print_spec(meta: &VersionMetadata) {
//!     let Ok(ctx) = TemplateContext::from_metadata(meta) else { return };
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(spec) = renderer.render_spec(&ctx) {
//!             println!("{spec}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::TemplateContext;
pub use engine::{OutputKind, Renderer};
pub use error::RenderError;
