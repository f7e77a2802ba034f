//! Loaded document templates.

use std::path::Path;
use std::sync::Arc;

use dxt_package::{Package, PackageError};

use crate::error::RenderError;
use crate::options::LayoutOptions;
use crate::pipeline;
use crate::registry::ProcessorRegistry;
use crate::value::ContextValue;

/// Conventional name of the primary content part.
pub const PRIMARY_PART: &str = "word/document.xml";

/// A document package ready to be rendered.
///
/// Rendering never modifies the template: every call works on its own copy
/// of the package, so one template can be rendered any number of times and
/// each call starts from the same source.
#[derive(Debug, Clone)]
pub struct Template {
    package: Package,
    registry: Arc<ProcessorRegistry>,
    primary_part: String,
}

impl Template {
    /// Load a template from a file.
    pub fn open(
        path: impl AsRef<Path>,
        registry: Arc<ProcessorRegistry>,
    ) -> Result<Self, RenderError> {
        Self::from_package(Package::open(path)?, registry)
    }

    /// Load a template from archive bytes.
    pub fn from_bytes(bytes: &[u8], registry: Arc<ProcessorRegistry>) -> Result<Self, RenderError> {
        Self::from_package(Package::from_bytes(bytes)?, registry)
    }

    /// Wrap a loaded package using the default primary part name.
    pub fn from_package(
        package: Package,
        registry: Arc<ProcessorRegistry>,
    ) -> Result<Self, RenderError> {
        Self::from_package_with(package, registry, PRIMARY_PART)
    }

    /// Wrap a loaded package with an explicit primary part name.
    ///
    /// Fails if the package has no entry with that name.
    pub fn from_package_with(
        package: Package,
        registry: Arc<ProcessorRegistry>,
        primary_part: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let primary_part = primary_part.into();
        if !package.contains(&primary_part) {
            return Err(PackageError::MissingPart(primary_part).into());
        }
        Ok(Self {
            package,
            registry,
            primary_part,
        })
    }

    /// Source package.
    #[must_use]
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Registry used to dispatch processors.
    #[must_use]
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    /// Name of the primary content part.
    #[must_use]
    pub fn primary_part(&self) -> &str {
        &self.primary_part
    }

    /// Render one or more contexts into a new package.
    ///
    /// Each context produces its own copy of the primary part's body, in
    /// sequence order. Other parts are rendered once, against the first
    /// context.
    pub fn render(
        &self,
        contexts: &[ContextValue],
        layout: &LayoutOptions,
    ) -> Result<Package, RenderError> {
        pipeline::render(self, contexts, layout)
    }

    /// Render a single context into a new package.
    pub fn render_one(
        &self,
        context: &ContextValue,
        layout: &LayoutOptions,
    ) -> Result<Package, RenderError> {
        self.render(std::slice::from_ref(context), layout)
    }

    /// Render and serialize into archive bytes.
    pub fn render_to_bytes(
        &self,
        contexts: &[ContextValue],
        layout: &LayoutOptions,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(self.render(contexts, layout)?.to_bytes()?)
    }

    /// Render and write the archive to `path`.
    ///
    /// On a write failure the rendered bytes are returned inside
    /// [`RenderError::Write`].
    pub fn render_to_file(
        &self,
        contexts: &[ContextValue],
        layout: &LayoutOptions,
        path: impl AsRef<Path>,
    ) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.render_to_bytes(contexts, layout)?;
        if let Err(source) = std::fs::write(path, &bytes) {
            return Err(RenderError::Write {
                path: path.to_path_buf(),
                source,
                bytes,
            });
        }
        tracing::info!(path = %path.display(), size = bytes.len(), "Wrote rendered document");
        Ok(())
    }
}
