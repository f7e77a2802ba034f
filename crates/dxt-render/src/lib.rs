//! Render pipeline for word-processing document templates.
//!
//! A [`Template`] wraps a loaded [`Package`](dxt_package::Package) and a
//! [`ProcessorRegistry`]. Rendering runs every registered [`PartProcessor`]
//! over the parts whose names match its [`PartPattern`], then writes the
//! result back out as a new package.
//!
//! # Multiple contexts
//!
//! When several contexts are rendered at once, the first context drives a
//! full pass over every part. Each further context renders a fresh copy of
//! the untouched primary part (`word/document.xml`), and its body is spliced
//! onto the end of the accumulated document. Before each splice the trailing
//! section properties are moved into an empty paragraph so every context
//! keeps its own section formatting.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dxt_render::{ContextValue, LayoutOptions, ProcessorRegistry, Template};
//!
//! let registry = Arc::new(ProcessorRegistry::standard());
//! let template = Template::open("letter.docx", registry)?;
//! let contexts = [
//!     ContextValue::mapping([("name", "Ada")]),
//!     ContextValue::mapping([("name", "Grace")]),
//! ];
//! template.render_to_file(&contexts, &LayoutOptions::new(), "letters.docx")?;
//! # Ok::<(), dxt_render::RenderError>(())
//! ```

mod environment;
mod error;
mod options;
mod pipeline;
mod processor;
pub mod processors;
mod registry;
mod repair;
mod structure;
mod template;
#[cfg(test)]
mod testing;
mod value;

pub use environment::RenderEnv;
pub use error::{RenderError, StructureError};
pub use options::LayoutOptions;
pub use processor::{PartProcessor, ProcessorError};
pub use registry::{PartPattern, ProcessorRegistry};
pub use repair::repair_reference_ids;
pub use template::{PRIMARY_PART, Template};
pub use value::ContextValue;
