//! Per-context render environment.

use crate::options::LayoutOptions;
use crate::template::Template;
use crate::value::ContextValue;

/// Everything a processor can see while rendering one context.
///
/// A new environment is built for each context. The layout slot is the only
/// mutable part: a processor may replace it (for example to fill in default
/// options) and later processors, including those of later contexts in the
/// same render call, see the replacement.
#[derive(Debug)]
pub struct RenderEnv<'a> {
    template: &'a Template,
    context: &'a ContextValue,
    layout: LayoutOptions,
}

impl<'a> RenderEnv<'a> {
    /// Create an environment for one context.
    #[must_use]
    pub fn new(template: &'a Template, context: &'a ContextValue, layout: LayoutOptions) -> Self {
        Self {
            template,
            context,
            layout,
        }
    }

    /// Template being rendered.
    #[must_use]
    pub fn template(&self) -> &'a Template {
        self.template
    }

    /// Data for the current context.
    #[must_use]
    pub fn context(&self) -> &'a ContextValue {
        self.context
    }

    /// Current layout options.
    #[must_use]
    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Mutable access to the layout options.
    pub fn layout_mut(&mut self) -> &mut LayoutOptions {
        &mut self.layout
    }

    /// Replace the layout options, returning the previous set.
    pub fn set_layout(&mut self, layout: LayoutOptions) -> LayoutOptions {
        std::mem::replace(&mut self.layout, layout)
    }

    /// Consume the environment, keeping its layout options for the next context.
    #[must_use]
    pub fn into_layout(self) -> LayoutOptions {
        self.layout
    }
}
