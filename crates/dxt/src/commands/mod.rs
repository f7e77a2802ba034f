//! CLI command implementations.

pub(crate) mod parts;
pub(crate) mod render;

pub(crate) use parts::PartsArgs;
pub(crate) use render::RenderArgs;
